//! Unit tests for parse-table construction and the predictive driver

use ll1_parser::error::GrammarError;
use ll1_parser::first_follow::{compute_first_sets, compute_follow_sets};
use ll1_parser::grammar::{Grammar, GrammarBuilder};
use ll1_parser::ll1::{Ll1Parser, RejectReason, Verdict};
use ll1_parser::symbol::DOLLAR;
use ll1_parser::{eliminate_left_recursion, left_factor};

fn grammar(nts: &[&str], ts: &[&str], rules: &[&str], start: &str) -> Grammar {
    let mut builder = GrammarBuilder::new();
    builder.nonterminals(nts.iter().copied()).unwrap();
    builder.terminals(ts.iter().copied()).unwrap();
    for rule in rules {
        builder.rule(rule).unwrap();
    }
    builder.start(start).unwrap()
}

fn build(grammar: Grammar) -> Result<Ll1Parser, GrammarError> {
    let first = compute_first_sets(&grammar);
    let follow = compute_follow_sets(&grammar, &first);
    Ll1Parser::build(grammar, first, follow)
}

#[test]
fn test_table_routes_epsilon_through_follow() {
    let parser = build(grammar(
        &["S", "A"],
        &["a", "b"],
        &["S -> [ A b ]", "A -> [ a ]", "A -> [ ε ]"],
        "S",
    ))
    .unwrap();

    let grammar = parser.grammar();
    let a = grammar.lookup("A").unwrap();
    let terminal_a = grammar.lookup("a").unwrap();
    let terminal_b = grammar.lookup("b").unwrap();

    let rule = parser.table().get(&(a, terminal_a)).unwrap();
    assert_eq!(grammar.display_rule(rule), "A -> [ a ]");

    let rule = parser.table().get(&(a, terminal_b)).unwrap();
    assert_eq!(grammar.display_rule(rule), "A -> [ ε ]");
}

#[test]
fn test_table_cell_references_its_lhs() {
    let parser = build(grammar(
        &["S", "A"],
        &["a", "b"],
        &["S -> [ A b ]", "A -> [ a ]", "A -> [ ε ]"],
        "S",
    ))
    .unwrap();

    for (&(nt, _), rule) in parser.table() {
        assert_eq!(rule.lhs, nt);
    }
}

#[test]
fn test_conflict_is_fatal() {
    // Both alternatives of S start with a; without factoring this cannot
    // be LL(1).
    let err = build(grammar(
        &["S"],
        &["a", "b", "c"],
        &["S -> [ a b ]", "S -> [ a c ]"],
        "S",
    ))
    .unwrap_err();

    match err {
        GrammarError::NotLl1 {
            nonterminal,
            terminal,
            ..
        } => {
            assert_eq!(nonterminal, "S");
            assert_eq!(terminal, "a");
        }
        other => panic!("expected NotLl1, got {:?}", other),
    }
}

#[test]
fn test_factored_grammar_is_conflict_free() {
    let mut grammar = grammar(
        &["S"],
        &["a", "b", "c"],
        &["S -> [ a b ]", "S -> [ a c ]"],
        "S",
    );
    left_factor(&mut grammar);
    let parser = build(grammar).unwrap();

    assert!(parser.parse(&["a", "b", "$"]).is_accepted());
    assert!(parser.parse(&["a", "c", "$"]).is_accepted());
    assert!(!parser.parse(&["a", "$"]).is_accepted());
}

#[test]
fn test_nested_common_factor_stays_conflicting() {
    // A -> B | a b c d with B -> a b d share the prefix a b only through
    // B; the single-sweep factorer does not merge them, so the table
    // build reports the conflict.
    let mut grammar = grammar(
        &["A", "B"],
        &["a", "b", "c", "d"],
        &["A -> [ B ]", "A -> [ a b c d ]", "B -> [ a b d ]"],
        "A",
    );
    eliminate_left_recursion(&mut grammar);
    left_factor(&mut grammar);

    assert!(matches!(build(grammar), Err(GrammarError::NotLl1 { .. })));
}

#[test]
fn test_epsilon_only_grammar() {
    let parser = build(grammar(&["S"], &[], &["S -> [ ε ]"], "S")).unwrap();

    let grammar = parser.grammar();
    let s = grammar.lookup("S").unwrap();
    let rule = parser.table().get(&(s, DOLLAR)).unwrap();
    assert_eq!(grammar.display_rule(rule), "S -> [ ε ]");

    // The empty stream is exactly the language.
    assert!(parser.parse(&["$"]).is_accepted());
}

#[test]
fn test_reject_unknown_token() {
    let parser = build(grammar(&["S"], &["a"], &["S -> [ a ]"], "S")).unwrap();

    let verdict = parser.parse(&["z", "$"]);
    assert_eq!(
        verdict,
        Verdict::Rejected(RejectReason::UnknownToken("z".to_string()))
    );

    // ε is a known symbol but never a valid input token.
    let verdict = parser.parse(&["ε", "$"]);
    assert_eq!(
        verdict,
        Verdict::Rejected(RejectReason::UnknownToken("ε".to_string()))
    );
}

#[test]
fn test_reject_terminal_mismatch() {
    let parser = build(grammar(
        &["S"],
        &["a", "b", "c"],
        &["S -> [ a b ]"],
        "S",
    ))
    .unwrap();

    let verdict = parser.parse(&["a", "c", "$"]);
    assert_eq!(
        verdict,
        Verdict::Rejected(RejectReason::Mismatch {
            expected: "b".to_string(),
            found: "c".to_string(),
        })
    );
}

#[test]
fn test_reject_no_applicable_rule() {
    let parser = build(grammar(
        &["S"],
        &["a", "b"],
        &["S -> [ a b ]"],
        "S",
    ))
    .unwrap();

    let verdict = parser.parse(&["b", "$"]);
    assert_eq!(
        verdict,
        Verdict::Rejected(RejectReason::NoRule {
            nonterminal: "S".to_string(),
            token: "b".to_string(),
        })
    );
}

#[test]
fn test_reject_input_stack_length_mismatches() {
    let parser = build(grammar(&["S"], &["a", "b"], &["S -> [ a b ]"], "S")).unwrap();

    // Missing terminator: the stack still holds $ when input runs out.
    let verdict = parser.parse(&["a", "b"]);
    assert_eq!(verdict, Verdict::Rejected(RejectReason::ExhaustedInput));

    // Tokens after the terminator: the stack empties with input left.
    let verdict = parser.parse(&["a", "b", "$", "a"]);
    assert_eq!(verdict, Verdict::Rejected(RejectReason::TrailingInput));
}

#[test]
fn test_parser_state_is_immutable_across_runs() {
    let parser = build(grammar(
        &["S", "A"],
        &["a", "b"],
        &["S -> [ A b ]", "A -> [ a ]", "A -> [ ε ]"],
        "S",
    ))
    .unwrap();

    assert!(!parser.parse(&["a", "$"]).is_accepted());
    assert!(parser.parse(&["a", "b", "$"]).is_accepted());
    assert!(parser.parse(&["b", "$"]).is_accepted());
    assert!(!parser.parse(&["a", "$"]).is_accepted());
}
