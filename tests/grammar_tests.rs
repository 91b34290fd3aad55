//! Unit tests for the grammar store and builder

use ll1_parser::error::GrammarError;
use ll1_parser::grammar::{Grammar, GrammarBuilder, Production};
use ll1_parser::symbol::EPSILON;

fn grammar(nts: &[&str], ts: &[&str], rules: &[&str], start: &str) -> Grammar {
    let mut builder = GrammarBuilder::new();
    builder.nonterminals(nts.iter().copied()).unwrap();
    builder.terminals(ts.iter().copied()).unwrap();
    for rule in rules {
        builder.rule(rule).unwrap();
    }
    builder.start(start).unwrap()
}

#[test]
fn test_store_round_trip() {
    let grammar = grammar(
        &["S", "A"],
        &["a", "b"],
        &["S -> [ A b ]", "A -> [ a ]", "A -> [ ε ]"],
        "S",
    );

    assert_eq!(grammar.name(grammar.start()), "S");
    assert_eq!(grammar.terminals().len(), 2);
    assert_eq!(grammar.all_rules().count(), 3);

    let a = grammar.lookup("A").unwrap();
    let epsilon_rules: Vec<&Production> =
        grammar.rules_of(a).filter(|r| r.is_epsilon()).collect();
    assert_eq!(epsilon_rules.len(), 1);
}

#[test]
fn test_add_and_remove_rule() {
    let mut grammar = grammar(&["S"], &["a"], &["S -> [ a ]"], "S");
    let s = grammar.lookup("S").unwrap();
    let a = grammar.lookup("a").unwrap();

    let rule = Production::new(s, vec![a, a]);
    grammar.add_rule(rule.clone());
    assert_eq!(grammar.rule_count(s), 2);

    // structural duplicate is a no-op
    grammar.add_rule(rule.clone());
    assert_eq!(grammar.rule_count(s), 2);

    grammar.remove_rule(&rule);
    assert_eq!(grammar.rule_count(s), 1);
}

#[test]
fn test_terminal_lhs_is_rejected() {
    let mut builder = GrammarBuilder::new();
    builder.nonterminal("S").unwrap();
    builder.terminal("a").unwrap();
    let err = builder.rule("a -> [ a ]").unwrap_err();
    assert!(matches!(err, GrammarError::TerminalLhs(name) if name == "a"));
}

#[test]
fn test_start_must_be_nonterminal() {
    let mut builder = GrammarBuilder::new();
    builder.nonterminal("S").unwrap();
    builder.terminal("a").unwrap();
    builder.rule("S -> [ a ]").unwrap();
    let err = builder.start("a").unwrap_err();
    assert!(matches!(err, GrammarError::InvalidStartSymbol(name) if name == "a"));
}

#[test]
fn test_every_nonterminal_needs_a_rule() {
    let mut builder = GrammarBuilder::new();
    builder.nonterminals(["S", "A"]).unwrap();
    builder.terminal("a").unwrap();
    builder.rule("S -> [ a ]").unwrap();
    let err = builder.start("S").unwrap_err();
    assert!(matches!(err, GrammarError::MissingProductions(name) if name == "A"));
}

#[test]
fn test_rule_display() {
    let grammar = grammar(&["S", "A"], &["a"], &["S -> [ A a ]", "A -> [ ε ]"], "S");
    let s = grammar.lookup("S").unwrap();

    let rule = grammar.rules_of(s).next().unwrap();
    assert_eq!(grammar.display_rule(rule), "S -> [ A a ]");
}

#[test]
fn test_mint_prime_avoids_collisions() {
    let mut grammar = grammar(
        &["S", "S'"],
        &["a"],
        &["S -> [ a ]", "S' -> [ a ]"],
        "S",
    );
    let s = grammar.lookup("S").unwrap();

    let prime = grammar.mint_prime(s);
    assert_eq!(grammar.name(prime), "S''");
    assert!(grammar.is_nonterminal(prime));
    assert_eq!(*grammar.nonterminals().last().unwrap(), prime);
}

#[test]
fn test_mint_factored_uses_fresh_id() {
    let mut grammar = grammar(&["S"], &["a"], &["S -> [ a ]"], "S");

    let minted = grammar.mint_factored();
    assert_eq!(grammar.name(minted), format!("NT_{}", minted.index()));
}

#[test]
fn test_epsilon_rule_is_singleton() {
    let grammar = grammar(&["S"], &[], &["S -> [ ε ]"], "S");
    let s = grammar.lookup("S").unwrap();
    let rule = grammar.rules_of(s).next().unwrap();
    assert_eq!(rule.rhs, vec![EPSILON]);
    assert!(rule.is_epsilon());
}
