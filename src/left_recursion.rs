//! Left-recursion elimination.
//!
//! Implements Paull's algorithm over the ordered non-terminal list. After
//! this pass no production `A -> [ A β ]` remains, so FIRST computation
//! cannot recurse into itself without an ε escape.

use crate::grammar::{Grammar, Production};
use crate::symbol::{EPSILON, SymbolId};
use log::debug;

/// Rewrites the grammar into an equivalent non-left-recursive form.
///
/// For each non-terminal `A_i` in declaration order, rules `A_i -> A_j γ`
/// with `j < i` are expanded through `A_j`'s alternatives, then direct
/// recursion is split off into a fresh primed non-terminal. Tail symbols
/// minted here are appended to the non-terminal list but receive no
/// processing of their own, on this run or any later one.
pub fn eliminate_left_recursion(grammar: &mut Grammar) {
    let mut i = 0;
    while i < grammar.nonterminal_count() {
        let a_i = grammar.nonterminal_at(i);
        if grammar.is_synthetic(a_i) {
            i += 1;
            continue;
        }

        for j in 0..i {
            let a_j = grammar.nonterminal_at(j);
            substitute_leading(grammar, a_i, a_j);
        }

        remove_direct_recursion(grammar, a_i);
        i += 1;
    }
}

/// Replaces every rule `A_i -> A_j γ` by `{ A_i -> δ γ : A_j -> δ }`.
///
/// `A_j` has already been processed, so its alternatives no longer begin
/// with an earlier non-terminal.
fn substitute_leading(grammar: &mut Grammar, a_i: SymbolId, a_j: SymbolId) {
    let targets: Vec<Production> = grammar
        .rules_of(a_i)
        .filter(|rule| rule.rhs.first() == Some(&a_j))
        .cloned()
        .collect();

    for rule in targets {
        debug!(
            "expanding {} through {}",
            grammar.display_rule(&rule),
            grammar.name(a_j)
        );
        grammar.remove_rule(&rule);
        let gamma = rule.rhs[1..].to_vec();
        let deltas: Vec<Production> = grammar.rules_of(a_j).cloned().collect();
        for delta in deltas {
            grammar.add_rule(Production::new(a_i, splice(&delta.rhs, &gamma)));
        }
    }
}

/// Splits `A -> A α | β` into `A -> β A'` and `A' -> α A' | ε`.
fn remove_direct_recursion(grammar: &mut Grammar, a: SymbolId) {
    let (recursive, rest): (Vec<Production>, Vec<Production>) = grammar
        .rules_of(a)
        .cloned()
        .partition(|rule| rule.rhs.first() == Some(&a));

    if recursive.is_empty() {
        return;
    }

    let prime = grammar.mint_prime(a);
    debug!(
        "minted {} for left-recursive {}",
        grammar.name(prime),
        grammar.name(a)
    );

    for rule in &recursive {
        grammar.remove_rule(rule);
        // A -> A derives no terminal string; drop it outright.
        if rule.rhs.len() == 1 {
            debug!("discarding unit self-recursion {}", grammar.display_rule(rule));
            continue;
        }
        let mut rhs = rule.rhs[1..].to_vec();
        rhs.push(prime);
        grammar.add_rule(Production::new(prime, rhs));
    }

    for rule in &rest {
        grammar.remove_rule(rule);
        let mut rhs: Vec<SymbolId> = rule.rhs.iter().copied().filter(|&s| s != EPSILON).collect();
        rhs.push(prime);
        grammar.add_rule(Production::new(a, rhs));
    }

    grammar.add_rule(Production::new(prime, vec![EPSILON]));
}

/// Concatenates `δ γ`, keeping ε out of any multi-symbol RHS.
fn splice(delta: &[SymbolId], gamma: &[SymbolId]) -> Vec<SymbolId> {
    let mut rhs: Vec<SymbolId> = delta
        .iter()
        .chain(gamma)
        .copied()
        .filter(|&s| s != EPSILON)
        .collect();
    if rhs.is_empty() {
        rhs.push(EPSILON);
    }
    rhs
}
