//! FIRST and FOLLOW set computation.
//!
//! FIRST is computed by memoized recursion over the rule graph; the grammar
//! must already be free of left recursion. FOLLOW is computed in a single
//! structural pass that records FOLLOW-of-LHS dependencies, followed by a
//! fixed-point pass over the recorded dependencies.

use crate::grammar::Grammar;
use crate::symbol::{DOLLAR, EPSILON, SymbolId};
use std::collections::{HashMap, HashSet};

/// FIRST sets for every symbol. Terminal entries are singletons of
/// themselves; non-terminal entries may contain ε.
pub type FirstSets = HashMap<SymbolId, HashSet<SymbolId>>;

/// FOLLOW sets for every non-terminal. May contain `$`, never ε.
pub type FollowSets = HashMap<SymbolId, HashSet<SymbolId>>;

/// Computes FIRST for every symbol in the grammar, sentinels included.
pub fn compute_first_sets(grammar: &Grammar) -> FirstSets {
    let mut first = FirstSets::new();
    first_of_symbol(grammar, EPSILON, &mut first);
    first_of_symbol(grammar, DOLLAR, &mut first);
    for &terminal in grammar.terminals() {
        first_of_symbol(grammar, terminal, &mut first);
    }
    for index in 0..grammar.nonterminal_count() {
        first_of_symbol(grammar, grammar.nonterminal_at(index), &mut first);
    }
    first
}

fn first_of_symbol(grammar: &Grammar, sym: SymbolId, memo: &mut FirstSets) {
    if memo.contains_key(&sym) {
        return;
    }
    if grammar.is_terminal(sym) {
        memo.insert(sym, HashSet::from([sym]));
        return;
    }

    // Placeholder guards against revisiting; transformed grammars have no
    // left recursion, so recursion always bottoms out on other symbols.
    memo.insert(sym, HashSet::new());

    let mut set = HashSet::new();
    for rule in grammar.rules_of(sym) {
        let mut nullable = true;
        for &rhs_sym in &rule.rhs {
            first_of_symbol(grammar, rhs_sym, memo);
            let rhs_first = &memo[&rhs_sym];
            set.extend(rhs_first.iter().copied().filter(|&s| s != EPSILON));
            nullable = rhs_first.contains(&EPSILON);
            if !nullable {
                break;
            }
        }
        if nullable {
            set.insert(EPSILON);
        }
    }
    memo.insert(sym, set);
}

/// FIRST of a symbol string under the usual concatenation rule: each
/// symbol's FIRST minus ε, continuing while the symbol is nullable; ε is
/// included only when the whole string is nullable.
pub fn first_of_sequence(first: &FirstSets, symbols: &[SymbolId]) -> HashSet<SymbolId> {
    let mut result = HashSet::new();
    let mut nullable = true;
    for sym in symbols {
        let sym_first = first.get(sym).cloned().unwrap_or_default();
        result.extend(sym_first.iter().copied().filter(|&s| s != EPSILON));
        nullable = sym_first.contains(&EPSILON);
        if !nullable {
            break;
        }
    }
    if nullable {
        result.insert(EPSILON);
    }
    result
}

/// Computes FOLLOW for every non-terminal.
///
/// The structural pass walks each rule left to right with a pending set of
/// non-terminals whose FOLLOW receives the FIRSTs encountered next. Symbols
/// still pending at the end of a rule depend on FOLLOW of the rule's LHS;
/// that dependency is recorded per LHS (the last rule of an LHS with a
/// non-empty tail wins) and resolved by iterating to a fixed point.
pub fn compute_follow_sets(grammar: &Grammar, first: &FirstSets) -> FollowSets {
    let mut follow: FollowSets = grammar
        .nonterminals()
        .iter()
        .map(|&nt| (nt, HashSet::new()))
        .collect();

    follow.get_mut(&grammar.start()).unwrap().insert(DOLLAR);

    let mut dependents: HashMap<SymbolId, HashSet<SymbolId>> = HashMap::new();

    for rule in grammar.all_rules() {
        let mut pending: HashSet<SymbolId> = HashSet::new();
        for &sym in &rule.rhs {
            if grammar.is_terminal(sym) {
                if sym != EPSILON {
                    for &p in &pending {
                        follow.get_mut(&p).unwrap().insert(sym);
                    }
                    pending.clear();
                }
                // A solitary ε behaves as a nullable symbol: pending stays.
            } else {
                let sym_first = first.get(&sym).cloned().unwrap_or_default();
                for &p in &pending {
                    let follow_p = follow.get_mut(&p).unwrap();
                    follow_p.extend(sym_first.iter().copied().filter(|&s| s != EPSILON));
                }
                if !sym_first.contains(&EPSILON) {
                    pending.clear();
                }
                pending.insert(sym);
            }
        }
        if !pending.is_empty() {
            dependents.insert(rule.lhs, pending);
        }
    }

    // Bounded by the terminal alphabet plus $, so this terminates.
    let mut changed = true;
    while changed {
        changed = false;
        for (lhs, members) in &dependents {
            let lhs_follow: Vec<SymbolId> = follow[lhs].iter().copied().collect();
            for member in members {
                let member_follow = follow.get_mut(member).unwrap();
                for &sym in &lhs_follow {
                    if member_follow.insert(sym) {
                        changed = true;
                    }
                }
            }
        }
    }

    follow
}
