//! Left factoring.
//!
//! Alternatives of one non-terminal that begin with the same symbol are
//! rewritten so the common prefix appears once, followed by a synthetic
//! non-terminal deriving the suffixes.

use crate::grammar::{Grammar, Production};
use crate::symbol::{EPSILON, SymbolId};
use log::debug;
use std::collections::HashMap;

/// Factors common prefixes out of every non-terminal's alternatives.
///
/// Each non-terminal gets exactly one sweep, synthetic suffix symbols
/// included as the list grows. Common factors hidden behind another
/// non-terminal (`A -> [ B ] | [ a b ]` with `B -> [ a c ]`) are not
/// merged; such grammars surface as an LL(1) conflict at table build.
pub fn left_factor(grammar: &mut Grammar) {
    let mut i = 0;
    while i < grammar.nonterminal_count() {
        let nt = grammar.nonterminal_at(i);
        factor_nonterminal(grammar, nt);
        i += 1;
    }
}

fn factor_nonterminal(grammar: &mut Grammar, nt: SymbolId) {
    let mut groups: HashMap<SymbolId, Vec<Production>> = HashMap::new();
    for rule in grammar.rules_of(nt) {
        groups.entry(rule.rhs[0]).or_default().push(rule.clone());
    }

    for (_, members) in groups {
        if members.len() < 2 {
            continue;
        }
        factor_group(grammar, nt, &members);
    }
}

/// Rewrites one group of alternatives sharing a first symbol.
fn factor_group(grammar: &mut Grammar, nt: SymbolId, members: &[Production]) {
    // Shared first symbol, so the common prefix has length >= 1.
    let mut prefix: Vec<SymbolId> = members[0].rhs.clone();
    for member in members {
        let common = prefix
            .iter()
            .zip(&member.rhs)
            .take_while(|(p, r)| p == r)
            .count();
        prefix.truncate(common);
    }

    let suffix_nt = grammar.mint_factored();
    debug!(
        "factoring {} alternatives of {} with prefix [ {} ] into {}",
        members.len(),
        grammar.name(nt),
        grammar.display_symbols(&prefix),
        grammar.name(suffix_nt)
    );

    let mut has_epsilon = false;
    for member in members {
        grammar.remove_rule(member);
        if member.rhs.len() == prefix.len() {
            // The RHS is exactly the prefix; the suffix symbol must derive
            // ε, exactly once even if several members end here.
            if !has_epsilon {
                grammar.add_rule(Production::new(suffix_nt, vec![EPSILON]));
                has_epsilon = true;
            }
        } else {
            grammar.add_rule(Production::new(suffix_nt, member.rhs[prefix.len()..].to_vec()));
        }
    }

    let mut rhs = prefix;
    rhs.push(suffix_nt);
    grammar.add_rule(Production::new(nt, rhs));
}
