//! LL(1) parse table construction and the predictive parsing driver.

use crate::error::{GrammarError, Result};
use crate::first_follow::{FirstSets, FollowSets, first_of_sequence};
use crate::grammar::{Grammar, Production};
use crate::symbol::{DOLLAR, EPSILON, SymbolId};
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// Outcome of driving a token stream through the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Why the driver rejected a token stream. A verdict, not a fault: the
/// parser state is untouched and the caller may drive another stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The cursor token is not a known terminal (or is ε).
    UnknownToken(String),
    /// A terminal on the stack did not match the cursor token.
    Mismatch { expected: String, found: String },
    /// No table entry for the top non-terminal and the cursor token.
    NoRule { nonterminal: String, token: String },
    /// The input ran out while stack symbols remained.
    ExhaustedInput,
    /// The stack emptied with input left over.
    TrailingInput,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnknownToken(token) => write!(f, "unexpected symbol: {}", token),
            RejectReason::Mismatch { expected, found } => {
                write!(f, "expected: {} found: {}", expected, found)
            }
            RejectReason::NoRule { nonterminal, token } => {
                write!(f, "no production rule applies for [{}, {}]", nonterminal, token)
            }
            RejectReason::ExhaustedInput => write!(f, "input exhausted before the stack emptied"),
            RejectReason::TrailingInput => write!(f, "input remains after the stack emptied"),
        }
    }
}

/// LL(1) predictive parser: the transformed grammar, its FIRST/FOLLOW sets,
/// and the parse table `M[non-terminal, terminal] -> production`.
#[derive(Debug)]
pub struct Ll1Parser {
    grammar: Grammar,
    table: HashMap<(SymbolId, SymbolId), Production>,
    first_sets: FirstSets,
    follow_sets: FollowSets,
}

impl Ll1Parser {
    /// Builds the parse table.
    ///
    /// For each rule `A -> α`: every terminal in FIRST(α) selects the rule,
    /// and if α is nullable so does every terminal in FOLLOW(A), `$`
    /// included. A cell is assigned at most once; a second assignment is the
    /// fatal LL(1) conflict and the partial table is discarded.
    pub fn build(grammar: Grammar, first_sets: FirstSets, follow_sets: FollowSets) -> Result<Self> {
        let mut table: HashMap<(SymbolId, SymbolId), Production> = HashMap::new();

        for rule in grammar.all_rules() {
            let rhs_first = first_of_sequence(&first_sets, &rule.rhs);

            for &terminal in &rhs_first {
                if terminal != EPSILON {
                    insert_cell(&mut table, &grammar, terminal, rule)?;
                }
            }

            if rhs_first.contains(&EPSILON) {
                let lhs_follow = follow_sets.get(&rule.lhs).cloned().unwrap_or_default();
                for &terminal in &lhs_follow {
                    insert_cell(&mut table, &grammar, terminal, rule)?;
                }
            }
        }

        Ok(Self {
            grammar,
            table,
            first_sets,
            follow_sets,
        })
    }

    /// Drives a token stream through the parse table.
    ///
    /// Tokens are terminal names; the stream must end with `$` (the caller's
    /// responsibility). Accepts exactly when the stack empties as the
    /// trailing `$` is consumed.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Verdict {
        let mut stack = vec![DOLLAR, self.grammar.start()];
        let mut cursor = 0usize;

        while let Some(&top) = stack.last() {
            let Some(token) = tokens.get(cursor) else {
                return Verdict::Rejected(RejectReason::ExhaustedInput);
            };
            let token = token.as_ref();
            debug!("lookup [{} {}]", self.grammar.name(top), token);

            let cur = match self.grammar.lookup(token) {
                Some(id) if self.grammar.is_terminal(id) && id != EPSILON => id,
                _ => return Verdict::Rejected(RejectReason::UnknownToken(token.to_string())),
            };

            if self.grammar.is_terminal(top) {
                if top != cur {
                    return Verdict::Rejected(RejectReason::Mismatch {
                        expected: self.grammar.name(top).to_string(),
                        found: token.to_string(),
                    });
                }
                debug!("match found: {}", token);
                stack.pop();
                cursor += 1;
            } else {
                let Some(rule) = self.table.get(&(top, cur)) else {
                    return Verdict::Rejected(RejectReason::NoRule {
                        nonterminal: self.grammar.name(top).to_string(),
                        token: token.to_string(),
                    });
                };
                debug!("applying production rule: {}", self.grammar.display_rule(rule));
                stack.pop();
                for &sym in rule.rhs.iter().rev() {
                    if sym != EPSILON {
                        stack.push(sym);
                    }
                }
            }
        }

        if cursor == tokens.len() {
            Verdict::Accepted
        } else {
            Verdict::Rejected(RejectReason::TrailingInput)
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn table(&self) -> &HashMap<(SymbolId, SymbolId), Production> {
        &self.table
    }

    pub fn first_sets(&self) -> &FirstSets {
        &self.first_sets
    }

    pub fn follow_sets(&self) -> &FollowSets {
        &self.follow_sets
    }
}

fn insert_cell(
    table: &mut HashMap<(SymbolId, SymbolId), Production>,
    grammar: &Grammar,
    terminal: SymbolId,
    rule: &Production,
) -> Result<()> {
    if let Some(existing) = table.get(&(rule.lhs, terminal)) {
        return Err(GrammarError::NotLl1 {
            nonterminal: grammar.name(rule.lhs).to_string(),
            terminal: grammar.name(terminal).to_string(),
            existing: grammar.display_rule(existing),
            candidate: grammar.display_rule(rule),
        });
    }
    table.insert((rule.lhs, terminal), rule.clone());
    Ok(())
}
