//! Human-readable renderings of the analysis artifacts.
//!
//! The core only exposes enumeration over its structures; these helpers
//! turn the FIRST/FOLLOW sets, the transformed grammar and the parse table
//! into stable text, optionally persisted as files. Output is ordered by
//! symbol id so repeated runs produce identical artifacts.

use crate::error::Result;
use crate::first_follow::{FirstSets, FollowSets};
use crate::grammar::Grammar;
use crate::ll1::Ll1Parser;
use crate::symbol::SymbolId;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Renders FIRST sets for all symbols and FOLLOW sets for all
/// non-terminals, terminals first, in declaration order.
pub fn render_sets(grammar: &Grammar, first: &FirstSets, follow: &FollowSets) -> String {
    let mut out = String::new();

    out.push_str("First-sets:\n");
    for &terminal in grammar.terminals() {
        render_entry(&mut out, grammar, terminal, first.get(&terminal));
    }
    for &nt in grammar.nonterminals() {
        render_entry(&mut out, grammar, nt, first.get(&nt));
    }

    out.push_str("Follow-sets:\n");
    for &nt in grammar.nonterminals() {
        render_entry(&mut out, grammar, nt, follow.get(&nt));
    }

    out
}

fn render_entry(out: &mut String, grammar: &Grammar, sym: SymbolId, set: Option<&HashSet<SymbolId>>) {
    let mut members: Vec<SymbolId> = set.into_iter().flatten().copied().collect();
    members.sort();
    let _ = writeln!(
        out,
        "{}: [ {} ]",
        grammar.name(sym),
        grammar.display_symbols(&members)
    );
}

/// Renders the grammar: symbol lists, start symbol and rules.
pub fn render_grammar(grammar: &Grammar) -> String {
    grammar.to_string()
}

/// Renders the parse table, one cell per line, rows in non-terminal
/// declaration order.
pub fn render_table(parser: &Ll1Parser) -> String {
    let grammar = parser.grammar();
    let mut cells: Vec<(&(SymbolId, SymbolId), _)> = parser.table().iter().collect();
    cells.sort_by_key(|&(&key, _)| key);

    let mut out = String::from("Parsing table:\n");
    for (&(nt, terminal), rule) in cells {
        let _ = writeln!(
            out,
            "M[{}, {}] = {}",
            grammar.name(nt),
            grammar.name(terminal),
            grammar.display_rule(rule)
        );
    }
    out
}

/// Writes the grammar, the FIRST/FOLLOW sets and the parse table into
/// `dir` as three text files, creating the directory if needed.
pub fn write_artifacts(dir: &Path, parser: &Ll1Parser) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("grammar.txt"), render_grammar(parser.grammar()))?;
    fs::write(
        dir.join("first_follow.txt"),
        render_sets(parser.grammar(), parser.first_sets(), parser.follow_sets()),
    )?;
    fs::write(dir.join("parse_table.txt"), render_table(parser))?;
    Ok(())
}
