//! Context-free grammar store.
//!
//! The grammar owns its [`SymbolTable`] and keeps production rules keyed by
//! their left-hand side. Alternatives of one non-terminal are a set with
//! structural equality, so inserting an identical rule twice is a no-op.

use crate::error::{GrammarError, Result};
use crate::symbol::{EPSILON, SymbolId, SymbolTable};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A production rule `LHS -> [ s1 s2 ... sk ]`.
///
/// The RHS is never empty; an empty derivation is spelled `[ε]`, and ε never
/// appears inside a longer RHS.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    pub lhs: SymbolId,
    pub rhs: Vec<SymbolId>,
}

impl Production {
    pub fn new(lhs: SymbolId, rhs: Vec<SymbolId>) -> Self {
        debug_assert!(!rhs.is_empty());
        Self { lhs, rhs }
    }

    /// True for the rule `LHS -> [ ε ]`.
    pub fn is_epsilon(&self) -> bool {
        self.rhs == [EPSILON]
    }
}

/// A context-free grammar: start symbol, terminal and non-terminal lists,
/// and the rule set.
///
/// Both symbol lists are in declaration order; the non-terminal list grows
/// at the end as transformations mint synthetic symbols.
#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: SymbolTable,
    nonterminals: Vec<SymbolId>,
    terminals: Vec<SymbolId>,
    start: SymbolId,
    rules: HashMap<SymbolId, HashSet<Production>>,
}

impl Grammar {
    pub fn start(&self) -> SymbolId {
        self.start
    }

    /// User-visible terminals, excluding the `ε` and `$` sentinels.
    pub fn terminals(&self) -> &[SymbolId] {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &[SymbolId] {
        &self.nonterminals
    }

    pub fn nonterminal_count(&self) -> usize {
        self.nonterminals.len()
    }

    pub fn nonterminal_at(&self, index: usize) -> SymbolId {
        self.nonterminals[index]
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn name(&self, id: SymbolId) -> &str {
        self.symbols.name(id)
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        self.symbols.is_terminal(id)
    }

    pub fn is_nonterminal(&self, id: SymbolId) -> bool {
        self.symbols.is_nonterminal(id)
    }

    pub fn is_synthetic(&self, id: SymbolId) -> bool {
        self.symbols.is_synthetic(id)
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.symbols.lookup(name)
    }

    /// Alternatives of `lhs`. Empty for symbols with no rules.
    pub fn rules_of(&self, lhs: SymbolId) -> impl Iterator<Item = &Production> {
        self.rules.get(&lhs).into_iter().flatten()
    }

    pub fn rule_count(&self, lhs: SymbolId) -> usize {
        self.rules.get(&lhs).map_or(0, HashSet::len)
    }

    pub fn all_rules(&self) -> impl Iterator<Item = &Production> {
        self.rules.values().flatten()
    }

    /// Inserts a rule. A structurally identical rule is a no-op.
    pub fn add_rule(&mut self, rule: Production) {
        debug_assert!(self.symbols.is_nonterminal(rule.lhs));
        self.rules.entry(rule.lhs).or_default().insert(rule);
    }

    /// Removes a rule by structural equality.
    pub fn remove_rule(&mut self, rule: &Production) {
        if let Some(set) = self.rules.get_mut(&rule.lhs) {
            set.remove(rule);
        }
    }

    /// Mints the tail non-terminal for left-recursion removal: the origin
    /// name with a prime appended, re-primed until the name is fresh.
    pub fn mint_prime(&mut self, origin: SymbolId) -> SymbolId {
        let mut name = format!("{}'", self.symbols.name(origin));
        while self.symbols.lookup(&name).is_some() {
            name.push('\'');
        }
        let id = self.symbols.mint_nonterminal(name);
        self.nonterminals.push(id);
        id
    }

    /// Mints the synthetic non-terminal `NT_<id>` for left factoring.
    ///
    /// `_` is reserved in user declarations, so the name cannot collide.
    pub fn mint_factored(&mut self) -> SymbolId {
        let name = format!("NT_{}", self.symbols.next_id());
        let id = self.symbols.mint_nonterminal(name);
        self.nonterminals.push(id);
        id
    }

    /// Renders a symbol sequence as `s1 s2 ... sk`.
    pub fn display_symbols(&self, symbols: &[SymbolId]) -> String {
        symbols
            .iter()
            .map(|&s| self.symbols.name(s))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders a rule as `LHS -> [ s1 s2 ... sk ]`.
    pub fn display_rule(&self, rule: &Production) -> String {
        format!(
            "{} -> [ {} ]",
            self.symbols.name(rule.lhs),
            self.display_symbols(&rule.rhs)
        )
    }

    /// Alternatives of `lhs` ordered by RHS, for stable text output.
    pub fn sorted_rules_of(&self, lhs: SymbolId) -> Vec<&Production> {
        let mut rules: Vec<_> = self.rules_of(lhs).collect();
        rules.sort_by(|a, b| a.rhs.cmp(&b.rhs));
        rules
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Terminals:")?;
        for &t in &self.terminals {
            write!(f, " {}", self.symbols.name(t))?;
        }
        write!(f, "\nNon-terminals:")?;
        for &nt in &self.nonterminals {
            write!(f, " {}", self.symbols.name(nt))?;
        }
        writeln!(f, "\nStart symbol: {}", self.symbols.name(self.start))?;
        for &nt in &self.nonterminals {
            for rule in self.sorted_rules_of(nt) {
                writeln!(f, "{}", self.display_rule(rule))?;
            }
        }
        Ok(())
    }
}

/// Incremental grammar construction.
///
/// Declare symbols first, then add rules, then finalize with the start
/// symbol. Finalization checks the structural invariants: the start symbol
/// is a non-terminal and every non-terminal has at least one rule.
#[derive(Debug)]
pub struct GrammarBuilder {
    symbols: SymbolTable,
    nonterminals: Vec<SymbolId>,
    terminals: Vec<SymbolId>,
    rules: HashMap<SymbolId, HashSet<Production>>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            nonterminals: Vec::new(),
            terminals: Vec::new(),
            rules: HashMap::new(),
        }
    }

    pub fn nonterminal(&mut self, name: &str) -> Result<SymbolId> {
        let id = self.symbols.intern(name, false)?;
        if !self.nonterminals.contains(&id) {
            self.nonterminals.push(id);
        }
        Ok(id)
    }

    pub fn terminal(&mut self, name: &str) -> Result<SymbolId> {
        let id = self.symbols.intern(name, true)?;
        if !self.terminals.contains(&id) {
            self.terminals.push(id);
        }
        Ok(id)
    }

    pub fn nonterminals<'a, I: IntoIterator<Item = &'a str>>(&mut self, names: I) -> Result<()> {
        for name in names {
            self.nonterminal(name)?;
        }
        Ok(())
    }

    pub fn terminals<'a, I: IntoIterator<Item = &'a str>>(&mut self, names: I) -> Result<()> {
        for name in names {
            self.terminal(name)?;
        }
        Ok(())
    }

    /// Parses and adds one rule of the form `LHS -> [ s1 s2 ... sk ]`.
    ///
    /// Every token is whitespace-separated, brackets included. All symbols
    /// must already be declared; `ε` and `$` resolve to the sentinels.
    pub fn rule(&mut self, line: &str) -> Result<()> {
        let mut tokens = line.split_whitespace();
        let malformed = || GrammarError::MalformedRule(line.to_string());

        let lhs_name = tokens.next().ok_or_else(malformed)?;
        let lhs = self.resolve(lhs_name)?;
        if self.symbols.is_terminal(lhs) {
            return Err(GrammarError::TerminalLhs(lhs_name.to_string()));
        }

        let arrow = tokens.next();
        let open = tokens.next();
        if arrow != Some("->") || open != Some("[") {
            return Err(malformed());
        }

        let mut rhs = Vec::new();
        let mut closed = false;
        for token in tokens.by_ref() {
            if token == "]" {
                closed = true;
                break;
            }
            rhs.push(self.resolve(token)?);
        }
        if !closed || tokens.next().is_some() || rhs.is_empty() {
            return Err(malformed());
        }

        // ε is only meaningful as a solitary RHS; drop stray occurrences.
        if rhs.len() > 1 {
            rhs.retain(|&s| s != EPSILON);
            if rhs.is_empty() {
                rhs.push(EPSILON);
            }
        }

        self.rules.entry(lhs).or_default().insert(Production::new(lhs, rhs));
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<SymbolId> {
        self.symbols
            .lookup(name)
            .ok_or_else(|| GrammarError::UnknownSymbol(name.to_string()))
    }

    /// Finalizes the grammar with `start` as the start symbol.
    pub fn start(self, name: &str) -> Result<Grammar> {
        let start = self
            .symbols
            .lookup(name)
            .filter(|&id| self.symbols.is_nonterminal(id))
            .ok_or_else(|| GrammarError::InvalidStartSymbol(name.to_string()))?;

        for &nt in &self.nonterminals {
            if self.rules.get(&nt).is_none_or(HashSet::is_empty) {
                return Err(GrammarError::MissingProductions(
                    self.symbols.name(nt).to_string(),
                ));
            }
        }

        Ok(Grammar {
            symbols: self.symbols,
            nonterminals: self.nonterminals,
            terminals: self.terminals,
            start,
            rules: self.rules,
        })
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}
