//! Interned grammar symbols.
//!
//! Symbols live in a [`SymbolTable`] and are referred to everywhere else by
//! their dense [`SymbolId`] handle. Two terminals are pre-interned in every
//! table: the epsilon sentinel `ε` and the end-of-input sentinel `$`.

use crate::error::{GrammarError, Result};
use std::collections::HashMap;
use std::fmt;

/// Display name of the epsilon sentinel.
pub const EPSILON_NAME: &str = "ε";
/// Display name of the end-of-input sentinel.
pub const DOLLAR_NAME: &str = "$";

/// The epsilon sentinel, present in every table.
pub const EPSILON: SymbolId = SymbolId(0);
/// The end-of-input sentinel, present in every table.
pub const DOLLAR: SymbolId = SymbolId(1);

/// Dense handle into a [`SymbolTable`].
///
/// Ids are assigned in creation order and never reused; synthetic
/// non-terminals minted during grammar transformation receive fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct SymbolRecord {
    name: String,
    terminal: bool,
    synthetic: bool,
}

/// Arena of grammar symbols addressed by [`SymbolId`].
///
/// The name-to-id map is a bijection: interning the same name twice yields
/// the same id, and every id resolves back to exactly one name.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    records: Vec<SymbolRecord>,
    by_name: HashMap<String, SymbolId>,
}

impl SymbolTable {
    /// Creates a table with `ε` and `$` pre-interned.
    pub fn new() -> Self {
        let mut table = Self {
            records: Vec::new(),
            by_name: HashMap::new(),
        };
        table.insert(EPSILON_NAME.to_string(), true, false);
        table.insert(DOLLAR_NAME.to_string(), true, false);
        table
    }

    fn insert(&mut self, name: String, terminal: bool, synthetic: bool) -> SymbolId {
        let id = SymbolId(self.records.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.records.push(SymbolRecord {
            name,
            terminal,
            synthetic,
        });
        id
    }

    /// Interns a user-declared symbol.
    ///
    /// Returns the existing id when the name is already known with the same
    /// classification. Reserved names and names containing whitespace, `]`
    /// or `_` are rejected.
    pub fn intern(&mut self, name: &str, terminal: bool) -> Result<SymbolId> {
        if name == EPSILON_NAME || name == DOLLAR_NAME {
            return Err(GrammarError::ReservedSymbol(name.to_string()));
        }
        validate_name(name)?;
        if let Some(&id) = self.by_name.get(name) {
            if self.records[id.index()].terminal != terminal {
                return Err(GrammarError::SymbolClassMismatch(name.to_string()));
            }
            return Ok(id);
        }
        Ok(self.insert(name.to_string(), terminal, false))
    }

    /// Mints a fresh synthetic non-terminal bypassing user-name validation.
    ///
    /// Used by the transformations for names like `E'` and `NT_7`, which
    /// deliberately contain characters user declarations may not.
    pub fn mint_nonterminal(&mut self, name: String) -> SymbolId {
        debug_assert!(!self.by_name.contains_key(&name));
        self.insert(name, false, true)
    }

    /// Id the next minted symbol will receive.
    pub fn next_id(&self) -> u32 {
        self.records.len() as u32
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: SymbolId) -> &str {
        &self.records[id.index()].name
    }

    #[inline]
    pub fn is_terminal(&self, id: SymbolId) -> bool {
        self.records[id.index()].terminal
    }

    #[inline]
    pub fn is_nonterminal(&self, id: SymbolId) -> bool {
        !self.records[id.index()].terminal
    }

    /// True for non-terminals minted by a transformation rather than
    /// declared by the user.
    #[inline]
    pub fn is_synthetic(&self, id: SymbolId) -> bool {
        self.records[id.index()].synthetic
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c == ']' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(GrammarError::InvalidSymbolName(name.to_string()))
    }
}
