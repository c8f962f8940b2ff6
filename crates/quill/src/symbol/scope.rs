//! A single named symbol table

use super::{ScopeId, Symbol};
use indexmap::IndexMap;
use std::fmt;

/// Name of the root scope
pub const GLOBAL_SCOPE: &str = "Global";

/// A scope containing symbols
#[derive(Debug, Clone)]
pub struct Scope {
    name: String,
    level: usize,
    /// Kept in declaration order, for dumps and diagnostics
    symbols: IndexMap<String, Symbol>,
    enclosing: Option<ScopeId>,
}

impl Scope {
    pub fn new(name: impl Into<String>, level: usize, enclosing: Option<ScopeId>) -> Self {
        Self {
            name: name.into(),
            level,
            symbols: IndexMap::new(),
            enclosing,
        }
    }

    /// The root scope, pre-populated with the built-in types
    pub fn global() -> Self {
        let mut scope = Self::new(GLOBAL_SCOPE, 1, None);
        for symbol in Symbol::builtins() {
            scope.insert(symbol);
        }
        scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn enclosing(&self) -> Option<ScopeId> {
        self.enclosing
    }

    /// Insert a symbol, replacing any symbol of the same name in this
    /// scope. A replaced symbol keeps its original position.
    pub fn insert(&mut self, symbol: Symbol) {
        log::trace!("insert `{}` into scope {}", symbol.name, self.name);
        self.symbols.insert(symbol.name.clone(), symbol);
    }

    /// Look up a symbol declared in this scope only
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Symbols in the order their names were first declared
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SYMBOL TABLE")?;
        writeln!(f, "============")?;
        writeln!(f, "{:<15}: {}", "Name", self.name)?;
        writeln!(f, "{:<15}: {}", "Level", self.level)?;
        for symbol in self.symbols() {
            writeln!(f, "{:>9}: {}", symbol.name, symbol)?;
        }
        Ok(())
    }
}
