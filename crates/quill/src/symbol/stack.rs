//! The stack of active scopes
//!
//! Frames live in a vector that doubles as the scope arena: a scope's
//! enclosing link is the index of its parent frame. Frames are only ever
//! pushed and popped at the end, so every link always points at a live
//! frame. The root frame at index 0 is never popped.

use super::{Scope, Symbol};
use crate::types::Value;

/// Index of a scope in its stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

/// One active scope plus the value most recently computed in it
#[derive(Debug, Clone)]
pub struct Frame {
    pub scope: Scope,
    /// Implicit result of the latest evaluated statement
    pub result: Option<Value>,
}

impl Frame {
    fn new(scope: Scope) -> Self {
        Self { scope, result: None }
    }
}

/// Active lexical path from the global scope to the current one
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new(global: Scope) -> Self {
        Self {
            frames: vec![Frame::new(global)],
        }
    }

    /// Push a new scope nested in the current one
    pub fn push(&mut self, name: impl Into<String>) -> ScopeId {
        let parent = self.current_id();
        let scope = Scope::new(name, self.current().level() + 1, Some(parent));
        log::debug!("push scope {} (level {})", scope.name(), scope.level());
        self.frames.push(Frame::new(scope));
        self.current_id()
    }

    /// Pop the current scope. The global scope is never popped.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.frames.len() == 1 {
            return None;
        }
        let frame = self.frames.pop()?;
        log::debug!("pop scope {}", frame.scope.name());
        Some(frame.scope)
    }

    /// Number of active scopes, the global one included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current_id(&self) -> ScopeId {
        ScopeId(self.frames.len() - 1)
    }

    pub fn is_global(&self) -> bool {
        self.frames.len() == 1
    }

    pub fn current(&self) -> &Scope {
        &self.frame().scope
    }

    pub fn global(&self) -> &Scope {
        &self.frames[0].scope
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.frames.get(id.0).map(|frame| &frame.scope)
    }

    pub fn frame(&self) -> &Frame {
        let last = self.frames.len() - 1;
        &self.frames[last]
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Insert into the current scope
    pub fn insert(&mut self, symbol: Symbol) {
        self.frame_mut().scope.insert(symbol);
    }

    /// Look up `name` starting at scope `id`. Unless `current_scope_only`,
    /// the search continues through each enclosing scope and returns the
    /// nearest declaration.
    pub fn lookup_in(&self, id: ScopeId, name: &str, current_scope_only: bool) -> Option<&Symbol> {
        let owner = self.resolve_from(id, name, current_scope_only)?;
        self.frames[owner.0].scope.get(name)
    }

    /// Look up `name` along the whole chain from the current scope
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.lookup_in(self.current_id(), name, false)
    }

    /// Look up `name` in the current scope only
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.lookup_in(self.current_id(), name, true)
    }

    pub fn lookup_global(&self, name: &str) -> Option<&Symbol> {
        self.lookup_in(ScopeId::GLOBAL, name, true)
    }

    /// Mutable access to the nearest declaration of `name`
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let owner = self.resolve_from(self.current_id(), name, false)?;
        self.frames[owner.0].scope.get_mut(name)
    }

    /// The scope that declares `name`, searching from `id`
    fn resolve_from(&self, id: ScopeId, name: &str, current_scope_only: bool) -> Option<ScopeId> {
        let scope = self.scope(id)?;
        log::trace!("lookup `{}` in scope {}", name, scope.name());
        if scope.contains(name) {
            return Some(id);
        }
        if current_scope_only {
            return None;
        }
        scope
            .enclosing()
            .and_then(|parent| self.resolve_from(parent, name, false))
    }

    /// Value register of the current frame
    pub fn result(&self) -> Option<Value> {
        self.frame().result
    }

    pub fn set_result(&mut self, value: Option<Value>) {
        self.frame_mut().result = value;
    }

    /// Give back the global scope, dropping any frames still active
    pub fn into_global(mut self) -> Scope {
        self.frames.truncate(1);
        match self.frames.pop() {
            Some(frame) => frame.scope,
            None => Scope::global(),
        }
    }
}
