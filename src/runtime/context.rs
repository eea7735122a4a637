//! Execution contexts
//!
//! Contexts form a parent-linked chain stored in a flat arena and indexed
//! by `ContextId`, so scopes never hold references into each other. Each
//! context kind answers the break/continue/return legality questions
//! itself, delegating to its parent where the construct is transparent.
//!
//! Name lookup walks the parent chain but stops at the first
//! function-kind context it passes through: a function body sees its
//! parameters and locals, never its caller's variables.

use std::collections::HashMap;

use crate::error::TraceFrame;
use crate::types::TypeSpec;

use super::value::Value;

pub type ContextId = usize;

/// What construct opened the context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Global,
    If,
    While,
    For,
    Function,
    Case,
    Interface,
}

/// How a name was introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Definition {
    Variable,
    Constant,
    Parameter,
}

impl Definition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Constant => "constant",
            Self::Parameter => "parameter",
        }
    }
}

/// A declared name: how it was defined, its declared type, and its
/// current value
#[derive(Debug, Clone)]
pub struct Entry {
    pub definition: Definition,
    pub declared_type: TypeSpec,
    pub value: Value,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug)]
struct Context {
    kind: ContextKind,
    display_name: String,
    parent: Option<ContextId>,
    entry_line: usize,
    entries: HashMap<String, Entry>,
}

/// Arena of contexts for one evaluation run
#[derive(Debug)]
pub struct ContextArena {
    contexts: Vec<Context>,
}

impl ContextArena {
    pub const GLOBAL: ContextId = 0;

    pub fn new() -> Self {
        Self {
            contexts: vec![Context {
                kind: ContextKind::Global,
                display_name: "<global>".to_string(),
                parent: None,
                entry_line: 0,
                entries: HashMap::new(),
            }],
        }
    }

    /// Open a child context, returning its id
    pub fn push(
        &mut self,
        kind: ContextKind,
        display_name: &str,
        parent: ContextId,
        entry_line: usize,
    ) -> ContextId {
        self.contexts.push(Context {
            kind,
            display_name: display_name.to_string(),
            parent: Some(parent),
            entry_line,
            entries: HashMap::new(),
        });
        self.contexts.len() - 1
    }

    /// Define a name in the given context. Returns false when the name is
    /// already present locally.
    pub fn define(&mut self, ctx: ContextId, name: &str, entry: Entry) -> bool {
        let entries = &mut self.contexts[ctx].entries;
        if entries.contains_key(name) {
            return false;
        }
        entries.insert(name.to_string(), entry);
        true
    }

    pub fn has_local(&self, ctx: ContextId, name: &str) -> bool {
        self.contexts[ctx].entries.contains_key(name)
    }

    pub fn lookup(&self, ctx: ContextId, name: &str) -> Option<&Entry> {
        self.resolve(ctx, name)
            .map(|id| &self.contexts[id].entries[name])
    }

    pub fn lookup_mut(&mut self, ctx: ContextId, name: &str) -> Option<&mut Entry> {
        let id = self.resolve(ctx, name)?;
        self.contexts[id].entries.get_mut(name)
    }

    fn resolve(&self, ctx: ContextId, name: &str) -> Option<ContextId> {
        let mut current = Some(ctx);
        while let Some(id) = current {
            let context = &self.contexts[id];
            if context.entries.contains_key(name) {
                return Some(id);
            }
            if context.kind == ContextKind::Function {
                return None;
            }
            current = context.parent;
        }
        None
    }

    pub fn is_break_allowed(&self, ctx: ContextId) -> bool {
        match self.contexts[ctx].kind {
            ContextKind::While | ContextKind::For | ContextKind::Case => true,
            ContextKind::Global | ContextKind::Function | ContextKind::Interface => false,
            ContextKind::If => self.parent_of(ctx).is_some_and(|p| self.is_break_allowed(p)),
        }
    }

    pub fn is_continue_allowed(&self, ctx: ContextId) -> bool {
        match self.contexts[ctx].kind {
            ContextKind::While | ContextKind::For => true,
            ContextKind::Global | ContextKind::Function | ContextKind::Interface => false,
            ContextKind::If | ContextKind::Case => self
                .parent_of(ctx)
                .is_some_and(|p| self.is_continue_allowed(p)),
        }
    }

    pub fn is_return_allowed(&self, ctx: ContextId) -> bool {
        match self.contexts[ctx].kind {
            ContextKind::Function => true,
            ContextKind::Global | ContextKind::Interface => false,
            _ => self
                .parent_of(ctx)
                .is_some_and(|p| self.is_return_allowed(p)),
        }
    }

    /// Frames for a runtime traceback, outermost first. The innermost
    /// frame carries the erroring line; each outer frame carries the line
    /// where its child context was entered.
    pub fn traceback(&self, ctx: ContextId, error_line: usize) -> Vec<TraceFrame> {
        let mut frames = Vec::new();
        let mut line = error_line;
        let mut current = Some(ctx);
        while let Some(id) = current {
            let context = &self.contexts[id];
            frames.push(TraceFrame {
                entry_line: line,
                display_name: context.display_name.clone(),
            });
            line = context.entry_line;
            current = context.parent;
        }
        frames.reverse();
        frames
    }

    pub fn display_name(&self, ctx: ContextId) -> &str {
        &self.contexts[ctx].display_name
    }

    fn parent_of(&self, ctx: ContextId) -> Option<ContextId> {
        self.contexts[ctx].parent
    }
}

impl Default for ContextArena {
    fn default() -> Self {
        Self::new()
    }
}
