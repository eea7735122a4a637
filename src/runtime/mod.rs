//! Evaluation: values, contexts, the symbol report and the tree walker

pub mod context;
pub mod interpreter;
pub mod symbols;
pub mod value;

pub use context::{ContextArena, ContextId, ContextKind, Definition, Entry};
pub use interpreter::{Flow, Interpreter};
pub use symbols::{Symbol, SymbolTable};
pub use value::{ArrayValue, InterfaceValue, Value};
