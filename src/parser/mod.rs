//! Syntax analysis module
//!
//! Recursive-descent parsing of OLCScript token streams into the AST.

pub mod ast;
#[allow(clippy::module_inception)]
pub mod parser;

pub use ast::{
    BinaryOp, CaseClause, DefaultClause, Expr, FieldDecl, Param, Program, Stmt, TypeAnnotation,
    UnaryOp,
};
pub use parser::Parser;
