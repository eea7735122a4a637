//! OLCScript interpreter
//!
//! A small statically-checked, JavaScript-flavored scripting language.
//! Source text flows through three stages: the [`lexer`] turns it into
//! tokens while accumulating lexical errors, the [`parser`] builds a
//! program while accumulating syntax errors (recovering at statement
//! boundaries), and the [`runtime`] walks the tree, stopping at the
//! first runtime error.
//!
//! [`run`] drives the whole pipeline and packages the console output,
//! rendered errors and symbol report into a [`Response`].

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod types;

use serde::Serialize;

/// Interpreter version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use lexer::Lexer;
use parser::Parser;
use runtime::Interpreter;

/// Outcome of evaluating one program
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Response {
    /// Console output; when evaluation fails this also carries the
    /// rendered errors
    pub result: String,
    /// Rendered errors, empty on success
    pub errs: String,
    /// Symbol report, empty when evaluation never started
    pub symbols: String,
}

impl Response {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Run an OLCScript program end to end.
///
/// Lexical and syntax errors are accumulated across the whole input and
/// reported together without evaluating anything. A runtime error stops
/// evaluation; the output produced up to that point is kept.
pub fn run(source: &str, file: &str) -> Response {
    let (tokens, lex_errors) = Lexer::new(source, file).tokenize();

    let mut front_errors: Vec<String> = lex_errors.iter().map(|e| e.render()).collect();

    let program = match Parser::new(tokens, source, file).parse() {
        Ok(program) => program,
        Err(parse_errors) => {
            front_errors.extend(parse_errors.iter().map(|e| e.render()));
            let text = front_errors.join("\n");
            return Response {
                result: text.clone(),
                errs: text,
                symbols: String::new(),
            };
        }
    };
    if !front_errors.is_empty() {
        let text = front_errors.join("\n");
        return Response {
            result: text.clone(),
            errs: text,
            symbols: String::new(),
        };
    }

    let mut interpreter = Interpreter::new(source, file);
    interpreter.evaluate(&program);

    Response {
        result: interpreter.log_text(),
        errs: interpreter.errors_text(),
        symbols: interpreter.symbols_report(),
    }
}
