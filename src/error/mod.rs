//! Error types and diagnostics for the OLCScript interpreter
//!
//! Three error kinds flow through the interpreter: lexical (unrecognized
//! character), syntax (grammar violation or unexpected end of input) and
//! runtime (type mismatches, undefined names, illegal control statements and
//! friends). Every error carries the literal source line and exact
//! coordinates so it can be rendered with a caret mark; runtime errors
//! additionally carry a traceback of the context chain they were raised in.

use std::fmt;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Result type alias for interpreter operations
pub type OlcResult<T> = Result<T, OlcError>;

/// One frame of a runtime traceback: the context's display label and the
/// line at which that context was entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFrame {
    pub entry_line: usize,
    pub display_name: String,
}

/// A runtime (semantic) error with its traceback.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    /// Error code or class name, e.g. `OLC1010`, `TypeError`, `NameError`
    pub name: String,
    pub details: String,
    pub line: usize,
    /// Zero-based byte offset within the line
    pub column: usize,
    pub source_line: String,
    pub file: String,
    /// Outermost context first, innermost last
    pub traceback: Vec<TraceFrame>,
}

/// Main error type for the OLCScript interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum OlcError {
    /// Lexical analysis error (unrecognized character)
    Lexical {
        details: String,
        line: usize,
        column: usize,
        source_line: String,
        file: String,
    },
    /// Parsing error
    Syntax {
        name: String,
        details: String,
        line: usize,
        column: usize,
        source_line: String,
        file: String,
    },
    /// Evaluation error
    Runtime(RuntimeError),
}

impl OlcError {
    /// Create a new lexical error for an unrecognized character
    pub fn lexical(
        ch: char,
        line: usize,
        column: usize,
        source_line: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self::Lexical {
            details: format!("illegal character: invalid character '{}' found.", ch),
            line,
            column,
            source_line: source_line.into(),
            file: file.into(),
        }
    }

    /// Create a new lexical error for a number literal that cannot be
    /// represented
    pub fn lexical_number(
        lexeme: &str,
        line: usize,
        column: usize,
        source_line: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self::Lexical {
            details: format!("number '{}' is out of range.", lexeme),
            line,
            column,
            source_line: source_line.into(),
            file: file.into(),
        }
    }

    /// Create a new syntax error at an offending token
    pub fn syntax(
        lexeme: &str,
        line: usize,
        column: usize,
        source_line: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            name: "Syntax error".to_string(),
            details: format!("at '{}'", lexeme),
            line,
            column,
            source_line: source_line.into(),
            file: file.into(),
        }
    }

    /// Create the dedicated end-of-input syntax error
    pub fn syntax_at_eof(
        line: usize,
        column: usize,
        source_line: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            name: "OLC666".to_string(),
            details: "Syntax error at EOF".to_string(),
            line,
            column,
            source_line: source_line.into(),
            file: file.into(),
        }
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &str {
        match self {
            Self::Lexical { .. } => "LEXICAL",
            Self::Syntax { .. } => "SYNTAX",
            Self::Runtime(_) => "SEMANTIC(RUNTIME)",
        }
    }

    /// Get the error detail message
    pub fn details(&self) -> &str {
        match self {
            Self::Lexical { details, .. } | Self::Syntax { details, .. } => details,
            Self::Runtime(err) => &err.details,
        }
    }

    /// Get the error coordinates (line, column)
    pub fn location(&self) -> (usize, usize) {
        match self {
            Self::Lexical { line, column, .. } | Self::Syntax { line, column, .. } => {
                (*line, *column)
            }
            Self::Runtime(err) => (err.line, err.column),
        }
    }

    /// Render the error block exactly as it appears in the response text.
    pub fn render(&self) -> String {
        let mut out = format!(">>> {} ERROR:\n", self.kind());

        match self {
            Self::Lexical {
                details,
                line,
                column,
                source_line,
                file,
            } => {
                out.push_str(&format!(
                    "File: {}, line: {}, column: {}\n",
                    file,
                    line,
                    column + 1
                ));
                out.push_str(&format!("{}\n", details));
                out.push_str(&mark_error_location(*line, source_line, *column));
            }
            Self::Syntax {
                name,
                details,
                line,
                column,
                source_line,
                file,
            } => {
                out.push_str(&format!(
                    "File: {}, line: {}, column: {}\n",
                    file,
                    line,
                    column + 1
                ));
                out.push_str(&format!("{}: {}\n", name, details));
                out.push_str(&mark_error_location(*line, source_line, *column));
            }
            Self::Runtime(err) => {
                out.push_str("Traceback (most recent call last):\n");
                // Frames carry the raw column; only the `File:` line below
                // is one-based.
                for frame in &err.traceback {
                    out.push_str(&format!(
                        "   File {}, line {}, column: {}, in {}\n",
                        err.file, frame.entry_line, err.column, frame.display_name
                    ));
                }
                out.push_str(&format!(
                    "File: {}, line: {}, column: {}\n",
                    err.file,
                    err.line,
                    err.column + 1
                ));
                out.push_str(&format!("{}: {}\n\n", err.name, err.details));
                out.push_str(&mark_error_location(err.line, &err.source_line, err.column));
            }
        }

        out
    }
}

/// Render the source listing line plus the caret line aligned under the
/// offending column.
fn mark_error_location(line: usize, source_line: &str, column: usize) -> String {
    let prefix = format!("{}:  ", line);
    let padding = " ".repeat(prefix.len() + column + 1);
    format!("{}{}\n{}^\n", prefix, source_line, padding)
}

impl fmt::Display for OlcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl std::error::Error for OlcError {}

impl From<RuntimeError> for OlcError {
    fn from(err: RuntimeError) -> Self {
        Self::Runtime(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lexical_error_render() {
        let err = OlcError::lexical('@', 2, 8, "var x = @;", "input.olc");
        assert_eq!(
            err.render(),
            ">>> LEXICAL ERROR:\n\
             File: input.olc, line: 2, column: 9\n\
             illegal character: invalid character '@' found.\n\
             2:  var x = @;\n\
             \u{20}            ^\n"
        );
    }

    #[test]
    fn test_syntax_error_render() {
        let err = OlcError::syntax("else", 1, 0, "else {}", "input.olc");
        assert_eq!(
            err.render(),
            ">>> SYNTAX ERROR:\n\
             File: input.olc, line: 1, column: 1\n\
             Syntax error: at 'else'\n\
             1:  else {}\n\
             \u{20}    ^\n"
        );
    }

    #[test]
    fn test_eof_error_has_dedicated_code() {
        let err = OlcError::syntax_at_eof(3, 0, "var x = ", "input.olc");
        assert!(err.render().contains("OLC666: Syntax error at EOF"));
    }

    #[test]
    fn test_runtime_error_traceback_order() {
        let err = OlcError::Runtime(RuntimeError {
            name: "OLC1010".to_string(),
            details: "Division by 0".to_string(),
            line: 4,
            column: 10,
            source_line: "    var q = a / b;".to_string(),
            file: "input.olc".to_string(),
            traceback: vec![
                TraceFrame {
                    entry_line: 1,
                    display_name: "global".to_string(),
                },
                TraceFrame {
                    entry_line: 3,
                    display_name: "divide".to_string(),
                },
            ],
        });
        let text = err.render();
        let global_at = text.find("in global").unwrap();
        let divide_at = text.find("in divide").unwrap();
        assert!(global_at < divide_at, "outermost frame must come first");
        assert!(text.starts_with(">>> SEMANTIC(RUNTIME) ERROR:\n"));
        assert!(text.contains("OLC1010: Division by 0"));
        // Frame columns are the raw offset; the File: line is one-based
        assert!(text.contains("   File input.olc, line 3, column: 10, in divide\n"));
        assert!(text.contains("File: input.olc, line: 4, column: 11\n"));
    }

    #[test]
    fn test_out_of_range_number_render() {
        let err = OlcError::lexical_number(
            "99999999999999999999",
            1,
            8,
            "var x = 99999999999999999999;",
            "input.olc",
        );
        let text = err.render();
        assert!(text.starts_with(">>> LEXICAL ERROR:\n"));
        assert!(text.contains("number '99999999999999999999' is out of range."));
    }
}
