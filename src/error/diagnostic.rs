//! Terminal presentation for interpreter errors
//!
//! The plain-text renderings used in evaluation responses live on the error
//! types themselves; this wrapper adds color when errors are printed from
//! the CLI.

use super::OlcError;
use colored::Colorize;

/// Diagnostic wrapper for displaying errors on a terminal
pub struct Diagnostic {
    error: OlcError,
}

impl Diagnostic {
    /// Create a new diagnostic from an error
    pub fn new(error: OlcError) -> Self {
        Self { error }
    }

    /// Format the diagnostic with color
    pub fn format(&self) -> String {
        let mut output = String::new();
        let rendered = self.error.render();

        for (i, line) in rendered.lines().enumerate() {
            if i == 0 {
                output.push_str(&format!("{}\n", line.red().bold()));
            } else if line.trim_end().ends_with('^') {
                output.push_str(&format!("{}\n", line.red()));
            } else {
                output.push_str(line);
                output.push('\n');
            }
        }

        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}
