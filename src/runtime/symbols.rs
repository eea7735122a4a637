//! Symbol report
//!
//! Every declaration made during a run (variables, constants, functions,
//! parameters, interfaces, fields) is recorded and rendered as a fixed-
//! width report block, one framed section per symbol.

/// One reported symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub symbol_type: String,
    pub data_type: String,
    pub context: String,
    pub line: usize,
    pub column: usize,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        symbol_type: impl Into<String>,
        data_type: impl Into<String>,
        context: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            name: name.into(),
            symbol_type: symbol_type.into(),
            data_type: data_type.into(),
            context: context.into(),
            line,
            column,
        }
    }

    fn as_string(&self) -> String {
        let separator = "-".repeat(50);
        format!(
            "{}\n\
             {:<19}{}\n\
             {:<19}{}\n\
             {:<19}{}\n\
             {:<19}{}\n\
             {:<19}{}\n\
             {:<19}{}\n\
             {}\n",
            separator,
            "ID:",
            self.name,
            "Symbol Type:",
            self.symbol_type,
            "Data type:",
            self.data_type,
            "Context:",
            self.context,
            "Line:",
            self.line,
            "Column:",
            self.column,
            separator,
        )
    }
}

/// Symbols collected during one run, keyed by (name, line, column) and
/// kept in insertion order. Re-registering a key replaces the entry in
/// place.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: Symbol) {
        for existing in &mut self.symbols {
            if existing.name == symbol.name
                && existing.line == symbol.line
                && existing.column == symbol.column
            {
                *existing = symbol;
                return;
            }
        }
        self.symbols.push(symbol);
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The full report, sections joined with newlines
    pub fn report(&self) -> String {
        let sections: Vec<String> = self.symbols.iter().map(|s| s.as_string()).collect();
        sections.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_layout() {
        let symbol = Symbol::new("x", "variable", "number", "<global>", 1, 4);
        let section = symbol.as_string();
        let expected = "--------------------------------------------------\n\
                        ID:                x\n\
                        Symbol Type:       variable\n\
                        Data type:         number\n\
                        Context:           <global>\n\
                        Line:              1\n\
                        Column:            4\n\
                        --------------------------------------------------\n";
        assert_eq!(section, expected);
    }

    #[test]
    fn test_insert_replaces_same_key() {
        let mut table = SymbolTable::new();
        table.insert(Symbol::new("x", "variable", "number", "<global>", 1, 4));
        table.insert(Symbol::new("y", "variable", "string", "<global>", 2, 4));
        table.insert(Symbol::new("x", "variable", "float", "<global>", 1, 4));

        let report = table.report();
        assert_eq!(report.matches("ID:                x").count(), 1);
        assert!(report.contains("Data type:         float"));
        let x_at = report.find("ID:                x").unwrap();
        let y_at = report.find("ID:                y").unwrap();
        assert!(x_at < y_at, "insertion order preserved on replace");
    }

    #[test]
    fn test_empty_report() {
        assert!(SymbolTable::new().is_empty());
        assert_eq!(SymbolTable::new().report(), "");
    }
}
