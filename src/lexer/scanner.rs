//! Lexer/Scanner implementation for OLCScript
//!
//! Converts source text into tokens. Unrecognized characters never abort the
//! scan: each one produces a lexical error and the scanner skips a single
//! character and continues, so one pass surfaces every lexical problem.

use super::token::{Keyword, Literal, Location, Token, TokenType};
use crate::error::OlcError;

/// Lexer for OLCScript source code
pub struct Lexer {
    source: Vec<char>,
    lines: Vec<String>,
    tokens: Vec<Token>,
    errors: Vec<OlcError>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    start_location: Location,
    file: String,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(source: &str, file: &str) -> Self {
        Self {
            source: source.chars().collect(),
            lines: source.lines().map(|l| l.to_string()).collect(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 0,
            start_location: Location::new(1, 0),
            file: file.to_string(),
        }
    }

    /// Tokenize the source code, accumulating lexical errors alongside the
    /// token stream.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<OlcError>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_location = Location::new(self.line, self.column);
            self.scan_token();
        }

        self.tokens.push(Token::new(
            TokenType::Eof,
            String::new(),
            Location::new(self.line, self.column),
        ));

        (self.tokens, self.errors)
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            ' ' | '\r' | '\t' | '\n' => {}

            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            '[' => self.add_token(TokenType::LeftBracket),
            ']' => self.add_token(TokenType::RightBracket),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            ';' => self.add_token(TokenType::Semicolon),
            '?' => self.add_token(TokenType::Question),
            ':' => self.add_token(TokenType::Colon),

            '+' => {
                if self.match_char('+') {
                    self.add_token(TokenType::PlusPlus)
                } else if self.match_char('=') {
                    self.add_token(TokenType::PlusAssign)
                } else {
                    self.add_token(TokenType::Plus)
                }
            }

            '-' => {
                if self.match_char('-') {
                    self.add_token(TokenType::MinusMinus)
                } else if self.match_char('=') {
                    self.add_token(TokenType::MinusAssign)
                } else {
                    self.add_token(TokenType::Minus)
                }
            }

            '*' => {
                if self.match_char('=') {
                    self.add_token(TokenType::StarAssign)
                } else {
                    self.add_token(TokenType::Star)
                }
            }

            '%' => {
                if self.match_char('=') {
                    self.add_token(TokenType::PercentAssign)
                } else {
                    self.add_token(TokenType::Percent)
                }
            }

            '=' => {
                if self.match_char('=') {
                    self.add_token(TokenType::Equal)
                } else {
                    self.add_token(TokenType::Assign)
                }
            }

            '!' => {
                if self.match_char('=') {
                    self.add_token(TokenType::NotEqual)
                } else {
                    self.add_token(TokenType::Bang)
                }
            }

            '<' => {
                if self.match_char('=') {
                    self.add_token(TokenType::LessEqual)
                } else {
                    self.add_token(TokenType::Less)
                }
            }

            '>' => {
                if self.match_char('=') {
                    self.add_token(TokenType::GreaterEqual)
                } else {
                    self.add_token(TokenType::Greater)
                }
            }

            '&' => {
                if self.match_char('&') {
                    self.add_token(TokenType::AndAnd)
                } else {
                    self.illegal_character('&')
                }
            }

            '|' => {
                if self.match_char('|') {
                    self.add_token(TokenType::OrOr)
                } else {
                    self.illegal_character('|')
                }
            }

            '/' => {
                if self.match_char('/') {
                    // Line comment: skip until end of line
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.match_char('*') {
                    self.scan_block_comment();
                } else if self.match_char('=') {
                    self.add_token(TokenType::SlashAssign)
                } else {
                    self.add_token(TokenType::Slash)
                }
            }

            '"' => self.scan_string(),
            '\'' => self.scan_char(),

            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),

            c => self.illegal_character(c),
        }
    }

    /// Scan a double-quoted string literal
    fn scan_string(&mut self) {
        let mut value = String::new();

        while self.peek() != '"' && self.peek() != '\n' && !self.is_at_end() {
            if self.peek() == '\\' {
                self.advance();
                let escaped = self.advance();
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '\\' => value.push('\\'),
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    other => {
                        value.push('\\');
                        value.push(other);
                    }
                }
            } else {
                let c = self.advance();
                value.push(c);
            }
        }

        if self.peek() != '"' {
            self.illegal_character('"');
            return;
        }

        // Consume closing quote
        self.advance();
        self.add_token(TokenType::Literal(Literal::Str(value)));
    }

    /// Scan a single-quoted char literal. The raw content (escapes
    /// unresolved) is kept; the evaluator validates it.
    fn scan_char(&mut self) {
        let mut value = String::new();

        while self.peek() != '\'' && self.peek() != '\n' && !self.is_at_end() {
            if self.peek() == '\\' {
                value.push(self.advance());
            }
            if !self.is_at_end() {
                value.push(self.advance());
            }
        }

        if self.peek() != '\'' {
            self.illegal_character('\'');
            return;
        }

        self.advance();
        self.add_token(TokenType::Literal(Literal::Char(value)));
    }

    /// Scan a number literal (integer, or float as digits '.' digits)
    fn scan_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let is_float = if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
            true
        } else {
            false
        };

        let lexeme: String = self.source[self.start..self.current].iter().collect();

        if is_float {
            match lexeme.parse::<f64>() {
                Ok(value) => self.add_token(TokenType::Literal(Literal::Float(value))),
                Err(_) => self.invalid_number(&lexeme),
            }
        } else {
            match lexeme.parse::<i64>() {
                Ok(value) => self.add_token(TokenType::Literal(Literal::Integer(value))),
                Err(_) => self.invalid_number(&lexeme),
            }
        }
    }

    /// Scan an identifier, reclassifying reserved words
    fn scan_identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let lexeme: String = self.source[self.start..self.current].iter().collect();

        let token_type = if let Some(keyword) = Keyword::from_str(&lexeme) {
            TokenType::Keyword(keyword)
        } else {
            TokenType::Identifier
        };

        self.add_token(token_type);
    }

    /// Skip a block comment; newlines inside still advance the line counter
    /// (advance handles that).
    fn scan_block_comment(&mut self) {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    fn add_token(&mut self, token_type: TokenType) {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        self.tokens
            .push(Token::new(token_type, lexeme, self.start_location));
    }

    fn invalid_number(&mut self, lexeme: &str) {
        let source_line = self.source_line(self.start_location.line);
        self.errors.push(OlcError::lexical_number(
            lexeme,
            self.start_location.line,
            self.start_location.column,
            source_line,
            self.file.clone(),
        ));
    }

    fn illegal_character(&mut self, c: char) {
        let source_line = self.source_line(self.start_location.line);
        self.errors.push(OlcError::lexical(
            c,
            self.start_location.line,
            self.start_location.column,
            source_line,
            self.file.clone(),
        ));
    }

    fn source_line(&self, line: usize) -> String {
        self.lines.get(line - 1).cloned().unwrap_or_default()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.current += 1;
            self.column += 1;
            true
        }
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> (Vec<Token>, Vec<OlcError>) {
        Lexer::new(source, "test.olc").tokenize()
    }

    fn clean(source: &str) -> Vec<Token> {
        let (tokens, errors) = tokenize(source);
        assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);
        tokens
    }

    #[test]
    fn test_empty_source() {
        let tokens = clean("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::Eof);
    }

    #[test]
    fn test_punctuation() {
        let tokens = clean("(){}[],.;?:");
        assert_eq!(tokens[0].token_type, TokenType::LeftParen);
        assert_eq!(tokens[1].token_type, TokenType::RightParen);
        assert_eq!(tokens[2].token_type, TokenType::LeftBrace);
        assert_eq!(tokens[3].token_type, TokenType::RightBrace);
        assert_eq!(tokens[4].token_type, TokenType::LeftBracket);
        assert_eq!(tokens[5].token_type, TokenType::RightBracket);
        assert_eq!(tokens[6].token_type, TokenType::Comma);
        assert_eq!(tokens[7].token_type, TokenType::Dot);
        assert_eq!(tokens[8].token_type, TokenType::Semicolon);
        assert_eq!(tokens[9].token_type, TokenType::Question);
        assert_eq!(tokens[10].token_type, TokenType::Colon);
    }

    #[test]
    fn test_compound_operators() {
        let tokens = clean("+= -= *= /= %= ++ -- == != <= >= && ||");
        assert_eq!(tokens[0].token_type, TokenType::PlusAssign);
        assert_eq!(tokens[1].token_type, TokenType::MinusAssign);
        assert_eq!(tokens[2].token_type, TokenType::StarAssign);
        assert_eq!(tokens[3].token_type, TokenType::SlashAssign);
        assert_eq!(tokens[4].token_type, TokenType::PercentAssign);
        assert_eq!(tokens[5].token_type, TokenType::PlusPlus);
        assert_eq!(tokens[6].token_type, TokenType::MinusMinus);
        assert_eq!(tokens[7].token_type, TokenType::Equal);
        assert_eq!(tokens[8].token_type, TokenType::NotEqual);
        assert_eq!(tokens[9].token_type, TokenType::LessEqual);
        assert_eq!(tokens[10].token_type, TokenType::GreaterEqual);
        assert_eq!(tokens[11].token_type, TokenType::AndAnd);
        assert_eq!(tokens[12].token_type, TokenType::OrOr);
    }

    #[test]
    fn test_keywords() {
        let tokens = clean("var const function interface switch typeof of");
        assert_eq!(tokens[0].token_type, TokenType::Keyword(Keyword::Var));
        assert_eq!(tokens[1].token_type, TokenType::Keyword(Keyword::Const));
        assert_eq!(tokens[2].token_type, TokenType::Keyword(Keyword::Function));
        assert_eq!(tokens[3].token_type, TokenType::Keyword(Keyword::Interface));
        assert_eq!(tokens[4].token_type, TokenType::Keyword(Keyword::Switch));
        assert_eq!(tokens[5].token_type, TokenType::Keyword(Keyword::Typeof));
        assert_eq!(tokens[6].token_type, TokenType::Keyword(Keyword::Of));
    }

    #[test]
    fn test_console_log_are_reserved() {
        let tokens = clean("console.log(x);");
        assert_eq!(tokens[0].token_type, TokenType::Keyword(Keyword::Console));
        assert_eq!(tokens[1].token_type, TokenType::Dot);
        assert_eq!(tokens[2].token_type, TokenType::Keyword(Keyword::Log));
    }

    #[test]
    fn test_number_literals() {
        let tokens = clean("0 42 3.14 0.5");
        assert_eq!(tokens[0].token_type, TokenType::Literal(Literal::Integer(0)));
        assert_eq!(tokens[1].token_type, TokenType::Literal(Literal::Integer(42)));
        assert_eq!(tokens[2].token_type, TokenType::Literal(Literal::Float(3.14)));
        assert_eq!(tokens[3].token_type, TokenType::Literal(Literal::Float(0.5)));
    }

    #[test]
    fn test_integer_literal_out_of_range() {
        let (tokens, errors) = tokenize("var x = 99999999999999999999;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .render()
            .contains("number '99999999999999999999' is out of range."));
        // No token for the bad literal, but scanning continues
        assert_eq!(tokens[0].token_type, TokenType::Keyword(Keyword::Var));
        assert_eq!(tokens[1].token_type, TokenType::Identifier);
        assert_eq!(tokens[2].token_type, TokenType::Assign);
        assert_eq!(tokens[3].token_type, TokenType::Semicolon);
    }

    #[test]
    fn test_string_literals() {
        let tokens = clean(r#""hello" "a\nb""#);
        assert_eq!(
            tokens[0].token_type,
            TokenType::Literal(Literal::Str("hello".to_string()))
        );
        assert_eq!(
            tokens[1].token_type,
            TokenType::Literal(Literal::Str("a\nb".to_string()))
        );
    }

    #[test]
    fn test_char_literals_keep_raw_text() {
        let tokens = clean(r"'a' '\n' 'ab'");
        assert_eq!(
            tokens[0].token_type,
            TokenType::Literal(Literal::Char("a".to_string()))
        );
        assert_eq!(
            tokens[1].token_type,
            TokenType::Literal(Literal::Char("\\n".to_string()))
        );
        // Multi-character contents survive the lexer; the evaluator rejects them
        assert_eq!(
            tokens[2].token_type,
            TokenType::Literal(Literal::Char("ab".to_string()))
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = clean("var x; // trailing\n/* block\ncomment */ var y;");
        assert_eq!(tokens[0].token_type, TokenType::Keyword(Keyword::Var));
        assert_eq!(tokens[3].token_type, TokenType::Keyword(Keyword::Var));
        // Block-comment newlines still advance the line counter
        assert_eq!(tokens[3].location.line, 3);
    }

    #[test]
    fn test_illegal_character_accumulates_and_continues() {
        let (tokens, errors) = tokenize("var @ x = $ 1;");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].render().contains("invalid character '@' found."));
        assert!(errors[1].render().contains("invalid character '$' found."));
        // Scanning continued past both bad characters
        assert_eq!(tokens[0].token_type, TokenType::Keyword(Keyword::Var));
        assert_eq!(tokens[1].token_type, TokenType::Identifier);
        assert_eq!(tokens[2].token_type, TokenType::Assign);
        assert_eq!(
            tokens[3].token_type,
            TokenType::Literal(Literal::Integer(1))
        );
    }

    #[test]
    fn test_locations() {
        let tokens = clean("var\n  x");
        assert_eq!(tokens[0].location, Location::new(1, 0));
        assert_eq!(tokens[1].location, Location::new(2, 2));
    }
}
