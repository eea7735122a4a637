//! Token definitions for OLCScript
//!
//! This module defines all token types used in lexical analysis.

use std::fmt;

/// Source coordinates of a token or AST node. `column` is the zero-based
/// byte offset of the token within its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A token in the OLCScript language
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub location: Location,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, lexeme: String, location: Location) -> Self {
        Self {
            token_type,
            lexeme,
            location,
        }
    }
}

/// Token types in the OLCScript language
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Literals
    Literal(Literal),

    // Identifiers and keywords
    Identifier,
    Keyword(Keyword),

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Compound assignment
    PlusAssign,    // +=
    MinusAssign,   // -=
    StarAssign,    // *=
    SlashAssign,   // /=
    PercentAssign, // %=

    // Increment / decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Comparison
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Assignment and ternary
    Assign,   // =
    Question, // ?
    Colon,    // :

    // Delimiters
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Comma,        // ,
    Dot,          // .
    Semicolon,    // ;

    Eof,
}

/// Reserved words in the OLCScript language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    True,
    False,
    Null,
    Var,
    Const,
    Console,
    Log,
    If,
    Else,
    Break,
    Continue,
    Return,
    While,
    For,
    Of,
    Function,
    Switch,
    Case,
    Default,
    Interface,
    Typeof,
    ParseInt,
    ParseFloat,
}

impl Keyword {
    /// Get keyword from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            "null" => Some(Self::Null),
            "var" => Some(Self::Var),
            "const" => Some(Self::Const),
            "console" => Some(Self::Console),
            "log" => Some(Self::Log),
            "if" => Some(Self::If),
            "else" => Some(Self::Else),
            "break" => Some(Self::Break),
            "continue" => Some(Self::Continue),
            "return" => Some(Self::Return),
            "while" => Some(Self::While),
            "for" => Some(Self::For),
            "of" => Some(Self::Of),
            "function" => Some(Self::Function),
            "switch" => Some(Self::Switch),
            "case" => Some(Self::Case),
            "default" => Some(Self::Default),
            "interface" => Some(Self::Interface),
            "typeof" => Some(Self::Typeof),
            "parseInt" => Some(Self::ParseInt),
            "parseFloat" => Some(Self::ParseFloat),
            _ => None,
        }
    }

    /// Get string representation of keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::Var => "var",
            Self::Const => "const",
            Self::Console => "console",
            Self::Log => "log",
            Self::If => "if",
            Self::Else => "else",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Return => "return",
            Self::While => "while",
            Self::For => "for",
            Self::Of => "of",
            Self::Function => "function",
            Self::Switch => "switch",
            Self::Case => "case",
            Self::Default => "default",
            Self::Interface => "interface",
            Self::Typeof => "typeof",
            Self::ParseInt => "parseInt",
            Self::ParseFloat => "parseFloat",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Literal token values. Char literals keep their raw (unescaped) text; the
/// evaluator resolves escapes and rejects multi-character contents.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Str(String),
    Char(String),
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{:?}", lit),
            Self::Identifier => write!(f, "identifier"),
            Self::Keyword(kw) => write!(f, "keyword '{}'", kw),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::PlusAssign => write!(f, "+="),
            Self::MinusAssign => write!(f, "-="),
            Self::StarAssign => write!(f, "*="),
            Self::SlashAssign => write!(f, "/="),
            Self::PercentAssign => write!(f, "%="),
            Self::PlusPlus => write!(f, "++"),
            Self::MinusMinus => write!(f, "--"),
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::LessEqual => write!(f, "<="),
            Self::Greater => write!(f, ">"),
            Self::GreaterEqual => write!(f, ">="),
            Self::AndAnd => write!(f, "&&"),
            Self::OrOr => write!(f, "||"),
            Self::Bang => write!(f, "!"),
            Self::Assign => write!(f, "="),
            Self::Question => write!(f, "?"),
            Self::Colon => write!(f, ":"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Dot => write!(f, "."),
            Self::Semicolon => write!(f, ";"),
            Self::Eof => write!(f, "EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("var"), Some(Keyword::Var));
        assert_eq!(Keyword::from_str("interface"), Some(Keyword::Interface));
        assert_eq!(Keyword::from_str("parseInt"), Some(Keyword::ParseInt));
        assert_eq!(Keyword::from_str("of"), Some(Keyword::Of));
        assert_eq!(Keyword::from_str("parseint"), None);
        assert_eq!(Keyword::from_str("push"), None);
    }

    #[test]
    fn test_keyword_as_str() {
        assert_eq!(Keyword::Var.as_str(), "var");
        assert_eq!(Keyword::ParseFloat.as_str(), "parseFloat");
        assert_eq!(Keyword::Typeof.as_str(), "typeof");
    }
}
