//! Abstract Syntax Tree definitions
//!
//! One variant per syntactic form of OLCScript. Built-in call shapes
//! (`a.push(x)`, `Object.keys(o)`, `parseInt(v)`, ...) are recognized at
//! parse time and get dedicated variants instead of generic call nodes.

use crate::lexer::Location;

/// Root AST node representing a complete program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A declared type: base type name plus array/matrix dimensions
/// (`number`, `number[]`, `Point[][]`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub name: String,
    pub dims: usize,
    pub location: Location,
}

/// A function parameter: `name: type`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_annotation: TypeAnnotation,
    pub location: Location,
}

/// One field of an interface declaration: `name: type;`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub field_type: TypeAnnotation,
    pub location: Location,
}

/// One `case expr:` clause of a switch statement
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub expr: Expr,
    pub statements: Vec<Stmt>,
    pub location: Location,
}

/// One `default:` clause of a switch statement
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultClause {
    pub statements: Vec<Stmt>,
    pub location: Location,
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable or constant declaration: `var x: number = 1;`
    VarDecl {
        name: String,
        type_annotation: Option<TypeAnnotation>,
        initializer: Option<Expr>,
        is_const: bool,
        location: Location,
    },

    /// Plain-identifier assignment: `x = e;` (compound assignment and
    /// `++`/`--` are desugared into this form at parse time)
    Assign {
        name: String,
        value: Expr,
        location: Location,
    },

    /// Array-element assignment: `a[i] = e;`
    ArraySet {
        array: Expr,
        index: Expr,
        value: Expr,
        location: Location,
    },

    /// Interface-field assignment: `o.f = e;`
    MemberSet {
        object: Expr,
        field: String,
        value: Expr,
        location: Location,
    },

    /// Expression statement (evaluated, result discarded)
    Expression { expr: Expr, location: Location },

    /// `console.log(e, ...);` appends one line to the evaluation log
    ConsoleLog {
        args: Vec<Expr>,
        location: Location,
    },

    /// If statement (else-if chains nest in the else block)
    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
        location: Location,
    },

    /// While loop
    While {
        condition: Expr,
        body: Vec<Stmt>,
        location: Location,
    },

    /// C-style for loop with comma-separated init and update lists
    For {
        init: Vec<Stmt>,
        test: Expr,
        update: Vec<Stmt>,
        body: Vec<Stmt>,
        location: Location,
    },

    /// `for (var x of e) { ... }`
    ForOf {
        variable: String,
        iterable: Expr,
        body: Vec<Stmt>,
        location: Location,
    },

    /// Switch statement; all `default` clauses are collected so the
    /// evaluator can reject a count other than one
    Switch {
        subject: Expr,
        cases: Vec<CaseClause>,
        defaults: Vec<DefaultClause>,
        location: Location,
    },

    Break { location: Location },

    Continue { location: Location },

    Return {
        value: Option<Expr>,
        location: Location,
    },

    /// Function declaration
    FunctionDecl {
        name: String,
        params: Vec<Param>,
        return_type: Option<TypeAnnotation>,
        body: Vec<Stmt>,
        location: Location,
    },

    /// Interface declaration
    InterfaceDecl {
        name: String,
        fields: Vec<FieldDecl>,
        location: Location,
    },
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer { value: i64, location: Location },
    Float { value: f64, location: Location },
    Str { value: String, location: Location },
    /// Char literal with its raw (unescaped) content; validated at runtime
    CharLit { raw: String, location: Location },
    Boolean { value: bool, location: Location },
    Null { location: Location },

    Identifier { name: String, location: Location },

    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        location: Location,
    },

    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        location: Location,
    },

    /// `cond ? a : b`
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        location: Location,
    },

    /// `typeof e`
    TypeOf {
        operand: Box<Expr>,
        location: Location,
    },

    /// Generic function call; the callee shape is validated at runtime
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        location: Location,
    },

    /// `[e, e, ...]`
    ArrayLiteral {
        elements: Vec<Expr>,
        location: Location,
    },

    /// `{ field: e, ... }`
    InterfaceLiteral {
        fields: Vec<(String, Expr)>,
        location: Location,
    },

    /// `a[i]`
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
        location: Location,
    },

    /// `o.f`
    MemberAccess {
        object: Box<Expr>,
        field: String,
        location: Location,
    },

    // Built-in call forms, rewritten from member-call syntax at parse time
    Push {
        target: Box<Expr>,
        args: Vec<Expr>,
        location: Location,
    },
    Pop {
        target: Box<Expr>,
        args: Vec<Expr>,
        location: Location,
    },
    IndexOf {
        target: Box<Expr>,
        args: Vec<Expr>,
        location: Location,
    },
    Join {
        target: Box<Expr>,
        args: Vec<Expr>,
        location: Location,
    },
    Length {
        target: Box<Expr>,
        location: Location,
    },
    ToString {
        target: Box<Expr>,
        location: Location,
    },
    ToLowerCase {
        target: Box<Expr>,
        location: Location,
    },
    ToUpperCase {
        target: Box<Expr>,
        location: Location,
    },
    ObjectKeys {
        args: Vec<Expr>,
        location: Location,
    },
    ObjectValues {
        args: Vec<Expr>,
        location: Location,
    },
    ParseInt {
        args: Vec<Expr>,
        location: Location,
    },
    ParseFloat {
        args: Vec<Expr>,
        location: Location,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    /// Operator text as it appears in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl Expr {
    /// Source location of an expression
    pub fn location(&self) -> Location {
        match self {
            Expr::Integer { location, .. }
            | Expr::Float { location, .. }
            | Expr::Str { location, .. }
            | Expr::CharLit { location, .. }
            | Expr::Boolean { location, .. }
            | Expr::Null { location }
            | Expr::Identifier { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Ternary { location, .. }
            | Expr::TypeOf { location, .. }
            | Expr::Call { location, .. }
            | Expr::ArrayLiteral { location, .. }
            | Expr::InterfaceLiteral { location, .. }
            | Expr::ArrayAccess { location, .. }
            | Expr::MemberAccess { location, .. }
            | Expr::Push { location, .. }
            | Expr::Pop { location, .. }
            | Expr::IndexOf { location, .. }
            | Expr::Join { location, .. }
            | Expr::Length { location, .. }
            | Expr::ToString { location, .. }
            | Expr::ToLowerCase { location, .. }
            | Expr::ToUpperCase { location, .. }
            | Expr::ObjectKeys { location, .. }
            | Expr::ObjectValues { location, .. }
            | Expr::ParseInt { location, .. }
            | Expr::ParseFloat { location, .. } => *location,
        }
    }
}
