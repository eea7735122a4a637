//! Parser implementation
//!
//! Recursive-descent parser for OLCScript. Syntax errors are accumulated:
//! a failed statement is reported, the parser resynchronizes at the next
//! statement boundary and keeps going, so one pass surfaces every
//! diagnostic. Built-in member-call shapes are rewritten into dedicated AST
//! nodes here, and compound assignment / `++` / `--` are desugared into
//! plain assignments wrapping a synthesized binary operation.

use super::ast::*;
use crate::error::{OlcError, OlcResult};
use crate::lexer::{Keyword, Literal as TokenLiteral, Location, Token, TokenType};

/// Parser for OLCScript token streams
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    lines: Vec<String>,
    file: String,
}

impl Parser {
    /// Create a new parser. The source text is kept for error listings.
    pub fn new(tokens: Vec<Token>, source: &str, file: &str) -> Self {
        Self {
            tokens,
            current: 0,
            lines: source.lines().map(|l| l.to_string()).collect(),
            file: file.to_string(),
        }
    }

    /// Parse the token stream into a program, or fail with every syntax
    /// error found.
    pub fn parse(&mut self) -> Result<Program, Vec<OlcError>> {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    errors.push(err);
                    self.synchronize();
                }
            }
        }

        if errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(errors)
        }
    }

    // ===== Declarations =====

    fn declaration(&mut self) -> OlcResult<Stmt> {
        if self.match_keyword(Keyword::Var) {
            let stmt = self.var_declaration(false)?;
            self.consume(TokenType::Semicolon)?;
            Ok(stmt)
        } else if self.match_keyword(Keyword::Const) {
            let stmt = self.var_declaration(true)?;
            self.consume(TokenType::Semicolon)?;
            Ok(stmt)
        } else if self.match_keyword(Keyword::Function) {
            self.function_declaration()
        } else if self.match_keyword(Keyword::Interface) {
            self.interface_declaration()
        } else {
            self.statement()
        }
    }

    fn var_declaration(&mut self, is_const: bool) -> OlcResult<Stmt> {
        let location = self.previous().location;
        let name = self.consume_identifier()?;
        self.var_declaration_tail(name, is_const, location)
    }

    fn var_declaration_tail(
        &mut self,
        name: String,
        is_const: bool,
        location: Location,
    ) -> OlcResult<Stmt> {
        let type_annotation = if self.match_token(TokenType::Colon) {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        let initializer = if self.match_token(TokenType::Assign) {
            Some(self.expression()?)
        } else {
            None
        };

        Ok(Stmt::VarDecl {
            name,
            type_annotation,
            initializer,
            is_const,
            location,
        })
    }

    fn function_declaration(&mut self) -> OlcResult<Stmt> {
        let location = self.previous().location;
        let name = self.consume_identifier()?;

        self.consume(TokenType::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenType::RightParen) {
            loop {
                let param_location = self.peek().location;
                let param_name = self.consume_identifier()?;
                self.consume(TokenType::Colon)?;
                let type_annotation = self.parse_type_annotation()?;
                params.push(Param {
                    name: param_name,
                    type_annotation,
                    location: param_location,
                });

                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RightParen)?;

        let return_type = if self.match_token(TokenType::Colon) {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        self.consume(TokenType::LeftBrace)?;
        let body = self.block_statements()?;

        Ok(Stmt::FunctionDecl {
            name,
            params,
            return_type,
            body,
            location,
        })
    }

    fn interface_declaration(&mut self) -> OlcResult<Stmt> {
        let location = self.previous().location;
        let name = self.consume_identifier()?;

        self.consume(TokenType::LeftBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenType::RightBrace) && !self.is_at_end() {
            let field_location = self.peek().location;
            let field_name = self.consume_identifier()?;
            self.consume(TokenType::Colon)?;
            let field_type = self.parse_type_annotation()?;
            self.consume(TokenType::Semicolon)?;
            fields.push(FieldDecl {
                name: field_name,
                field_type,
                location: field_location,
            });
        }
        self.consume(TokenType::RightBrace)?;

        Ok(Stmt::InterfaceDecl {
            name,
            fields,
            location,
        })
    }

    // ===== Statements =====

    fn statement(&mut self) -> OlcResult<Stmt> {
        if self.match_keyword(Keyword::If) {
            self.if_statement()
        } else if self.match_keyword(Keyword::While) {
            self.while_statement()
        } else if self.match_keyword(Keyword::For) {
            self.for_statement()
        } else if self.match_keyword(Keyword::Switch) {
            self.switch_statement()
        } else if self.match_keyword(Keyword::Return) {
            let location = self.previous().location;
            let value = if !self.check(&TokenType::Semicolon) {
                Some(self.expression()?)
            } else {
                None
            };
            self.consume(TokenType::Semicolon)?;
            Ok(Stmt::Return { value, location })
        } else if self.match_keyword(Keyword::Break) {
            let location = self.previous().location;
            self.consume(TokenType::Semicolon)?;
            Ok(Stmt::Break { location })
        } else if self.match_keyword(Keyword::Continue) {
            let location = self.previous().location;
            self.consume(TokenType::Semicolon)?;
            Ok(Stmt::Continue { location })
        } else if self.match_keyword(Keyword::Console) {
            let stmt = self.console_log()?;
            self.consume(TokenType::Semicolon)?;
            Ok(stmt)
        } else {
            let stmt = self.simple_statement()?;
            self.consume(TokenType::Semicolon)?;
            Ok(stmt)
        }
    }

    fn console_log(&mut self) -> OlcResult<Stmt> {
        let location = self.previous().location;
        self.consume(TokenType::Dot)?;
        self.consume_keyword(Keyword::Log)?;
        self.consume(TokenType::LeftParen)?;
        let args = self.argument_list()?;
        self.consume(TokenType::RightParen)?;
        Ok(Stmt::ConsoleLog { args, location })
    }

    fn if_statement(&mut self) -> OlcResult<Stmt> {
        let location = self.previous().location;
        self.consume(TokenType::LeftParen)?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen)?;

        self.consume(TokenType::LeftBrace)?;
        let then_block = self.block_statements()?;

        let else_block = if self.match_keyword(Keyword::Else) {
            if self.match_keyword(Keyword::If) {
                // else-if chains nest
                Some(vec![self.if_statement()?])
            } else {
                self.consume(TokenType::LeftBrace)?;
                Some(self.block_statements()?)
            }
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
            location,
        })
    }

    fn while_statement(&mut self) -> OlcResult<Stmt> {
        let location = self.previous().location;
        self.consume(TokenType::LeftParen)?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen)?;

        self.consume(TokenType::LeftBrace)?;
        let body = self.block_statements()?;

        Ok(Stmt::While {
            condition,
            body,
            location,
        })
    }

    fn for_statement(&mut self) -> OlcResult<Stmt> {
        let location = self.previous().location;
        self.consume(TokenType::LeftParen)?;

        self.consume_keyword(Keyword::Var)?;
        let decl_location = self.previous().location;
        let first_name = self.consume_identifier()?;

        // `for (var x of e)` iterates an array or string
        if self.match_keyword(Keyword::Of) {
            let iterable = self.expression()?;
            self.consume(TokenType::RightParen)?;
            self.consume(TokenType::LeftBrace)?;
            let body = self.block_statements()?;
            return Ok(Stmt::ForOf {
                variable: first_name,
                iterable,
                body,
                location,
            });
        }

        let mut init = vec![self.var_declaration_tail(first_name, false, decl_location)?];
        while self.match_token(TokenType::Comma) {
            let next_location = self.peek().location;
            let next_name = self.consume_identifier()?;
            init.push(self.var_declaration_tail(next_name, false, next_location)?);
        }
        self.consume(TokenType::Semicolon)?;

        let test = self.expression()?;
        self.consume(TokenType::Semicolon)?;

        let mut update = Vec::new();
        if !self.check(&TokenType::RightParen) {
            loop {
                update.push(self.simple_statement()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RightParen)?;

        self.consume(TokenType::LeftBrace)?;
        let body = self.block_statements()?;

        Ok(Stmt::For {
            init,
            test,
            update,
            body,
            location,
        })
    }

    fn switch_statement(&mut self) -> OlcResult<Stmt> {
        let location = self.previous().location;
        self.consume(TokenType::LeftParen)?;
        let subject = self.expression()?;
        self.consume(TokenType::RightParen)?;
        self.consume(TokenType::LeftBrace)?;

        let mut cases = Vec::new();
        let mut defaults = Vec::new();
        loop {
            if self.match_keyword(Keyword::Case) {
                let case_location = self.previous().location;
                let expr = self.expression()?;
                self.consume(TokenType::Colon)?;
                let statements = self.case_statements()?;
                cases.push(CaseClause {
                    expr,
                    statements,
                    location: case_location,
                });
            } else if self.match_keyword(Keyword::Default) {
                let default_location = self.previous().location;
                self.consume(TokenType::Colon)?;
                let statements = self.case_statements()?;
                defaults.push(DefaultClause {
                    statements,
                    location: default_location,
                });
            } else {
                break;
            }
        }
        self.consume(TokenType::RightBrace)?;

        Ok(Stmt::Switch {
            subject,
            cases,
            defaults,
            location,
        })
    }

    fn case_statements(&mut self) -> OlcResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check_keyword(Keyword::Case)
            && !self.check_keyword(Keyword::Default)
            && !self.check(&TokenType::RightBrace)
            && !self.is_at_end()
        {
            statements.push(self.declaration()?);
        }
        Ok(statements)
    }

    /// Parse an assignment or expression statement without the terminating
    /// `;` (shared with the for-loop update list). Assignment targets are
    /// classified by AST shape; compound assignment and `++`/`--` desugar
    /// into plain assignments here.
    fn simple_statement(&mut self) -> OlcResult<Stmt> {
        let expr = self.expression()?;

        if self.match_token(TokenType::Assign) {
            let location = self.previous().location;
            let value = self.expression()?;
            return match expr {
                Expr::Identifier { name, .. } => Ok(Stmt::Assign {
                    name,
                    value,
                    location,
                }),
                Expr::ArrayAccess { array, index, .. } => Ok(Stmt::ArraySet {
                    array: *array,
                    index: *index,
                    value,
                    location,
                }),
                Expr::MemberAccess { object, field, .. } => Ok(Stmt::MemberSet {
                    object: *object,
                    field,
                    value,
                    location,
                }),
                _ => Err(self.error_at_previous()),
            };
        }

        for (token, op) in [
            (TokenType::PlusAssign, BinaryOp::Add),
            (TokenType::MinusAssign, BinaryOp::Subtract),
            (TokenType::StarAssign, BinaryOp::Multiply),
            (TokenType::SlashAssign, BinaryOp::Divide),
            (TokenType::PercentAssign, BinaryOp::Modulo),
        ] {
            if self.match_token(token) {
                let location = self.previous().location;
                let rhs = self.expression()?;
                return self.desugar_assign(expr, op, rhs, location);
            }
        }

        if self.match_token(TokenType::PlusPlus) {
            let location = self.previous().location;
            let one = Expr::Integer { value: 1, location };
            return self.desugar_assign(expr, BinaryOp::Add, one, location);
        }
        if self.match_token(TokenType::MinusMinus) {
            let location = self.previous().location;
            let one = Expr::Integer { value: 1, location };
            return self.desugar_assign(expr, BinaryOp::Subtract, one, location);
        }

        let location = expr.location();
        Ok(Stmt::Expression { expr, location })
    }

    fn desugar_assign(
        &self,
        target: Expr,
        op: BinaryOp,
        rhs: Expr,
        location: Location,
    ) -> OlcResult<Stmt> {
        match target {
            Expr::Identifier { name, location: target_location } => Ok(Stmt::Assign {
                name: name.clone(),
                value: Expr::Binary {
                    left: Box::new(Expr::Identifier {
                        name,
                        location: target_location,
                    }),
                    operator: op,
                    right: Box::new(rhs),
                    location,
                },
                location,
            }),
            _ => Err(self.error_at_previous()),
        }
    }

    fn block_statements(&mut self) -> OlcResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(&TokenType::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        self.consume(TokenType::RightBrace)?;
        Ok(statements)
    }

    // ===== Expressions =====

    fn expression(&mut self) -> OlcResult<Expr> {
        self.ternary()
    }

    fn ternary(&mut self) -> OlcResult<Expr> {
        let condition = self.logic_or()?;

        if self.match_token(TokenType::Question) {
            let location = self.previous().location;
            let then_expr = self.expression()?;
            self.consume(TokenType::Colon)?;
            // Right-associative
            let else_expr = self.expression()?;
            return Ok(Expr::Ternary {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
                location,
            });
        }

        Ok(condition)
    }

    fn logic_or(&mut self) -> OlcResult<Expr> {
        let mut expr = self.logic_and()?;

        while self.match_token(TokenType::OrOr) {
            let location = self.previous().location;
            let right = Box::new(self.logic_and()?);
            expr = Expr::Binary {
                left: Box::new(expr),
                operator: BinaryOp::Or,
                right,
                location,
            };
        }

        Ok(expr)
    }

    fn logic_and(&mut self) -> OlcResult<Expr> {
        let mut expr = self.equality()?;

        while self.match_token(TokenType::AndAnd) {
            let location = self.previous().location;
            let right = Box::new(self.equality()?);
            expr = Expr::Binary {
                left: Box::new(expr),
                operator: BinaryOp::And,
                right,
                location,
            };
        }

        Ok(expr)
    }

    /// Equality is non-associative: at most one application.
    fn equality(&mut self) -> OlcResult<Expr> {
        let expr = self.comparison()?;

        if self.match_tokens(&[TokenType::Equal, TokenType::NotEqual]) {
            let location = self.previous().location;
            let operator = match self.previous().token_type {
                TokenType::Equal => BinaryOp::Equal,
                _ => BinaryOp::NotEqual,
            };
            let right = Box::new(self.comparison()?);
            return Ok(Expr::Binary {
                left: Box::new(expr),
                operator,
                right,
                location,
            });
        }

        Ok(expr)
    }

    /// Relational operators are non-associative: at most one application.
    fn comparison(&mut self) -> OlcResult<Expr> {
        let expr = self.term()?;

        if self.match_tokens(&[
            TokenType::Less,
            TokenType::LessEqual,
            TokenType::Greater,
            TokenType::GreaterEqual,
        ]) {
            let location = self.previous().location;
            let operator = match self.previous().token_type {
                TokenType::Less => BinaryOp::Less,
                TokenType::LessEqual => BinaryOp::LessEqual,
                TokenType::Greater => BinaryOp::Greater,
                _ => BinaryOp::GreaterEqual,
            };
            let right = Box::new(self.term()?);
            return Ok(Expr::Binary {
                left: Box::new(expr),
                operator,
                right,
                location,
            });
        }

        Ok(expr)
    }

    fn term(&mut self) -> OlcResult<Expr> {
        let mut expr = self.factor()?;

        while self.match_tokens(&[TokenType::Plus, TokenType::Minus]) {
            let location = self.previous().location;
            let operator = match self.previous().token_type {
                TokenType::Plus => BinaryOp::Add,
                _ => BinaryOp::Subtract,
            };
            let right = Box::new(self.factor()?);
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right,
                location,
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> OlcResult<Expr> {
        let mut expr = self.unary()?;

        while self.match_tokens(&[TokenType::Star, TokenType::Slash, TokenType::Percent]) {
            let location = self.previous().location;
            let operator = match self.previous().token_type {
                TokenType::Star => BinaryOp::Multiply,
                TokenType::Slash => BinaryOp::Divide,
                _ => BinaryOp::Modulo,
            };
            let right = Box::new(self.unary()?);
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right,
                location,
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> OlcResult<Expr> {
        if self.match_token(TokenType::Minus) {
            let location = self.previous().location;
            let operand = Box::new(self.unary()?);
            return Ok(Expr::Unary {
                operator: UnaryOp::Negate,
                operand,
                location,
            });
        }
        if self.match_token(TokenType::Bang) {
            let location = self.previous().location;
            let operand = Box::new(self.unary()?);
            return Ok(Expr::Unary {
                operator: UnaryOp::Not,
                operand,
                location,
            });
        }
        if self.match_keyword(Keyword::Typeof) {
            let location = self.previous().location;
            let operand = Box::new(self.unary()?);
            return Ok(Expr::TypeOf { operand, location });
        }

        self.postfix()
    }

    /// Calls, member access and subscripts. Member calls against the fixed
    /// builtin name set are rewritten into dedicated nodes here.
    fn postfix(&mut self) -> OlcResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.match_token(TokenType::LeftParen) {
                let location = self.previous().location;
                let args = self.argument_list()?;
                self.consume(TokenType::RightParen)?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    location,
                };
            } else if self.match_token(TokenType::Dot) {
                let location = self.previous().location;
                let field = self.consume_identifier()?;
                expr = self.member_or_builtin(expr, field, location)?;
            } else if self.match_token(TokenType::LeftBracket) {
                let location = self.previous().location;
                let index = Box::new(self.expression()?);
                self.consume(TokenType::RightBracket)?;
                expr = Expr::ArrayAccess {
                    array: Box::new(expr),
                    index,
                    location,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn member_or_builtin(
        &mut self,
        object: Expr,
        field: String,
        location: Location,
    ) -> OlcResult<Expr> {
        if !self.check(&TokenType::LeftParen) {
            return Ok(Expr::MemberAccess {
                object: Box::new(object),
                field,
                location,
            });
        }

        // `Object.keys(...)` / `Object.values(...)`
        if let Expr::Identifier { name, .. } = &object {
            if name == "Object" && (field == "keys" || field == "values") {
                self.consume(TokenType::LeftParen)?;
                let args = self.argument_list()?;
                self.consume(TokenType::RightParen)?;
                return Ok(if field == "keys" {
                    Expr::ObjectKeys { args, location }
                } else {
                    Expr::ObjectValues { args, location }
                });
            }
        }

        let target = Box::new(object);
        match field.as_str() {
            "push" | "pop" | "indexOf" | "join" => {
                self.consume(TokenType::LeftParen)?;
                let args = self.argument_list()?;
                self.consume(TokenType::RightParen)?;
                Ok(match field.as_str() {
                    "push" => Expr::Push {
                        target,
                        args,
                        location,
                    },
                    "pop" => Expr::Pop {
                        target,
                        args,
                        location,
                    },
                    "indexOf" => Expr::IndexOf {
                        target,
                        args,
                        location,
                    },
                    _ => Expr::Join {
                        target,
                        args,
                        location,
                    },
                })
            }
            "length" | "toString" | "toLowerCase" | "toUpperCase" => {
                self.consume(TokenType::LeftParen)?;
                self.consume(TokenType::RightParen)?;
                Ok(match field.as_str() {
                    "length" => Expr::Length { target, location },
                    "toString" => Expr::ToString { target, location },
                    "toLowerCase" => Expr::ToLowerCase { target, location },
                    _ => Expr::ToUpperCase { target, location },
                })
            }
            _ => {
                // Not a builtin: a generic call against a member access,
                // rejected at evaluation time
                self.consume(TokenType::LeftParen)?;
                let args = self.argument_list()?;
                self.consume(TokenType::RightParen)?;
                Ok(Expr::Call {
                    callee: Box::new(Expr::MemberAccess {
                        object: target,
                        field,
                        location,
                    }),
                    args,
                    location,
                })
            }
        }
    }

    fn argument_list(&mut self) -> OlcResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(&TokenType::RightParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        Ok(args)
    }

    fn primary(&mut self) -> OlcResult<Expr> {
        let location = self.peek().location;

        if let TokenType::Literal(lit) = &self.peek().token_type {
            let expr = match lit {
                TokenLiteral::Integer(n) => Expr::Integer {
                    value: *n,
                    location,
                },
                TokenLiteral::Float(f) => Expr::Float {
                    value: *f,
                    location,
                },
                TokenLiteral::Str(s) => Expr::Str {
                    value: s.clone(),
                    location,
                },
                TokenLiteral::Char(c) => Expr::CharLit {
                    raw: c.clone(),
                    location,
                },
            };
            self.advance();
            return Ok(expr);
        }

        if self.match_keyword(Keyword::True) {
            return Ok(Expr::Boolean {
                value: true,
                location,
            });
        }
        if self.match_keyword(Keyword::False) {
            return Ok(Expr::Boolean {
                value: false,
                location,
            });
        }
        if self.match_keyword(Keyword::Null) {
            return Ok(Expr::Null { location });
        }

        if self.match_keyword(Keyword::ParseInt) {
            self.consume(TokenType::LeftParen)?;
            let args = self.argument_list()?;
            self.consume(TokenType::RightParen)?;
            return Ok(Expr::ParseInt { args, location });
        }
        if self.match_keyword(Keyword::ParseFloat) {
            self.consume(TokenType::LeftParen)?;
            let args = self.argument_list()?;
            self.consume(TokenType::RightParen)?;
            return Ok(Expr::ParseFloat { args, location });
        }

        if self.check(&TokenType::Identifier) {
            let name = self.advance().lexeme.clone();
            return Ok(Expr::Identifier { name, location });
        }

        if self.match_token(TokenType::LeftParen) {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen)?;
            return Ok(expr);
        }

        if self.match_token(TokenType::LeftBracket) {
            let mut elements = Vec::new();
            if !self.check(&TokenType::RightBracket) {
                loop {
                    elements.push(self.expression()?);
                    if !self.match_token(TokenType::Comma) {
                        break;
                    }
                }
            }
            self.consume(TokenType::RightBracket)?;
            return Ok(Expr::ArrayLiteral { elements, location });
        }

        if self.match_token(TokenType::LeftBrace) {
            let mut fields = Vec::new();
            if !self.check(&TokenType::RightBrace) {
                loop {
                    let field_name = self.consume_identifier()?;
                    self.consume(TokenType::Colon)?;
                    let value = self.expression()?;
                    fields.push((field_name, value));
                    if !self.match_token(TokenType::Comma) {
                        break;
                    }
                }
            }
            self.consume(TokenType::RightBrace)?;
            return Ok(Expr::InterfaceLiteral { fields, location });
        }

        Err(self.error_here())
    }

    // ===== Type Parsing =====

    /// Type annotation: a type name followed by `[]` per dimension. The
    /// primitive type names are plain identifiers, not reserved words.
    fn parse_type_annotation(&mut self) -> OlcResult<TypeAnnotation> {
        let location = self.peek().location;
        let name = self.consume_identifier()?;

        let mut dims = 0;
        while self.match_token(TokenType::LeftBracket) {
            self.consume(TokenType::RightBracket)?;
            dims += 1;
        }

        Ok(TypeAnnotation {
            name,
            dims,
            location,
        })
    }

    // ===== Helper Methods =====

    /// Skip tokens until a likely statement boundary so parsing can resume
    /// after a syntax error.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.match_token(TokenType::Semicolon) {
                return;
            }
            match &self.peek().token_type {
                TokenType::RightBrace => {
                    self.advance();
                    return;
                }
                TokenType::Keyword(
                    Keyword::Var
                    | Keyword::Const
                    | Keyword::Function
                    | Keyword::Interface
                    | Keyword::If
                    | Keyword::While
                    | Keyword::For
                    | Keyword::Switch
                    | Keyword::Return
                    | Keyword::Console,
                ) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(&token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_tokens(&mut self, types: &[TokenType]) -> bool {
        for t in types {
            if self.check(t) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token_type: &TokenType) -> bool {
        if self.is_at_end() && !matches!(token_type, TokenType::Eof) {
            false
        } else {
            std::mem::discriminant(&self.peek().token_type) == std::mem::discriminant(token_type)
        }
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.peek().token_type, TokenType::Keyword(k) if *k == keyword)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn consume(&mut self, token_type: TokenType) -> OlcResult<&Token> {
        if self.check(&token_type) {
            Ok(self.advance())
        } else {
            Err(self.error_here())
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> OlcResult<&Token> {
        if self.check_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.error_here())
        }
    }

    fn consume_identifier(&mut self) -> OlcResult<String> {
        if self.check(&TokenType::Identifier) {
            Ok(self.advance().lexeme.clone())
        } else {
            Err(self.error_here())
        }
    }

    /// Syntax error at the current token (or the dedicated EOF error)
    fn error_here(&self) -> OlcError {
        self.error_at(self.peek())
    }

    fn error_at_previous(&self) -> OlcError {
        self.error_at(self.previous())
    }

    fn error_at(&self, token: &Token) -> OlcError {
        if matches!(token.token_type, TokenType::Eof) {
            let source_line = self.lines.last().cloned().unwrap_or_default();
            OlcError::syntax_at_eof(token.location.line, 0, source_line, self.file.clone())
        } else {
            let source_line = self
                .lines
                .get(token.location.line - 1)
                .cloned()
                .unwrap_or_default();
            OlcError::syntax(
                &token.lexeme,
                token.location.line,
                token.location.column,
                source_line,
                self.file.clone(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Program, Vec<OlcError>> {
        let (tokens, lex_errors) = Lexer::new(source, "test.olc").tokenize();
        assert!(lex_errors.is_empty(), "lexical errors: {:?}", lex_errors);
        Parser::new(tokens, source, "test.olc").parse()
    }

    fn parse_ok(source: &str) -> Program {
        parse(source).unwrap_or_else(|e| panic!("parse failed: {:?}", e))
    }

    #[test]
    fn test_var_declaration_forms() {
        let program = parse_ok("var x: number = 1; var y = 2; const z: string = \"s\";");
        assert_eq!(program.statements.len(), 3);
        match &program.statements[0] {
            Stmt::VarDecl {
                name,
                type_annotation,
                initializer,
                is_const,
                ..
            } => {
                assert_eq!(name, "x");
                assert_eq!(type_annotation.as_ref().unwrap().name, "number");
                assert!(initializer.is_some());
                assert!(!is_const);
            }
            other => panic!("expected VarDecl, got {:?}", other),
        }
        match &program.statements[1] {
            Stmt::VarDecl { type_annotation, .. } => assert!(type_annotation.is_none()),
            other => panic!("expected VarDecl, got {:?}", other),
        }
        match &program.statements[2] {
            Stmt::VarDecl { is_const, .. } => assert!(is_const),
            other => panic!("expected VarDecl, got {:?}", other),
        }
    }

    #[test]
    fn test_array_type_dims() {
        let program = parse_ok("var m: number[][] = [[1]];");
        match &program.statements[0] {
            Stmt::VarDecl { type_annotation, .. } => {
                let annotation = type_annotation.as_ref().unwrap();
                assert_eq!(annotation.name, "number");
                assert_eq!(annotation.dims, 2);
            }
            other => panic!("expected VarDecl, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let program = parse_ok("var x = 1 + 2 * 3;");
        match &program.statements[0] {
            Stmt::VarDecl {
                initializer: Some(Expr::Binary { operator, right, .. }),
                ..
            } => {
                assert_eq!(*operator, BinaryOp::Add);
                assert!(matches!(
                    right.as_ref(),
                    Expr::Binary {
                        operator: BinaryOp::Multiply,
                        ..
                    }
                ));
            }
            other => panic!("expected binary initializer, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_rewrite_member_calls() {
        let program = parse_ok("a.push(1); a.pop(); a.length(); s.toUpperCase();");
        assert!(matches!(
            &program.statements[0],
            Stmt::Expression {
                expr: Expr::Push { .. },
                ..
            }
        ));
        assert!(matches!(
            &program.statements[1],
            Stmt::Expression {
                expr: Expr::Pop { .. },
                ..
            }
        ));
        assert!(matches!(
            &program.statements[2],
            Stmt::Expression {
                expr: Expr::Length { .. },
                ..
            }
        ));
        assert!(matches!(
            &program.statements[3],
            Stmt::Expression {
                expr: Expr::ToUpperCase { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_builtin_rewrite_object_and_parse() {
        let program = parse_ok("Object.keys(o); Object.values(o); parseInt(\"5\"); parseFloat(\"1.5\");");
        assert!(matches!(
            &program.statements[0],
            Stmt::Expression {
                expr: Expr::ObjectKeys { .. },
                ..
            }
        ));
        assert!(matches!(
            &program.statements[1],
            Stmt::Expression {
                expr: Expr::ObjectValues { .. },
                ..
            }
        ));
        assert!(matches!(
            &program.statements[2],
            Stmt::Expression {
                expr: Expr::ParseInt { .. },
                ..
            }
        ));
        assert!(matches!(
            &program.statements[3],
            Stmt::Expression {
                expr: Expr::ParseFloat { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_increment_desugars_to_assignment() {
        let program = parse_ok("i++;");
        match &program.statements[0] {
            Stmt::Assign { name, value, .. } => {
                assert_eq!(name, "i");
                match value {
                    Expr::Binary {
                        operator, left, right, ..
                    } => {
                        assert_eq!(*operator, BinaryOp::Add);
                        assert!(matches!(left.as_ref(), Expr::Identifier { name, .. } if name == "i"));
                        assert!(matches!(right.as_ref(), Expr::Integer { value: 1, .. }));
                    }
                    other => panic!("expected synthesized binary, got {:?}", other),
                }
            }
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_assign_desugars() {
        let program = parse_ok("x -= 2;");
        match &program.statements[0] {
            Stmt::Assign { name, value, .. } => {
                assert_eq!(name, "x");
                assert!(matches!(
                    value,
                    Expr::Binary {
                        operator: BinaryOp::Subtract,
                        ..
                    }
                ));
            }
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_target_classification() {
        let program = parse_ok("x = 1; a[0] = 2; p.x = 3;");
        assert!(matches!(&program.statements[0], Stmt::Assign { .. }));
        assert!(matches!(&program.statements[1], Stmt::ArraySet { .. }));
        assert!(matches!(&program.statements[2], Stmt::MemberSet { .. }));
    }

    #[test]
    fn test_for_and_for_of() {
        let program = parse_ok(
            "for (var i: number = 0; i < 3; i++) { console.log(i); }\n\
             for (var c of \"abc\") { console.log(c); }",
        );
        match &program.statements[0] {
            Stmt::For { init, update, .. } => {
                assert_eq!(init.len(), 1);
                assert_eq!(update.len(), 1);
            }
            other => panic!("expected For, got {:?}", other),
        }
        assert!(matches!(&program.statements[1], Stmt::ForOf { .. }));
    }

    #[test]
    fn test_switch_collects_all_defaults() {
        let program = parse_ok(
            "switch (x) { case 1: console.log(\"a\"); default: break; default: break; }",
        );
        match &program.statements[0] {
            Stmt::Switch { cases, defaults, .. } => {
                assert_eq!(cases.len(), 1);
                // Both defaults survive the parse; the evaluator rejects the count
                assert_eq!(defaults.len(), 2);
            }
            other => panic!("expected Switch, got {:?}", other),
        }
    }

    #[test]
    fn test_function_and_interface_declarations() {
        let program = parse_ok(
            "function add(a: number, b: number): number { return a + b; }\n\
             interface Point { x: number; y: number; }",
        );
        match &program.statements[0] {
            Stmt::FunctionDecl {
                name,
                params,
                return_type,
                ..
            } => {
                assert_eq!(name, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(return_type.as_ref().unwrap().name, "number");
            }
            other => panic!("expected FunctionDecl, got {:?}", other),
        }
        match &program.statements[1] {
            Stmt::InterfaceDecl { name, fields, .. } => {
                assert_eq!(name, "Point");
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected InterfaceDecl, got {:?}", other),
        }
    }

    #[test]
    fn test_ternary_and_typeof() {
        let program = parse_ok("var x = a > 1 ? typeof b : \"no\";");
        match &program.statements[0] {
            Stmt::VarDecl {
                initializer: Some(Expr::Ternary { then_expr, .. }),
                ..
            } => {
                assert!(matches!(then_expr.as_ref(), Expr::TypeOf { .. }));
            }
            other => panic!("expected ternary initializer, got {:?}", other),
        }
    }

    #[test]
    fn test_error_accumulation_across_statements() {
        let errors = parse("var = 1; var x = 2; const = 3;").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].render().contains("Syntax error: at '='"));
        assert!(errors[1].render().contains("Syntax error: at '='"));
    }

    #[test]
    fn test_eof_error() {
        let errors = parse("var x = ").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].render().contains("OLC666: Syntax error at EOF"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let source = "var a: number[] = [1, 2, 3];\nconsole.log(a[1]);";
        let first = parse_ok(source);
        let second = parse_ok(source);
        assert_eq!(first, second);
    }
}
