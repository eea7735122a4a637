//! Tree-walking evaluator
//!
//! Statements produce a `Flow` value: normal completion, or one of the
//! three travelling signals (break, continue, return-with-value). Every
//! construct that opens a scope pushes a context onto the arena and asks
//! the context chain whether a signal is legal where it appears, so an
//! illegal `break` or `return` is a runtime error at the statement itself
//! rather than a silently swallowed signal.

use std::collections::HashMap;

use crate::error::{OlcError, RuntimeError};
use crate::lexer::Location;
use crate::parser::{
    BinaryOp, Expr, Param, Program, Stmt, TypeAnnotation, UnaryOp,
};
use crate::types::{rules, TypeRegistry, TypeSpec};

use super::context::{ContextArena, ContextId, ContextKind, Definition, Entry};
use super::symbols::{Symbol, SymbolTable};
use super::value::{ArrayValue, InterfaceValue, Value};

/// Result of executing one statement
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

type ExecResult = Result<Flow, RuntimeError>;
type EvalResult = Result<Value, RuntimeError>;

#[derive(Debug, Clone)]
struct FunctionDef {
    params: Vec<Param>,
    return_type: Option<TypeAnnotation>,
    body: Vec<Stmt>,
}

/// Evaluator state for a single run. Functions, interfaces and symbols
/// are all per-run; nothing survives between programs.
pub struct Interpreter {
    contexts: ContextArena,
    functions: HashMap<String, FunctionDef>,
    types: TypeRegistry,
    symbols: SymbolTable,
    log: Vec<String>,
    errors: Vec<String>,
    lines: Vec<String>,
    file: String,
}

impl Interpreter {
    pub fn new(source: &str, file: &str) -> Self {
        Self {
            contexts: ContextArena::new(),
            functions: HashMap::new(),
            types: TypeRegistry::new(),
            symbols: SymbolTable::new(),
            log: Vec::new(),
            errors: Vec::new(),
            lines: source.lines().map(|l| l.to_string()).collect(),
            file: file.to_string(),
        }
    }

    /// Run the program. Evaluation stops at the first runtime error; the
    /// rendered error joins both the console log and the error list.
    pub fn evaluate(&mut self, program: &Program) {
        for stmt in &program.statements {
            if let Err(err) = self.exec_stmt(stmt, ContextArena::GLOBAL) {
                let rendered = OlcError::from(err).render();
                self.log.push(rendered.clone());
                self.errors.push(rendered);
                return;
            }
        }
    }

    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }

    pub fn errors_text(&self) -> String {
        self.errors.join("\n")
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn symbols_report(&self) -> String {
        if self.symbols.is_empty() {
            String::new()
        } else {
            self.symbols.report()
        }
    }

    // ===== Statements =====

    fn exec_block(&mut self, statements: &[Stmt], ctx: ContextId) -> ExecResult {
        for stmt in statements {
            match self.exec_stmt(stmt, ctx)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, ctx: ContextId) -> ExecResult {
        match stmt {
            Stmt::VarDecl {
                name,
                type_annotation,
                initializer,
                is_const,
                location,
            } => self.exec_var_decl(
                name,
                type_annotation.as_ref(),
                initializer.as_ref(),
                *is_const,
                *location,
                ctx,
            ),
            Stmt::Assign {
                name,
                value,
                location,
            } => self.exec_assign(name, value, *location, ctx),
            Stmt::ArraySet {
                array,
                index,
                value,
                location,
            } => self.exec_array_set(array, index, value, *location, ctx),
            Stmt::MemberSet {
                object,
                field,
                value,
                location,
            } => self.exec_member_set(object, field, value, *location, ctx),
            Stmt::Expression { expr, .. } => {
                self.eval_expr(expr, ctx)?;
                Ok(Flow::Normal)
            }
            Stmt::ConsoleLog { args, .. } => {
                let mut parts = Vec::with_capacity(args.len());
                for arg in args {
                    parts.push(self.eval_expr(arg, ctx)?.display());
                }
                self.log.push(parts.join(" "));
                Ok(Flow::Normal)
            }
            Stmt::If {
                condition,
                then_block,
                else_block,
                location,
            } => self.exec_if(condition, then_block, else_block.as_deref(), *location, ctx),
            Stmt::While {
                condition,
                body,
                location,
            } => self.exec_while(condition, body, *location, ctx),
            Stmt::For {
                init,
                test,
                update,
                body,
                location,
            } => self.exec_for(init, test, update, body, *location, ctx),
            Stmt::ForOf {
                variable,
                iterable,
                body,
                location,
            } => self.exec_for_of(variable, iterable, body, *location, ctx),
            Stmt::Switch {
                subject,
                cases,
                defaults,
                location,
            } => self.exec_switch(subject, cases, defaults, *location, ctx),
            Stmt::Break { location } => {
                if !self.contexts.is_break_allowed(ctx) {
                    return Err(self.error(
                        ctx,
                        *location,
                        "SyntaxError",
                        "'break' outside of switch/case or loop".to_string(),
                    ));
                }
                Ok(Flow::Break)
            }
            Stmt::Continue { location } => {
                if !self.contexts.is_continue_allowed(ctx) {
                    return Err(self.error(
                        ctx,
                        *location,
                        "SyntaxError",
                        "'continue' outside of loop".to_string(),
                    ));
                }
                Ok(Flow::Continue)
            }
            Stmt::Return { value, location } => {
                if !self.contexts.is_return_allowed(ctx) {
                    return Err(self.error(
                        ctx,
                        *location,
                        "OLC4122",
                        "'return' outside of function.".to_string(),
                    ));
                }
                let result = match value {
                    Some(expr) => self.eval_expr(expr, ctx)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(result))
            }
            Stmt::FunctionDecl {
                name,
                params,
                return_type,
                body,
                location,
            } => self.exec_function_decl(name, params, return_type.as_ref(), body, *location, ctx),
            Stmt::InterfaceDecl {
                name,
                fields,
                location,
            } => self.exec_interface_decl(name, fields, *location, ctx),
        }
    }

    fn exec_var_decl(
        &mut self,
        name: &str,
        type_annotation: Option<&TypeAnnotation>,
        initializer: Option<&Expr>,
        is_const: bool,
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        if is_const && initializer.is_none() {
            return Err(self.error(
                ctx,
                location,
                "OLC1155",
                "constant expressions must be initialized".to_string(),
            ));
        }
        let initializer = match initializer {
            Some(expr) => expr,
            None => {
                return Err(self.error(
                    ctx,
                    location,
                    "OLC1155",
                    "must provide a type and an init expression for the declaration".to_string(),
                ));
            }
        };

        let declared = match type_annotation {
            Some(annotation) => Some(self.resolve_annotation(annotation, ctx)?),
            None => None,
        };

        if self.contexts.has_local(ctx, name) {
            return Err(self.error(
                ctx,
                location,
                "OLC2020",
                format!("name '{}' is already defined.", name),
            ));
        }

        let mut value = self.eval_expr(initializer, ctx)?;

        // an interface-typed declaration validates the literal's fields
        // against the definition and stamps the type name on the value
        if let Some(TypeSpec::Interface {
            name: interface_name,
        }) = &declared
        {
            if let Value::Interface(interface_value) = &mut value {
                Self::check_interface_shape(
                    &self.types,
                    &self.lines,
                    &self.contexts,
                    &self.file,
                    ctx,
                    interface_name,
                    interface_value,
                    location,
                )?;
            }
        }

        let declared_type = match declared {
            Some(target) => {
                adopt_declared_array(&target, &mut value);
                let source = value.type_spec();
                if !rules::is_assignable(&target, &source) {
                    let annotation_location = type_annotation
                        .map(|a| a.location)
                        .unwrap_or(location);
                    return Err(self.error(
                        ctx,
                        annotation_location,
                        "OLC1155",
                        rules::assignment_mismatch(&source, &target),
                    ));
                }
                target
            }
            None => value.type_spec(),
        };

        let definition = if is_const {
            Definition::Constant
        } else {
            Definition::Variable
        };

        self.symbols.insert(Symbol::new(
            name,
            definition.as_str(),
            value.type_spec().render(),
            self.contexts.display_name(ctx),
            location.line,
            location.column,
        ));

        self.contexts.define(
            ctx,
            name,
            Entry {
                definition,
                declared_type,
                value,
                line: location.line,
                column: location.column,
            },
        );
        Ok(Flow::Normal)
    }

    fn exec_assign(
        &mut self,
        name: &str,
        value_expr: &Expr,
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        let (definition, declared_type) = match self.contexts.lookup(ctx, name) {
            Some(entry) => (entry.definition, entry.declared_type.clone()),
            None => {
                return Err(self.error(
                    ctx,
                    location,
                    "TypeError",
                    format!("'{}' is not defined.", name),
                ));
            }
        };
        if definition == Definition::Constant {
            return Err(self.error(
                ctx,
                location,
                "OLC2588",
                format!("cannot assign to '{}' because is a constant", name),
            ));
        }

        let mut value = self.eval_expr(value_expr, ctx)?;
        adopt_declared_array(&declared_type, &mut value);
        let source = value.type_spec();
        if !rules::is_assignable(&declared_type, &source) {
            return Err(self.error(
                ctx,
                location,
                "OLC1155",
                rules::assignment_mismatch(&source, &declared_type),
            ));
        }

        if let Some(entry) = self.contexts.lookup_mut(ctx, name) {
            entry.value = value;
        }
        Ok(Flow::Normal)
    }

    fn exec_array_set(
        &mut self,
        array_expr: &Expr,
        index_expr: &Expr,
        value_expr: &Expr,
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        let target = self.eval_expr(array_expr, ctx)?;
        let mut array = match target {
            Value::Array(array) => array,
            other => {
                return Err(self.error(
                    ctx,
                    location,
                    "OLC5111",
                    format!("'{}' is not subscriptable", other.type_spec().render()),
                ));
            }
        };

        let index = match self.eval_expr(index_expr, ctx)? {
            Value::Number(n) => n,
            _ => {
                return Err(self.error(ctx, location, "OLC5111", "invalid index".to_string()));
            }
        };
        if index < 0 || index as usize >= array.elements.len() {
            return Err(self.error(
                ctx,
                location,
                "OLC5111",
                "index out of bounds.".to_string(),
            ));
        }
        let index = index as usize;

        let value = self.eval_expr(value_expr, ctx)?;
        let current = array.elements[index].type_spec();
        let source = value.type_spec();
        if !rules::is_assignable(&current, &source) {
            return Err(self.error(
                ctx,
                location,
                "OLC1155",
                rules::assignment_mismatch(&source, &current),
            ));
        }

        array.elements[index] = value;
        self.write_place(array_expr, Value::Array(array), ctx)?;
        Ok(Flow::Normal)
    }

    fn exec_member_set(
        &mut self,
        object_expr: &Expr,
        field: &str,
        value_expr: &Expr,
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        let target = self.eval_expr(object_expr, ctx)?;
        let mut interface = match target {
            Value::Interface(interface) => interface,
            _ => {
                return Err(self.error(
                    ctx,
                    location,
                    "OLC6614",
                    "only interfaces have fields.".to_string(),
                ));
            }
        };

        let current = match interface.get(field) {
            Some(value) => value.type_spec(),
            None => {
                let type_name = Value::Interface(interface.clone()).type_spec().render();
                return Err(self.error(
                    ctx,
                    location,
                    "OLC6618",
                    format!("'{}' is not a field of '{}'", field, type_name),
                ));
            }
        };

        let value = self.eval_expr(value_expr, ctx)?;
        let source = value.type_spec();
        if !rules::is_assignable(&current, &source) {
            return Err(self.error(
                ctx,
                location,
                "OLC1155",
                rules::assignment_mismatch(&source, &current),
            ));
        }

        interface.set(field, value);
        self.write_place(object_expr, Value::Interface(interface), ctx)?;
        Ok(Flow::Normal)
    }

    /// Write a mutated aggregate back into the place an expression names.
    /// Mutations of temporaries are dropped silently, the same way they
    /// would vanish in the source language.
    fn write_place(&mut self, expr: &Expr, value: Value, ctx: ContextId) -> Result<(), RuntimeError> {
        match expr {
            Expr::Identifier { name, .. } => {
                if let Some(entry) = self.contexts.lookup_mut(ctx, name) {
                    entry.value = value;
                }
                Ok(())
            }
            Expr::ArrayAccess { array, index, .. } => {
                let parent = self.eval_expr(array, ctx)?;
                let index_value = self.eval_expr(index, ctx)?;
                if let (Value::Array(mut parent_array), Value::Number(n)) = (parent, index_value) {
                    if n >= 0 && (n as usize) < parent_array.elements.len() {
                        parent_array.elements[n as usize] = value;
                        self.write_place(array, Value::Array(parent_array), ctx)?;
                    }
                }
                Ok(())
            }
            Expr::MemberAccess { object, field, .. } => {
                let parent = self.eval_expr(object, ctx)?;
                if let Value::Interface(mut parent_interface) = parent {
                    if parent_interface.set(field, value) {
                        self.write_place(object, Value::Interface(parent_interface), ctx)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn exec_if(
        &mut self,
        condition: &Expr,
        then_block: &[Stmt],
        else_block: Option<&[Stmt]>,
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        let test = self.eval_expr(condition, ctx)?;
        let test = match test {
            Value::Boolean(b) => b,
            other => {
                return Err(self.error(
                    ctx,
                    location,
                    "OLC3411",
                    format!(
                        "'{}' is not a valid type for 'if' test expression, required 'boolean'.",
                        other.type_spec().render()
                    ),
                ));
            }
        };

        if test {
            let if_ctx = self.contexts.push(ContextKind::If, "if", ctx, location.line);
            self.exec_block(then_block, if_ctx)
        } else if let Some(block) = else_block {
            let else_ctx = self.contexts.push(ContextKind::If, "if", ctx, location.line);
            self.exec_block(block, else_ctx)
        } else {
            Ok(Flow::Normal)
        }
    }

    fn exec_while(
        &mut self,
        condition: &Expr,
        body: &[Stmt],
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        loop {
            let test = match self.eval_expr(condition, ctx)? {
                Value::Boolean(b) => b,
                other => {
                    return Err(self.error(
                        ctx,
                        location,
                        "OLC2588",
                        format!(
                            "while test condition must be of type 'boolean', got {}",
                            other.type_spec().render()
                        ),
                    ));
                }
            };
            if !test {
                break;
            }

            let body_ctx = self
                .contexts
                .push(ContextKind::While, "while", ctx, location.line);
            match self.exec_block(body, body_ctx)? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_for(
        &mut self,
        init: &[Stmt],
        test: &Expr,
        update: &[Stmt],
        body: &[Stmt],
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        let for_ctx = self
            .contexts
            .push(ContextKind::For, "for", ctx, location.line);
        for declaration in init {
            self.exec_stmt(declaration, for_ctx)?;
        }

        loop {
            // a non-boolean test ends the loop rather than erroring
            if !matches!(self.eval_expr(test, for_ctx)?, Value::Boolean(true)) {
                break;
            }

            let body_ctx = self
                .contexts
                .push(ContextKind::For, "for", for_ctx, location.line);
            match self.exec_block(body, body_ctx)? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
            }

            for assignment in update {
                self.exec_stmt(assignment, for_ctx)?;
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_for_of(
        &mut self,
        variable: &str,
        iterable: &Expr,
        body: &[Stmt],
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        let source = self.eval_expr(iterable, ctx)?;
        let elements: Vec<Value> = match source {
            Value::Array(array) => array.elements,
            Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
            other => {
                return Err(self.error(
                    ctx,
                    location,
                    "TypeError",
                    format!("'{}' is not subscriptable", other.type_spec().render()),
                ));
            }
        };
        if elements.is_empty() {
            return Ok(Flow::Normal);
        }

        let for_ctx = self
            .contexts
            .push(ContextKind::For, "for", ctx, location.line);
        self.contexts.define(
            for_ctx,
            variable,
            Entry {
                definition: Definition::Constant,
                declared_type: elements[0].type_spec(),
                value: elements[0].clone(),
                line: location.line,
                column: location.column,
            },
        );

        for element in elements {
            if let Some(entry) = self.contexts.lookup_mut(for_ctx, variable) {
                entry.value = element;
            }
            let body_ctx = self
                .contexts
                .push(ContextKind::For, "for", for_ctx, location.line);
            match self.exec_block(body, body_ctx)? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_switch(
        &mut self,
        subject: &Expr,
        cases: &[crate::parser::CaseClause],
        defaults: &[crate::parser::DefaultClause],
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        if defaults.len() != 1 {
            return Err(self.error(
                ctx,
                location,
                "SwitchError",
                "Switch with no cases or too many default cases".to_string(),
            ));
        }

        let subject_value = self.eval_expr(subject, ctx)?;
        let mut matched = false;

        for case in cases {
            if !matched {
                let case_value = self.eval_expr(&case.expr, ctx)?;
                if !values_equal(&subject_value, &case_value) {
                    continue;
                }
                matched = true;
            }
            // fallthrough: once matched, later cases run without testing
            let case_ctx = self
                .contexts
                .push(ContextKind::Case, "case", ctx, location.line);
            match self.exec_block(&case.statements, case_ctx)? {
                Flow::Normal => {}
                Flow::Break => return Ok(Flow::Normal),
                other => return Ok(other),
            }
        }

        if !matched {
            let case_ctx = self
                .contexts
                .push(ContextKind::Case, "case", ctx, location.line);
            match self.exec_block(&defaults[0].statements, case_ctx)? {
                Flow::Normal | Flow::Break => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_function_decl(
        &mut self,
        name: &str,
        params: &[Param],
        return_type: Option<&TypeAnnotation>,
        body: &[Stmt],
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        if self.functions.contains_key(name) {
            return Err(self.error(
                ctx,
                location,
                "OLC1222",
                format!("function {} is already defined", name),
            ));
        }

        let return_type_name = match return_type {
            Some(annotation) => self.resolve_annotation(annotation, ctx)?.render(),
            None => "undefined".to_string(),
        };

        let mut seen = Vec::new();
        for param in params {
            if seen.contains(&param.name.as_str()) {
                return Err(self.error(
                    ctx,
                    param.location,
                    "OLC1224",
                    format!("parameter {} is already defined", param.name),
                ));
            }
            seen.push(param.name.as_str());
        }

        self.symbols.insert(Symbol::new(
            name,
            "function",
            return_type_name,
            self.contexts.display_name(ctx),
            location.line,
            location.column,
        ));
        for param in params {
            let param_type = self.resolve_annotation(&param.type_annotation, ctx)?;
            self.symbols.insert(Symbol::new(
                param.name.clone(),
                Definition::Parameter.as_str(),
                param_type.render(),
                name,
                param.location.line,
                param.location.column,
            ));
        }

        self.functions.insert(
            name.to_string(),
            FunctionDef {
                params: params.to_vec(),
                return_type: return_type.cloned(),
                body: body.to_vec(),
            },
        );
        Ok(Flow::Normal)
    }

    fn exec_interface_decl(
        &mut self,
        name: &str,
        fields: &[crate::parser::FieldDecl],
        location: Location,
        ctx: ContextId,
    ) -> ExecResult {
        let interface_ctx = self
            .contexts
            .push(ContextKind::Interface, name, ctx, location.line);

        let mut resolved: Vec<(String, TypeSpec)> = Vec::new();
        let mut field_symbols = Vec::new();
        for field in fields {
            if resolved.iter().any(|(n, _)| n == &field.name) {
                return Err(self.error(
                    interface_ctx,
                    location,
                    "OLC2145",
                    "field is already declared in interface".to_string(),
                ));
            }
            let field_type = self.resolve_annotation(&field.field_type, interface_ctx)?;
            field_symbols.push(Symbol::new(
                field.name.clone(),
                "field",
                field_type.render(),
                name,
                field.location.line,
                field.location.column,
            ));
            resolved.push((field.name.clone(), field_type));
        }

        self.types.define_interface(name, resolved);

        self.symbols.insert(Symbol::new(
            name,
            "interface",
            name,
            self.contexts.display_name(ctx),
            location.line,
            location.column,
        ));
        for symbol in field_symbols {
            self.symbols.insert(symbol);
        }
        Ok(Flow::Normal)
    }

    // ===== Expressions =====

    fn eval_expr(&mut self, expr: &Expr, ctx: ContextId) -> EvalResult {
        match expr {
            Expr::Integer { value, .. } => Ok(Value::Number(*value)),
            Expr::Float { value, .. } => Ok(Value::Float(*value)),
            Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expr::Boolean { value, .. } => Ok(Value::Boolean(*value)),
            Expr::Null { .. } => Ok(Value::Null),
            Expr::CharLit { raw, location } => self.eval_char_literal(raw, *location, ctx),
            Expr::Identifier { name, location } => {
                match self.contexts.lookup(ctx, name) {
                    Some(entry) => Ok(entry.value.clone()),
                    None => Err(self.error(
                        ctx,
                        *location,
                        "NameError",
                        format!("name '{}' is not defined.", name),
                    )),
                }
            }
            Expr::Binary {
                left,
                operator,
                right,
                location,
            } => self.eval_binary(left, *operator, right, *location, ctx),
            Expr::Unary {
                operator,
                operand,
                location,
            } => self.eval_unary(*operator, operand, *location, ctx),
            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                let test = self.eval_expr(condition, ctx)?;
                match test {
                    Value::Boolean(true) => self.eval_expr(then_expr, ctx),
                    Value::Boolean(false) => self.eval_expr(else_expr, ctx),
                    _ => Err(self.error(
                        ctx,
                        condition.location(),
                        "TypeError",
                        "not a boolean expression for ternary operator".to_string(),
                    )),
                }
            }
            Expr::TypeOf { operand, .. } => {
                let value = self.eval_expr(operand, ctx)?;
                Ok(Value::Str(value.type_spec().render()))
            }
            Expr::Call {
                callee,
                args,
                location,
            } => self.eval_call(callee, args, *location, ctx),
            Expr::ArrayLiteral { elements, location } => {
                self.eval_array_literal(elements, *location, ctx)
            }
            Expr::InterfaceLiteral { fields, location } => {
                self.eval_interface_literal(fields, *location, ctx)
            }
            Expr::ArrayAccess {
                array,
                index,
                location,
            } => self.eval_array_access(array, index, *location, ctx),
            Expr::MemberAccess {
                object,
                field,
                location,
            } => self.eval_member_access(object, field, *location, ctx),
            Expr::Push {
                target,
                args,
                location,
            } => self.eval_push(target, args, *location, ctx),
            Expr::Pop { target, location, .. } => self.eval_pop(target, *location, ctx),
            Expr::IndexOf {
                target,
                args,
                location,
            } => self.eval_index_of(target, args, *location, ctx),
            Expr::Join { target, location, .. } => {
                let array = self.expect_array(target, *location, ctx)?;
                let parts: Vec<String> = array.elements.iter().map(|e| e.display()).collect();
                Ok(Value::Str(parts.join(",")))
            }
            Expr::Length { target, location } => {
                let array = self.expect_array(target, *location, ctx)?;
                Ok(Value::Number(array.elements.len() as i64))
            }
            Expr::ToString { target, .. } => {
                let value = self.eval_expr(target, ctx)?;
                Ok(Value::Str(value.repr()))
            }
            Expr::ToLowerCase { target, location } => {
                match self.eval_expr(target, ctx)? {
                    Value::Str(s) => Ok(Value::Str(s.to_lowercase())),
                    _ => Err(self.error(
                        ctx,
                        *location,
                        "OLC7715",
                        "invalid type for toLowerCase()".to_string(),
                    )),
                }
            }
            Expr::ToUpperCase { target, location } => {
                match self.eval_expr(target, ctx)? {
                    Value::Str(s) => Ok(Value::Str(s.to_uppercase())),
                    _ => Err(self.error(
                        ctx,
                        *location,
                        "OLC7715",
                        "invalid type for toUpperCase()".to_string(),
                    )),
                }
            }
            Expr::ObjectKeys { args, location } => {
                let interface = self.expect_interface_arg(args, *location, ctx)?;
                let keys = interface
                    .fields
                    .iter()
                    .map(|(name, _)| Value::Str(name.clone()))
                    .collect();
                Ok(string_array(keys))
            }
            Expr::ObjectValues { args, location } => {
                let interface = self.expect_interface_arg(args, *location, ctx)?;
                let values = interface
                    .fields
                    .iter()
                    .map(|(_, value)| match value {
                        Value::Interface(nested) => {
                            let type_name = nested
                                .type_name
                                .clone()
                                .unwrap_or_else(|| "interface".to_string());
                            Value::Str(format!("[{}: interface]", type_name))
                        }
                        other => Value::Str(other.display()),
                    })
                    .collect();
                Ok(string_array(values))
            }
            Expr::ParseInt { args, location } => self.eval_parse_int(args, *location, ctx),
            Expr::ParseFloat { args, location } => self.eval_parse_float(args, *location, ctx),
        }
    }

    fn eval_char_literal(&mut self, raw: &str, location: Location, ctx: ContextId) -> EvalResult {
        let mut chars = raw.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Value::Char(c));
        }
        let escaped = match raw {
            "\\a" => Some('\u{7}'),
            "\\b" => Some('\u{8}'),
            "\\t" => Some('\t'),
            "\\n" => Some('\n'),
            "\\v" => Some('\u{b}'),
            "\\f" => Some('\u{c}'),
            "\\r" => Some('\r'),
            "\\\\" => Some('\\'),
            "\\'" => Some('\''),
            _ => None,
        };
        match escaped {
            Some(c) => Ok(Value::Char(c)),
            None => Err(self.error(
                ctx,
                location,
                "OLC1233",
                format!("invalid character literal '{}'", raw),
            )),
        }
    }

    fn eval_binary(
        &mut self,
        left_expr: &Expr,
        operator: BinaryOp,
        right_expr: &Expr,
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        let left = self.eval_expr(left_expr, ctx)?;
        let right = self.eval_expr(right_expr, ctx)?;
        let op = operator.as_str();

        let type_error = |me: &Self, name: &str| {
            me.error(
                ctx,
                location,
                name,
                rules::unsupported_operands(op, &left.type_spec(), &right.type_spec()),
            )
        };

        match operator {
            BinaryOp::Add => match (&left, &right) {
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                _ => match (left.as_float(), right.as_float()) {
                    (Some(a), Some(b)) => Ok(Value::Float(a + b)),
                    _ => Err(type_error(self, "TypeError")),
                },
            },
            BinaryOp::Subtract | BinaryOp::Multiply => {
                match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(
                        if operator == BinaryOp::Subtract { a - b } else { a * b },
                    )),
                    _ => match (left.as_float(), right.as_float()) {
                        (Some(a), Some(b)) => Ok(Value::Float(
                            if operator == BinaryOp::Subtract { a - b } else { a * b },
                        )),
                        _ => Err(type_error(self, "TypeError")),
                    },
                }
            }
            BinaryOp::Divide => {
                let (a, b) = match (left.as_float(), right.as_float()) {
                    (Some(a), Some(b)) => (a, b),
                    _ => return Err(type_error(self, "TypeError")),
                };
                if b == 0.0 {
                    return Err(self.error(
                        ctx,
                        location,
                        "OLC1010",
                        "Division by 0".to_string(),
                    ));
                }
                let result = a / b;
                let any_float =
                    matches!(left, Value::Float(_)) || matches!(right, Value::Float(_));
                if result.fract() == 0.0 && !any_float {
                    Ok(Value::Number(result as i64))
                } else {
                    Ok(Value::Float(result))
                }
            }
            BinaryOp::Modulo => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => {
                    if *b == 0 {
                        Err(self.error(ctx, location, "OLC1010", "Division by 0".to_string()))
                    } else {
                        // sign follows the divisor
                        Ok(Value::Number((a % b + b) % b))
                    }
                }
                _ => Err(type_error(self, "OLC2220")),
            },
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                let ordering = match (&left, &right) {
                    (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
                    (Value::Char(a), Value::Char(b)) => a.partial_cmp(b),
                    _ => match (left.as_float(), right.as_float()) {
                        (Some(a), Some(b)) => a.partial_cmp(&b),
                        _ => return Err(type_error(self, "TypeMismatchError")),
                    },
                };
                let ordering = match ordering {
                    Some(ordering) => ordering,
                    None => return Ok(Value::Boolean(false)),
                };
                Ok(Value::Boolean(match operator {
                    BinaryOp::Less => ordering.is_lt(),
                    BinaryOp::LessEqual => ordering.is_le(),
                    BinaryOp::Greater => ordering.is_gt(),
                    _ => ordering.is_ge(),
                }))
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                let comparable = matches!(
                    (&left, &right),
                    (Value::Str(_), Value::Str(_))
                        | (Value::Char(_), Value::Char(_))
                        | (Value::Boolean(_), Value::Boolean(_))
                ) || (left.as_float().is_some() && right.as_float().is_some());
                if !comparable {
                    return Err(type_error(self, "TypeError"));
                }
                let equal = values_equal(&left, &right);
                Ok(Value::Boolean(if operator == BinaryOp::Equal {
                    equal
                } else {
                    !equal
                }))
            }
            BinaryOp::And | BinaryOp::Or => match (&left, &right) {
                (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(
                    if operator == BinaryOp::And { *a && *b } else { *a || *b },
                )),
                _ => Err(type_error(self, "TypeError")),
            },
        }
    }

    fn eval_unary(
        &mut self,
        operator: UnaryOp,
        operand: &Expr,
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        let value = self.eval_expr(operand, ctx)?;
        match operator {
            UnaryOp::Negate => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                Value::Float(f) => Ok(Value::Float(-f)),
                other => Err(self.error(
                    ctx,
                    location,
                    "OLC2011",
                    format!(
                        "unsupported operand type for '-': {}",
                        other.type_spec().render()
                    ),
                )),
            },
            UnaryOp::Not => match value {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                other => Err(self.error(
                    ctx,
                    location,
                    "OLC2020",
                    format!(
                        "unsupported operand type for '!': {}",
                        other.type_spec().render()
                    ),
                )),
            },
        }
    }

    fn eval_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        let name = match callee {
            Expr::Identifier { name, .. } => name.clone(),
            _ => {
                return Err(self.error(
                    ctx,
                    location,
                    "OLC1223",
                    "Invalid call expression.".to_string(),
                ));
            }
        };

        let function = match self.functions.get(&name) {
            Some(def) => def.clone(),
            None => {
                return Err(self.error(
                    ctx,
                    location,
                    "OLC1224",
                    format!("Function '{}' is not defined.", name),
                ));
            }
        };

        if args.len() != function.params.len() {
            return Err(self.error(
                ctx,
                location,
                "OLC1225",
                format!(
                    "Too few or too many arguments in function call, {} given, {} expected",
                    args.len(),
                    function.params.len()
                ),
            ));
        }

        let mut bound = Vec::with_capacity(args.len());
        for (arg, param) in args.iter().zip(&function.params) {
            let value = self.eval_expr(arg, ctx)?;
            let param_type = self.resolve_annotation(&param.type_annotation, ctx)?;
            let source = value.type_spec();
            if !rules::is_assignable(&param_type, &source) {
                return Err(self.error(
                    ctx,
                    param.type_annotation.location,
                    "OLC1155",
                    rules::assignment_mismatch(&source, &param_type),
                ));
            }
            bound.push((param, value, param_type));
        }

        let return_type = match &function.return_type {
            Some(annotation) => Some(self.resolve_annotation(annotation, ctx)?),
            None => None,
        };

        let function_ctx = self
            .contexts
            .push(ContextKind::Function, &name, ctx, location.line);
        for (param, value, param_type) in bound {
            self.contexts.define(
                function_ctx,
                &param.name,
                Entry {
                    definition: Definition::Parameter,
                    declared_type: param_type,
                    value,
                    line: param.location.line,
                    column: param.location.column,
                },
            );
        }

        match self.exec_block(&function.body, function_ctx)? {
            Flow::Return(value) => {
                match &return_type {
                    Some(target) => {
                        let source = value.type_spec();
                        if !rules::is_assignable(target, &source) {
                            return Err(self.error(
                                ctx,
                                location,
                                "OLC1155",
                                rules::assignment_mismatch(&source, target),
                            ));
                        }
                    }
                    None => {
                        if value != Value::Undefined {
                            return Err(self.error(
                                ctx,
                                location,
                                "OLC1225",
                                format!("function '{}' SHOULD NOT return a value", name),
                            ));
                        }
                    }
                }
                Ok(value)
            }
            _ => {
                if return_type.is_some() {
                    Err(self.error(
                        ctx,
                        location,
                        "OLC1225",
                        format!("function '{}' must return a value", name),
                    ))
                } else {
                    Ok(Value::Undefined)
                }
            }
        }
    }

    fn eval_array_literal(
        &mut self,
        elements: &[Expr],
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(self.eval_expr(element, ctx)?);
        }

        let invalid = || {
            self.error(
                ctx,
                location,
                "TypeError",
                "Invalid array expression.".to_string(),
            )
        };

        // homogeneity over leaf element types
        let mut leaf_names = Vec::new();
        collect_leaf_type_names(&values, &mut leaf_names);
        let all_interfaces = !values.is_empty()
            && values.iter().all(|v| matches!(v, Value::Interface(_)));
        if leaf_names.len() > 1 && !all_interfaces {
            return Err(invalid());
        }
        let base = leaf_names
            .into_iter()
            .next()
            .unwrap_or_else(|| "undefined".to_string());

        let dims = 1 + match values.first() {
            Some(Value::Array(inner)) => inner.dims,
            _ => 0,
        };
        if dims > 1 {
            for value in &values {
                match value {
                    Value::Array(inner) if inner.dims == dims - 1 => {}
                    _ => return Err(invalid()),
                }
            }
        }

        let mut array = ArrayValue {
            elements: values,
            base,
            dims,
        };
        propagate_base(&mut array);
        Ok(Value::Array(array))
    }

    fn eval_interface_literal(
        &mut self,
        fields: &[(String, Expr)],
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        let mut evaluated: Vec<(String, Value)> = Vec::with_capacity(fields.len());
        for (name, expr) in fields {
            if evaluated.iter().any(|(n, _)| n == name) {
                return Err(self.error(
                    ctx,
                    location,
                    "TypeError",
                    format!("'{}' is already declared in interface", name),
                ));
            }
            let value = self.eval_expr(expr, ctx)?;
            evaluated.push((name.clone(), value));
        }
        Ok(Value::Interface(InterfaceValue {
            type_name: None,
            fields: evaluated,
        }))
    }

    fn eval_array_access(
        &mut self,
        array_expr: &Expr,
        index_expr: &Expr,
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        let target = self.eval_expr(array_expr, ctx)?;
        let array = match target {
            Value::Array(array) => array,
            other => {
                return Err(self.error(
                    ctx,
                    location,
                    "TypeError",
                    format!("'{}' type is not subscriptable", other.type_spec().render()),
                ));
            }
        };

        let index_value = self.eval_expr(index_expr, ctx)?;
        let index = match index_value {
            Value::Number(n) => n,
            other => {
                return Err(self.error(
                    ctx,
                    location,
                    "TypeError",
                    format!("'{}' is not a valid index", other.display()),
                ));
            }
        };
        if index < 0 || index as usize >= array.elements.len() {
            return Err(self.error(
                ctx,
                location,
                "IndexError",
                "Array index out of bounds.".to_string(),
            ));
        }
        Ok(array.elements[index as usize].clone())
    }

    fn eval_member_access(
        &mut self,
        object_expr: &Expr,
        field: &str,
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        let object = self.eval_expr(object_expr, ctx)?;
        let interface = match object {
            Value::Interface(interface) => interface,
            _ => {
                return Err(self.error(
                    ctx,
                    location,
                    "OLC6614",
                    "only interfaces have fields".to_string(),
                ));
            }
        };
        match interface.get(field) {
            Some(value) => Ok(value.clone()),
            None => {
                let type_name = Value::Interface(interface.clone()).type_spec().render();
                Err(self.error(
                    ctx,
                    location,
                    "TypeError",
                    format!("'{}' is not a field of '{}'.", field, type_name),
                ))
            }
        }
    }

    fn eval_push(
        &mut self,
        target: &Expr,
        args: &[Expr],
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        let target_value = self.eval_expr(target, ctx)?;
        self.check_single_argument(args, location, ctx)?;
        let mut array = match target_value {
            Value::Array(array) => array,
            _ => return Err(self.not_an_array(ctx, location)),
        };
        let value = self.eval_expr(&args[0], ctx)?;
        array.elements.push(value);
        let length = array.elements.len() as i64;
        self.write_place(target, Value::Array(array), ctx)?;
        Ok(Value::Number(length))
    }

    fn eval_pop(&mut self, target: &Expr, location: Location, ctx: ContextId) -> EvalResult {
        let target_value = self.eval_expr(target, ctx)?;
        let mut array = match target_value {
            Value::Array(array) => array,
            _ => return Err(self.not_an_array(ctx, location)),
        };
        let popped = array.elements.pop().unwrap_or(Value::Null);
        self.write_place(target, Value::Array(array), ctx)?;
        Ok(popped)
    }

    fn eval_index_of(
        &mut self,
        target: &Expr,
        args: &[Expr],
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        let target_value = self.eval_expr(target, ctx)?;
        self.check_single_argument(args, location, ctx)?;
        let array = match target_value {
            Value::Array(array) => array,
            _ => return Err(self.not_an_array(ctx, location)),
        };
        let needle = self.eval_expr(&args[0], ctx)?;
        for (index, element) in array.elements.iter().enumerate() {
            if values_equal(element, &needle) {
                return Ok(Value::Number(index as i64));
            }
        }
        Ok(Value::Number(-1))
    }

    fn expect_array(
        &mut self,
        target: &Expr,
        location: Location,
        ctx: ContextId,
    ) -> Result<ArrayValue, RuntimeError> {
        match self.eval_expr(target, ctx)? {
            Value::Array(array) => Ok(array),
            _ => Err(self.not_an_array(ctx, location)),
        }
    }

    fn expect_interface_arg(
        &mut self,
        args: &[Expr],
        location: Location,
        ctx: ContextId,
    ) -> Result<InterfaceValue, RuntimeError> {
        if args.len() != 1 {
            return Err(self.error(
                ctx,
                location,
                "TypeError",
                "Invalid number of parameters for Object.keys()".to_string(),
            ));
        }
        match self.eval_expr(&args[0], ctx)? {
            Value::Interface(interface) => Ok(interface),
            other => Err(self.error(
                ctx,
                location,
                "OLC2345",
                format!("'{}' is not an interface", other.type_spec().render()),
            )),
        }
    }

    fn eval_parse_int(&mut self, args: &[Expr], location: Location, ctx: ContextId) -> EvalResult {
        self.check_single_argument(args, location, ctx)?;
        let value = self.eval_expr(&args[0], ctx)?;
        let parsed = match &value {
            Value::Number(n) => Some(*n),
            Value::Float(f) => Some(*f as i64),
            Value::Boolean(b) => Some(if *b { 1 } else { 0 }),
            Value::Str(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) => Ok(Value::Number(n)),
            None => Err(self.error(
                ctx,
                location,
                "OLC7714",
                "could not parse number".to_string(),
            )),
        }
    }

    fn eval_parse_float(
        &mut self,
        args: &[Expr],
        location: Location,
        ctx: ContextId,
    ) -> EvalResult {
        self.check_single_argument(args, location, ctx)?;
        let value = self.eval_expr(&args[0], ctx)?;
        let parsed = match &value {
            Value::Number(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(f) => Ok(Value::Float(f)),
            None => Err(self.error(
                ctx,
                location,
                "OLC7715",
                "Could not parse float.".to_string(),
            )),
        }
    }

    // ===== Helpers =====

    fn check_single_argument(
        &self,
        args: &[Expr],
        location: Location,
        ctx: ContextId,
    ) -> Result<(), RuntimeError> {
        if args.len() != 1 {
            return Err(self.error(
                ctx,
                location,
                "OLC8812",
                format!("to many or to few arguments, got: {}, expect: 1", args.len()),
            ));
        }
        Ok(())
    }

    fn not_an_array(&self, ctx: ContextId, location: Location) -> RuntimeError {
        self.error(ctx, location, "OLC8811", "not an array".to_string())
    }

    fn resolve_annotation(
        &self,
        annotation: &TypeAnnotation,
        ctx: ContextId,
    ) -> Result<TypeSpec, RuntimeError> {
        self.types.resolve(annotation).map_err(|unknown| {
            self.error(
                ctx,
                annotation.location,
                "OLC2304",
                format!("Cannot find name '{}'", unknown),
            )
        })
    }

    /// Validate an interface literal's fields against a declared interface
    /// type and stamp the type name on the value.
    #[allow(clippy::too_many_arguments)]
    fn check_interface_shape(
        types: &TypeRegistry,
        lines: &[String],
        contexts: &ContextArena,
        file: &str,
        ctx: ContextId,
        interface_name: &str,
        value: &mut InterfaceValue,
        location: Location,
    ) -> Result<(), RuntimeError> {
        let build_error = |name: &str, details: String| RuntimeError {
            name: name.to_string(),
            details,
            line: location.line,
            column: location.column,
            source_line: lines.get(location.line - 1).cloned().unwrap_or_default(),
            file: file.to_string(),
            traceback: contexts.traceback(ctx, location.line),
        };

        let declared_fields = match types.interface_fields(interface_name) {
            Some(fields) => fields,
            None => {
                return Err(build_error(
                    "NameError",
                    format!("name '{}' is not defined.", interface_name),
                ));
            }
        };

        let mut missing: Vec<&str> = declared_fields
            .iter()
            .map(|(n, _)| n.as_str())
            .filter(|n| value.get(n).is_none())
            .collect();
        let mut extra: Vec<&str> = value
            .fields
            .iter()
            .map(|(n, _)| n.as_str())
            .filter(|n| !declared_fields.iter().any(|(dn, _)| dn == n))
            .collect();
        missing.sort_unstable();
        extra.sort_unstable();
        if !missing.is_empty() {
            return Err(build_error(
                "OLC2322",
                format!(
                    "Propertie(s): '{}' missing in '{}'",
                    missing.join(", "),
                    interface_name
                ),
            ));
        }
        if !extra.is_empty() {
            return Err(build_error(
                "OLC2322",
                format!("'{}' does not exist in '{}'", extra.join(", "), interface_name),
            ));
        }

        for (field_name, field_type) in declared_fields {
            if let Some(field_value) = value.get(field_name) {
                let source = field_value.type_spec();
                if !rules::is_assignable(field_type, &source) {
                    return Err(build_error(
                        "OLC1155",
                        rules::assignment_mismatch(&source, field_type),
                    ));
                }
            }
        }

        value.type_name = Some(interface_name.to_string());
        Ok(())
    }

    fn error(
        &self,
        ctx: ContextId,
        location: Location,
        name: &str,
        details: String,
    ) -> RuntimeError {
        RuntimeError {
            name: name.to_string(),
            details,
            line: location.line,
            column: location.column,
            source_line: self
                .lines
                .get(location.line.saturating_sub(1))
                .cloned()
                .unwrap_or_default(),
            file: self.file.clone(),
            traceback: self.contexts.traceback(ctx, location.line),
        }
    }
}

/// Payload equality as used by `==`, switch matching and `indexOf`.
/// Numbers compare across the integer/float divide; a char and a
/// one-character string compare equal.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Char(a), Value::Char(b)) => a == b,
        (Value::Str(a), Value::Char(b)) | (Value::Char(b), Value::Str(a)) => {
            a.len() == 1 && a.chars().next() == Some(*b)
        }
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
        _ => match (left.as_float(), right.as_float()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn string_array(elements: Vec<Value>) -> Value {
    Value::Array(ArrayValue {
        elements,
        base: "string".to_string(),
        dims: 1,
    })
}

fn collect_leaf_type_names(values: &[Value], names: &mut Vec<String>) {
    for value in values {
        match value {
            Value::Array(inner) => collect_leaf_type_names(&inner.elements, names),
            other => {
                let name = other.type_spec().render();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }
}

/// An empty array literal has no element to infer a base type from; it
/// adopts the declared array type it is being stored into.
fn adopt_declared_array(declared: &TypeSpec, value: &mut Value) {
    if let (TypeSpec::Array { base, dims }, Value::Array(array)) = (declared, value) {
        if array.elements.is_empty() {
            array.base = base.clone();
            array.dims = *dims;
        }
    }
}

/// Stamp the computed base type and dimension counts onto nested arrays
fn propagate_base(array: &mut ArrayValue) {
    let base = array.base.clone();
    let dims = array.dims;
    for element in &mut array.elements {
        if let Value::Array(inner) = element {
            inner.base = base.clone();
            inner.dims = dims - 1;
            propagate_base(inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Interpreter {
        let (tokens, lex_errors) = Lexer::new(source, "file.olc").tokenize();
        assert!(lex_errors.is_empty(), "lexical errors: {:?}", lex_errors);
        let program = Parser::new(tokens, source, "file.olc")
            .parse()
            .unwrap_or_else(|e| panic!("parse failed: {:?}", e));
        let mut interpreter = Interpreter::new(source, "file.olc");
        interpreter.evaluate(&program);
        interpreter
    }

    fn log_of(source: &str) -> String {
        let interpreter = run(source);
        assert!(
            !interpreter.has_errors(),
            "unexpected errors: {}",
            interpreter.errors_text()
        );
        interpreter.log_text()
    }

    fn error_of(source: &str) -> String {
        let interpreter = run(source);
        assert!(interpreter.has_errors(), "expected an error");
        interpreter.errors_text()
    }

    #[test]
    fn test_declare_and_log() {
        assert_eq!(log_of("var x: number = 5;\nconsole.log(x);"), "5");
        assert_eq!(log_of("var x = 5;\nconsole.log(x);"), "5");
    }

    #[test]
    fn test_expression_statements_do_not_log() {
        assert_eq!(log_of("5;\n1 + 2;"), "");
    }

    #[test]
    fn test_arithmetic_promotion_and_division() {
        assert_eq!(log_of("console.log(1 + 2 * 3);"), "7");
        assert_eq!(log_of("console.log(1 + 0.5);"), "1.5");
        assert_eq!(log_of("console.log(4 / 2);"), "2");
        assert_eq!(log_of("console.log(5 / 2);"), "2.5");
        assert_eq!(log_of("console.log(4.0 / 2.0);"), "2.0");
        assert_eq!(log_of("console.log(7 % 3);"), "1");
    }

    #[test]
    fn test_division_with_one_float_operand_stays_float() {
        assert_eq!(log_of("console.log(4.0 / 2);"), "2.0");
        assert_eq!(log_of("console.log(4 / 2.0);"), "2.0");
        assert_eq!(log_of("console.log(typeof (4.0 / 2));"), "float");
    }

    #[test]
    fn test_string_concat_only_for_plus() {
        assert_eq!(log_of("console.log(\"ab\" + \"cd\");"), "abcd");
        let err = error_of("console.log(\"ab\" - \"cd\");");
        assert!(err.contains("unsupported operand type(s) for '-': 'string' and 'string'"));
    }

    #[test]
    fn test_division_by_zero() {
        let err = error_of("console.log(1 / 0);");
        assert!(err.contains("OLC1010: Division by 0"));
        let err = error_of("console.log(1 % 0);");
        assert!(err.contains("OLC1010: Division by 0"));
    }

    #[test]
    fn test_modulo_requires_numbers() {
        let err = error_of("console.log(1.5 % 2);");
        assert!(err.contains("OLC2220"));
    }

    #[test]
    fn test_const_reassignment_halts() {
        let err = error_of("const c: number = 1;\nc = 2;\nconsole.log(c);");
        assert!(err.contains("OLC2588: cannot assign to 'c' because is a constant"));
        // evaluation halted at the failing statement: the log carries only
        // the rendered error, never the console.log that follows it
        let interpreter = run("const c: number = 1;\nc = 2;\nconsole.log(c);");
        assert_eq!(interpreter.log_text(), interpreter.errors_text());
    }

    #[test]
    fn test_assignment_type_mismatch() {
        let err = error_of("var x: number = 1;\nx = \"no\";");
        assert!(err.contains("OLC1155: type 'string' cannot be assign to type 'number'"));
    }

    #[test]
    fn test_declaration_requires_initializer() {
        let err = error_of("var x: number;");
        assert!(err.contains("must provide a type and an init expression for the declaration"));
        let err = error_of("const k: number;");
        assert!(err.contains("constant expressions must be initialized"));
    }

    #[test]
    fn test_duplicate_name_in_scope() {
        let err = error_of("var x = 1;\nvar x = 2;");
        assert!(err.contains("OLC2020: name 'x' is already defined."));
    }

    #[test]
    fn test_undefined_name() {
        let err = error_of("console.log(y);");
        assert!(err.contains("NameError: name 'y' is not defined."));
    }

    #[test]
    fn test_array_access_and_bounds() {
        assert_eq!(log_of("var a: number[] = [1, 2, 3];\nconsole.log(a[1]);"), "2");
        let err = error_of("var a: number[] = [1, 2, 3];\nconsole.log(a[5]);");
        assert!(err.contains("IndexError: Array index out of bounds."));
    }

    #[test]
    fn test_array_rendering() {
        assert_eq!(log_of("var a: number[] = [1, 2, 3];\nconsole.log(a);"), "[1, 2, 3]");
        assert_eq!(
            log_of("var s: string[] = [\"a\", \"b\"];\nconsole.log(s);"),
            "['a', 'b']"
        );
    }

    #[test]
    fn test_heterogeneous_array_rejected() {
        let err = error_of("var a = [1, \"x\"];");
        assert!(err.contains("Invalid array expression."));
    }

    #[test]
    fn test_matrix_type_and_access() {
        let source = "var m: number[][] = [[1, 2], [3, 4]];\nconsole.log(m[1][0]);";
        assert_eq!(log_of(source), "3");
        assert_eq!(
            log_of("var m: number[][] = [[1], [2]];\nconsole.log(typeof m);"),
            "number[][]"
        );
    }

    #[test]
    fn test_array_builtins() {
        let source = "var a: number[] = [1, 2];\n\
                      console.log(a.push(3));\n\
                      console.log(a);\n\
                      console.log(a.pop());\n\
                      console.log(a.indexOf(2));\n\
                      console.log(a.indexOf(9));\n\
                      console.log(a.join());\n\
                      console.log(a.length());";
        assert_eq!(log_of(source), "3\n[1, 2, 3]\n3\n1\n-1\n1,2\n2");
    }

    #[test]
    fn test_empty_array_literal_adopts_declared_type() {
        let source = "var a: number[] = [];\n\
                      a.push(1);\n\
                      console.log(a);\n\
                      console.log(typeof a);";
        assert_eq!(log_of(source), "[1]\nnumber[]");
    }

    #[test]
    fn test_pop_empty_returns_null() {
        let source = "var a: number[] = [1];\na.pop();\nconsole.log(a.pop());";
        assert_eq!(log_of(source), "null");
    }

    #[test]
    fn test_builtins_on_non_array() {
        let err = error_of("var x: number = 1;\nx.push(2);");
        assert!(err.contains("OLC8811: not an array"));
    }

    #[test]
    fn test_array_set_mutates_in_place() {
        let source = "var a: number[] = [1, 2, 3];\na[0] = 9;\nconsole.log(a);";
        assert_eq!(log_of(source), "[9, 2, 3]");
    }

    #[test]
    fn test_function_call_and_return() {
        let source = "function add(a: number, b: number): number {\n\
                      \u{20}   return a + b;\n\
                      }\n\
                      console.log(add(2, 3));";
        assert_eq!(log_of(source), "5");
    }

    #[test]
    fn test_function_must_return_a_value() {
        let source = "function f(): number {\n\
                      \u{20}   var x = 1;\n\
                      }\n\
                      console.log(f());";
        let err = error_of(source);
        assert!(err.contains("function 'f' must return a value"));
    }

    #[test]
    fn test_void_function_should_not_return() {
        let source = "function f() {\n\
                      \u{20}   return 5;\n\
                      }\n\
                      console.log(f());";
        let err = error_of(source);
        assert!(err.contains("function 'f' SHOULD NOT return a value"));
    }

    #[test]
    fn test_call_arity_mismatch() {
        let source = "function f(a: number) {\n\
                      \u{20}   console.log(a);\n\
                      }\n\
                      f(1, 2);";
        let err = error_of(source);
        assert!(err
            .contains("Too few or too many arguments in function call, 2 given, 1 expected"));
    }

    #[test]
    fn test_function_body_cannot_see_caller_locals() {
        let source = "var secret: number = 42;\n\
                      function peek() {\n\
                      \u{20}   console.log(secret);\n\
                      }\n\
                      peek();";
        let err = error_of(source);
        assert!(err.contains("NameError: name 'secret' is not defined."));
    }

    #[test]
    fn test_runtime_error_carries_traceback() {
        let source = "function divide(a: number, b: number): number {\n\
                      \u{20}   return a / b;\n\
                      }\n\
                      console.log(divide(1, 0));";
        let err = error_of(source);
        assert!(err.contains("Traceback (most recent call last):"));
        assert!(err.contains("in <global>"));
        assert!(err.contains("in divide"));
        let global_at = err.find("in <global>").unwrap();
        let divide_at = err.find("in divide").unwrap();
        assert!(global_at < divide_at);
    }

    #[test]
    fn test_switch_fallthrough() {
        let source = "var x: number = 2;\n\
                      switch (x) {\n\
                      \u{20}   case 1: console.log(\"a\");\n\
                      \u{20}   case 2: console.log(\"b\");\n\
                      \u{20}   case 3: console.log(\"c\"); break;\n\
                      \u{20}   default: console.log(\"d\");\n\
                      }";
        assert_eq!(log_of(source), "b\nc");
    }

    #[test]
    fn test_switch_default_runs_without_match() {
        let source = "switch (9) {\n\
                      \u{20}   case 1: console.log(\"a\"); break;\n\
                      \u{20}   default: console.log(\"d\");\n\
                      }";
        assert_eq!(log_of(source), "d");
    }

    #[test]
    fn test_switch_requires_exactly_one_default() {
        let err = error_of("switch (1) { case 1: break; }");
        assert!(err.contains("SwitchError: Switch with no cases or too many default cases"));
    }

    #[test]
    fn test_while_and_break_continue() {
        let source = "var i: number = 0;\n\
                      while (i < 5) {\n\
                      \u{20}   i = i + 1;\n\
                      \u{20}   if (i == 2) {\n\
                      \u{20}       continue;\n\
                      \u{20}   }\n\
                      \u{20}   if (i == 4) {\n\
                      \u{20}       break;\n\
                      \u{20}   }\n\
                      \u{20}   console.log(i);\n\
                      }";
        assert_eq!(log_of(source), "1\n3");
    }

    #[test]
    fn test_for_loop() {
        let source = "for (var i: number = 0; i < 3; i++) {\n\
                      \u{20}   console.log(i);\n\
                      }";
        assert_eq!(log_of(source), "0\n1\n2");
    }

    #[test]
    fn test_for_of_over_array_and_string() {
        assert_eq!(
            log_of("for (var x of [10, 20]) {\n    console.log(x);\n}"),
            "10\n20"
        );
        assert_eq!(
            log_of("for (var c of \"ab\") {\n    console.log(c);\n}"),
            "a\nb"
        );
    }

    #[test]
    fn test_break_outside_loop() {
        let err = error_of("break;");
        assert!(err.contains("SyntaxError: 'break' outside of switch/case or loop"));
    }

    #[test]
    fn test_continue_in_bare_switch_case() {
        let source = "switch (1) {\n\
                      \u{20}   case 1: continue;\n\
                      \u{20}   default: break;\n\
                      }";
        let err = error_of(source);
        assert!(err.contains("SyntaxError: 'continue' outside of loop"));
    }

    #[test]
    fn test_return_outside_function() {
        let err = error_of("return 1;");
        assert!(err.contains("OLC4122: 'return' outside of function."));
    }

    #[test]
    fn test_interfaces() {
        let source = "interface Point {\n\
                      \u{20}   x: number;\n\
                      \u{20}   y: number;\n\
                      }\n\
                      var p: Point = { x: 1, y: 2 };\n\
                      console.log(p.x);\n\
                      p.y = 9;\n\
                      console.log(p.y);\n\
                      console.log(typeof p);";
        assert_eq!(log_of(source), "1\n9\nPoint");
    }

    #[test]
    fn test_interface_missing_field() {
        let source = "interface Point {\n\
                      \u{20}   x: number;\n\
                      \u{20}   y: number;\n\
                      }\n\
                      var p: Point = { x: 1 };";
        let err = error_of(source);
        assert!(err.contains("OLC2322: Propertie(s): 'y' missing in 'Point'"));
    }

    #[test]
    fn test_object_keys_and_values() {
        let source = "interface Point {\n\
                      \u{20}   x: number;\n\
                      \u{20}   y: number;\n\
                      }\n\
                      var p: Point = { x: 1, y: 2 };\n\
                      console.log(Object.keys(p));\n\
                      console.log(Object.values(p));";
        assert_eq!(log_of(source), "['x', 'y']\n['1', '2']");
    }

    #[test]
    fn test_object_keys_on_non_interface() {
        let err = error_of("Object.keys(5);");
        assert!(err.contains("OLC2345: 'number' is not an interface"));
    }

    #[test]
    fn test_member_access_on_non_interface() {
        let err = error_of("var x: number = 1;\nconsole.log(x.y);");
        assert!(err.contains("OLC6614: only interfaces have fields"));
    }

    #[test]
    fn test_unknown_type_name() {
        let err = error_of("var p: Shape = 1;");
        assert!(err.contains("OLC2304: Cannot find name 'Shape'"));
    }

    #[test]
    fn test_string_builtins() {
        assert_eq!(log_of("console.log(\"AbC\".toLowerCase());"), "abc");
        assert_eq!(log_of("console.log(\"AbC\".toUpperCase());"), "ABC");
        assert_eq!(log_of("console.log((5).toString());"), "5");
        assert_eq!(log_of("console.log(\"hi\".toString());"), "'hi'");
    }

    #[test]
    fn test_parse_int_and_float() {
        assert_eq!(log_of("console.log(parseInt(\"42\"));"), "42");
        assert_eq!(log_of("console.log(parseFloat(\"2.5\"));"), "2.5");
        assert_eq!(log_of("console.log(parseFloat(\"3\"));"), "3.0");
        let err = error_of("console.log(parseInt(\"abc\"));");
        assert!(err.contains("OLC7714: could not parse number"));
    }

    #[test]
    fn test_typeof_rendering() {
        assert_eq!(log_of("console.log(typeof 1);"), "number");
        assert_eq!(log_of("console.log(typeof 1.5);"), "float");
        assert_eq!(log_of("console.log(typeof \"s\");"), "string");
        assert_eq!(log_of("console.log(typeof true);"), "boolean");
        assert_eq!(log_of("console.log(typeof [1, 2]);"), "number[]");
    }

    #[test]
    fn test_ternary() {
        assert_eq!(log_of("console.log(1 < 2 ? \"yes\" : \"no\");"), "yes");
        let err = error_of("console.log(1 ? \"yes\" : \"no\");");
        assert!(err.contains("not a boolean expression for ternary operator"));
    }

    #[test]
    fn test_logical_and_unary() {
        assert_eq!(log_of("console.log(true && false);"), "false");
        assert_eq!(log_of("console.log(true || false);"), "true");
        assert_eq!(log_of("console.log(!true);"), "false");
        assert_eq!(log_of("console.log(-5);"), "-5");
        let err = error_of("console.log(!1);");
        assert!(err.contains("unsupported operand type for '!': number"));
    }

    #[test]
    fn test_if_condition_must_be_boolean() {
        let err = error_of("if (1) {\n    console.log(\"x\");\n}");
        assert!(err.contains(
            "'number' is not a valid type for 'if' test expression, required 'boolean'."
        ));
    }

    #[test]
    fn test_console_log_joins_with_spaces() {
        assert_eq!(log_of("console.log(1, \"two\", 3.0);"), "1 two 3.0");
    }

    #[test]
    fn test_symbol_report_contents() {
        let interpreter = run("var x: number = 1;\nconst y: string = \"s\";");
        let report = interpreter.symbols_report();
        assert!(report.contains("ID:                x"));
        assert!(report.contains("Symbol Type:       variable"));
        assert!(report.contains("Symbol Type:       constant"));
        assert!(report.contains("Context:           <global>"));
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(log_of("var c: char = 'a';\nconsole.log(c);"), "a");
        assert_eq!(log_of("console.log(typeof 'a');"), "char");
        let err = error_of("var c: char = 'ab';");
        assert!(err.contains("OLC1233: invalid character literal 'ab'"));
    }
}
