// File: src/analyzer.rs
//
// Semantic analyzer for the BCL language. Runs one fail-fast pass over the
// parsed program before execution: static type checking, scope and
// initialization tracking, struct field validation, and control-flow
// placement checks (break/return, if-chain shape).
//
// Scope handling mirrors the runtime: the visible-variable map is cloned on
// entry to every block, so declarations and type knowledge never leak back
// to the enclosing scope. Types are tracked by name; `None` in the type
// table marks a primitive, `Some(fields)` a struct.

use crate::ast::{
    Assignment, BinOp, CallFunc, Comparison, Declaration, Expr, ForInit, ForLoop, Function,
    IfKind, IfStmt, Literal, Program, RelOp, Return, Stmt, StructDecl, VarList, Variable,
};
use crate::errors::{find_closest_match, BclError, SourceLocation};
use ahash::AHashMap;

const TYPE_NULL: &str = "null";

#[derive(Debug, Clone)]
struct VarInfo {
    ty: String,
    is_param: bool,
    initialized: bool,
}

type Scope = AHashMap<String, VarInfo>;

#[derive(Debug, Clone)]
struct FunctionSig {
    return_type: String,
    params: Vec<(String, String)>, // (name, type)
}

/// Enclosing constructs, innermost last. If-statements do not push a frame,
/// so a `break` nested in an `if` inside a loop is still legal.
#[derive(Debug, Clone)]
enum Frame {
    Function { name: String, return_type: String },
    Loop,
}

pub struct Analyzer {
    /// Type table: `None` for primitives, `Some(field name -> field type)`
    /// for structs.
    types: AHashMap<String, Option<AHashMap<String, String>>>,
    functions: AHashMap<String, FunctionSig>,
    stack: Vec<Frame>,
}

impl Analyzer {
    pub fn new() -> Self {
        let mut types = AHashMap::new();
        for primitive in ["boolean", "int", "double", "string", "void"] {
            types.insert(primitive.to_string(), None);
        }
        Analyzer { types, functions: AHashMap::new(), stack: Vec::new() }
    }

    /// Check a whole program, stopping at the first violation. Declarations
    /// are processed in file order, so every name must be declared before it
    /// is referenced.
    pub fn check(&mut self, program: &Program) -> Result<(), BclError> {
        let mut globals: Scope = AHashMap::new();

        for declaration in &program.declarations {
            match declaration {
                Declaration::Struct(s) => {
                    if self.types.contains_key(&s.name) {
                        return Err(BclError::semantic_error(
                            format!("Type '{}' already exists", s.name),
                            s.loc.clone(),
                        ));
                    }
                    let mut fields = AHashMap::new();
                    for list in &s.fields {
                        for var in &list.variables {
                            fields.insert(var.name.clone(), list.ty.clone());
                        }
                    }
                    // Registered before the body check, so fields may use
                    // the struct's own type.
                    self.types.insert(s.name.clone(), Some(fields));
                    self.check_struct(s, &globals)?;
                }
                Declaration::VarList(list) => {
                    self.check_var_list(list, &mut globals)?;
                }
                Declaration::Function(f) => {
                    if self.functions.contains_key(&f.name) {
                        return Err(BclError::semantic_error(
                            format!("Function '{}' already exists", f.name),
                            f.loc.clone(),
                        ));
                    }
                    if f.name == "main" && !f.params.is_empty() {
                        return Err(BclError::semantic_error(
                            "Function 'main' cannot take arguments".to_string(),
                            f.loc.clone(),
                        ));
                    }
                    let sig = FunctionSig {
                        return_type: f.return_type.clone(),
                        params: f.params.iter().map(|p| (p.name.clone(), p.ty.clone())).collect(),
                    };
                    // Registered before the body check so recursion analyzes.
                    self.functions.insert(f.name.clone(), sig);
                    self.check_function(f, &globals)?;
                }
            }
        }
        Ok(())
    }

    fn check_struct(&mut self, s: &StructDecl, globals: &Scope) -> Result<(), BclError> {
        let mut vars = globals.clone();
        for list in &s.fields {
            self.check_var_list(list, &mut vars)?;
            for var in &list.variables {
                // Only the direct self-allocation is caught; indirect cycles
                // through another struct are not chased.
                if let Some(Expr::New { ty, loc }) = &var.init {
                    if *ty == s.name {
                        return Err(BclError::semantic_error(
                            format!("Field initializer 'new {}()' would never terminate", ty),
                            loc.clone(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_function(&mut self, f: &Function, globals: &Scope) -> Result<(), BclError> {
        if self.types.contains_key(&f.name) {
            return Err(BclError::semantic_error(
                format!("Label '{}' is used as a type", f.name),
                f.loc.clone(),
            ));
        }
        if !self.types.contains_key(&f.return_type) {
            return Err(BclError::semantic_error(
                format!("Type '{}' does not exist", f.return_type),
                f.loc.clone(),
            ));
        }

        self.stack.push(Frame::Function {
            name: f.name.clone(),
            return_type: f.return_type.clone(),
        });
        let result = self.check_function_inner(f, globals);
        self.stack.pop();
        result
    }

    fn check_function_inner(&mut self, f: &Function, globals: &Scope) -> Result<(), BclError> {
        let mut vars = globals.clone();
        for param in &f.params {
            if !self.types.contains_key(&param.ty) {
                return Err(BclError::semantic_error(
                    format!("Type '{}' does not exist", param.ty),
                    param.loc.clone(),
                ));
            }
            if vars.contains_key(&param.name) {
                return Err(BclError::semantic_error(
                    format!("Variable '{}' already exists", param.name),
                    param.loc.clone(),
                ));
            }
            let initialized = self.check_variable(param, &mut vars)?;
            vars.insert(
                param.name.clone(),
                VarInfo { ty: param.ty.clone(), is_param: true, initialized },
            );
        }

        self.check_statements(&f.body, &mut vars)?;

        if f.return_type != "void" && !contains_return(&f.body) {
            return Err(BclError::semantic_error(
                format!("No 'return' statement found in function '{}'", f.name),
                f.loc.clone(),
            ));
        }
        Ok(())
    }

    /// Check a statement list, enforcing if-chain shape: `elseif`/`else`
    /// need an open chain, and `else` or any non-if statement closes it.
    fn check_statements(&mut self, stmts: &[Stmt], vars: &mut Scope) -> Result<(), BclError> {
        let mut chain_open = false;
        for stmt in stmts {
            match stmt {
                Stmt::If(if_stmt) => {
                    self.check_if(if_stmt, vars)?;
                    match if_stmt.kind {
                        IfKind::If => chain_open = true,
                        IfKind::Elseif | IfKind::Else => {
                            if !chain_open {
                                return Err(BclError::semantic_error(
                                    format!(
                                        "'{}' statement without a preceding 'if'",
                                        if_stmt.kind.keyword()
                                    ),
                                    if_stmt.loc.clone(),
                                ));
                            }
                            if if_stmt.kind == IfKind::Else {
                                chain_open = false;
                            }
                        }
                    }
                }
                other => {
                    chain_open = false;
                    self.check_stmt(other, vars)?;
                }
            }
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt, vars: &mut Scope) -> Result<(), BclError> {
        match stmt {
            Stmt::VarList(list) => self.check_var_list(list, vars),
            Stmt::Assignment(assignment) => self.check_assignment(assignment, vars),
            Stmt::Call(call) => self.check_call(call, vars).map(|_| ()),
            Stmt::For(for_loop) => self.check_for(for_loop, vars),
            Stmt::If(if_stmt) => self.check_if(if_stmt, vars),
            Stmt::Printf(printf) => {
                if let Some(expr) = &printf.expr {
                    self.check_expr(expr, vars)?;
                }
                Ok(())
            }
            Stmt::Return(ret) => self.check_return(ret, vars),
            Stmt::Break { loc } => {
                if !matches!(self.stack.last(), Some(Frame::Loop)) {
                    return Err(BclError::semantic_error(
                        "'break' is only allowed inside a for-loop".to_string(),
                        loc.clone(),
                    ));
                }
                Ok(())
            }
        }
    }

    fn check_var_list(&mut self, list: &VarList, vars: &mut Scope) -> Result<(), BclError> {
        if !self.types.contains_key(&list.ty) {
            return Err(BclError::semantic_error(
                format!("Type '{}' does not exist", list.ty),
                list.loc.clone(),
            ));
        }
        for var in &list.variables {
            if vars.contains_key(&var.name) {
                return Err(BclError::semantic_error(
                    format!("Variable '{}' already exists", var.name),
                    var.loc.clone(),
                ));
            }
            let initialized = self.check_variable(var, vars)?;
            vars.insert(
                var.name.clone(),
                VarInfo { ty: var.ty.clone(), is_param: false, initialized },
            );
        }
        Ok(())
    }

    /// Check one declared variable; returns whether it counts as initialized
    /// (its initializer resolved to a known type).
    fn check_variable(&mut self, var: &Variable, vars: &mut Scope) -> Result<bool, BclError> {
        if self.types.contains_key(&var.name) {
            return Err(BclError::semantic_error(
                format!("Label '{}' is used as a type", var.name),
                var.loc.clone(),
            ));
        }
        if let Some(init) = &var.init {
            if let Some(found) = self.check_expr(init, vars)? {
                if found != TYPE_NULL && !types_compatible(&var.ty, &found) {
                    return Err(BclError::type_error(
                        format!("Type mismatch: expected '{}', but found '{}'", var.ty, found),
                        init.location(),
                    ));
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn check_assignment(&mut self, a: &Assignment, vars: &mut Scope) -> Result<(), BclError> {
        let info = match vars.get(&a.target) {
            Some(info) => info.clone(),
            None => return Err(self.unknown_variable(&a.target, &a.loc, vars)),
        };

        let expected = match &a.field {
            Some(field) => self.field_type(&info.ty, field, &a.loc)?,
            None => info.ty.clone(),
        };

        let found = self.check_expr(&a.value, vars)?;
        if let Some(found) = &found {
            if found != TYPE_NULL && !types_compatible(&expected, found) {
                return Err(BclError::type_error(
                    format!("Type mismatch: expected '{}', but found '{}'", expected, found),
                    a.value.location(),
                ));
            }
        }
        // A whole-variable assignment with a known value type marks the
        // variable initialized for the rest of the scope.
        if a.field.is_none() && found.is_some() {
            if let Some(entry) = vars.get_mut(&a.target) {
                entry.initialized = true;
            }
        }
        Ok(())
    }

    fn field_type(
        &self,
        struct_ty: &str,
        field: &str,
        loc: &SourceLocation,
    ) -> Result<String, BclError> {
        match self.types.get(struct_ty) {
            Some(Some(fields)) => match fields.get(field) {
                Some(ty) => Ok(ty.clone()),
                None => Err(BclError::semantic_error(
                    format!("Struct '{}' does not have field '{}'", struct_ty, field),
                    loc.clone(),
                )),
            },
            _ => Err(BclError::semantic_error(
                format!("Struct '{}' does not have field '{}'", struct_ty, field),
                loc.clone(),
            )),
        }
    }

    fn check_for(&mut self, for_loop: &ForLoop, vars: &Scope) -> Result<(), BclError> {
        self.stack.push(Frame::Loop);
        let result = self.check_for_inner(for_loop, vars);
        self.stack.pop();
        result
    }

    fn check_for_inner(&mut self, for_loop: &ForLoop, vars: &Scope) -> Result<(), BclError> {
        let mut inner = vars.clone();
        match &for_loop.init {
            Some(ForInit::Assignment(a)) => self.check_assignment(a, &mut inner)?,
            Some(ForInit::VarList(list)) => self.check_var_list(list, &mut inner)?,
            None => {}
        }
        if let Some(cond) = &for_loop.condition {
            self.check_comparison(cond, &mut inner)?;
        }
        if let Some(inc) = &for_loop.increment {
            self.check_assignment(inc, &mut inner)?;
        }
        self.check_statements(&for_loop.body, &mut inner)
    }

    fn check_if(&mut self, if_stmt: &IfStmt, vars: &Scope) -> Result<(), BclError> {
        let mut inner = vars.clone();
        if let Some(cond) = &if_stmt.condition {
            self.check_comparison(cond, &mut inner)?;
        }
        self.check_statements(&if_stmt.body, &mut inner)
    }

    fn check_return(&mut self, ret: &Return, vars: &mut Scope) -> Result<(), BclError> {
        let found = match &ret.expr {
            Some(expr) => self.check_expr(expr, vars)?,
            None => None,
        };

        let (name, return_type) = match self.enclosing_function() {
            Some(frame) => frame,
            None => {
                return Err(BclError::semantic_error(
                    "'return' is only allowed inside a function".to_string(),
                    ret.loc.clone(),
                ));
            }
        };

        if return_type == "void" {
            if ret.expr.is_some() {
                return Err(BclError::type_error(
                    format!("Function '{}' returns 'void' and cannot return a value", name),
                    ret.loc.clone(),
                ));
            }
            return Ok(());
        }
        match found {
            None => Err(BclError::type_error(
                format!("Function '{}' must return a value of type '{}'", name, return_type),
                ret.loc.clone(),
            )),
            Some(found) if !types_compatible(&return_type, &found) => Err(BclError::type_error(
                format!("Function '{}' returns type '{}', but found '{}'", name, return_type, found),
                ret.loc.clone(),
            )),
            Some(_) => Ok(()),
        }
    }

    fn check_call(&mut self, call: &CallFunc, vars: &mut Scope) -> Result<Option<String>, BclError> {
        let sig = match self.functions.get(&call.name) {
            Some(sig) => sig.clone(),
            None => {
                let candidates: Vec<String> = self.functions.keys().cloned().collect();
                let mut err = BclError::undefined_function(&call.name, call.loc.clone());
                if let Some(closest) = find_closest_match(&call.name, &candidates) {
                    err = err.with_suggestion(closest.to_string());
                }
                return Err(err);
            }
        };
        if call.name == "main" {
            return Err(BclError::semantic_error(
                "Function 'main' cannot be called".to_string(),
                call.loc.clone(),
            ));
        }
        if call.args.len() != sig.params.len() {
            return Err(BclError::semantic_error(
                format!(
                    "Function '{}' expects {} arguments, but found {}",
                    call.name,
                    sig.params.len(),
                    call.args.len()
                ),
                call.loc.clone(),
            ));
        }
        for (arg, (_, param_ty)) in call.args.iter().zip(&sig.params) {
            if let Some(found) = self.check_expr(arg, vars)? {
                if found != TYPE_NULL && !types_compatible(param_ty, &found) {
                    return Err(BclError::type_error(
                        format!("Type mismatch: expected '{}', but found '{}'", param_ty, found),
                        arg.location(),
                    ));
                }
            }
        }
        Ok(Some(sig.return_type))
    }

    /// Infer an expression's type name. `None` means unknown: judgement is
    /// deferred and enclosing checks must not fail on it.
    fn check_expr(&mut self, expr: &Expr, vars: &mut Scope) -> Result<Option<String>, BclError> {
        match expr {
            Expr::Literal { value, .. } => Ok(Some(
                match value {
                    Literal::Int(_) => "int",
                    Literal::Double(_) => "double",
                    Literal::Str(_) => "string",
                    Literal::Bool(_) => "boolean",
                }
                .to_string(),
            )),
            Expr::Null { .. } => Ok(Some(TYPE_NULL.to_string())),
            Expr::New { ty, loc } => match self.types.get(ty) {
                Some(Some(_)) => Ok(Some(ty.clone())),
                _ => Err(BclError::semantic_error(
                    format!("Struct type '{}' does not exist", ty),
                    loc.clone(),
                )),
            },
            Expr::Call(call) => self.check_call(call, vars),
            Expr::Variable { name, field, loc } => {
                let info = match vars.get(name) {
                    Some(info) => info.clone(),
                    None => return Err(self.unknown_variable(name, loc, vars)),
                };
                match field {
                    Some(field) => self.field_type(&info.ty, field, loc).map(Some),
                    None => {
                        if !info.is_param && !info.initialized {
                            return Err(BclError::semantic_error(
                                format!("Variable '{}' is not initialized", name),
                                loc.clone(),
                            ));
                        }
                        Ok(Some(info.ty))
                    }
                }
            }
            Expr::Binary { op, left, right, loc } => {
                let left_ty = match self.check_expr(left, vars)? {
                    Some(ty) => ty,
                    None => return Ok(None),
                };
                let right_ty = match self.check_expr(right, vars)? {
                    Some(ty) => ty,
                    None => return Ok(None),
                };
                if left_ty == "string" || right_ty == "string" {
                    if *op != BinOp::Add {
                        return Err(BclError::type_error(
                            "Only addition is allowed with 'string' operands".to_string(),
                            loc.clone(),
                        ));
                    }
                    return Ok(Some("string".to_string()));
                }
                if is_numeric(&left_ty) && is_numeric(&right_ty) {
                    if left_ty == "double" || right_ty == "double" {
                        return Ok(Some("double".to_string()));
                    }
                    return Ok(Some("int".to_string()));
                }
                Err(BclError::type_error(
                    format!(
                        "No arithmetic operation allowed between types '{}' and '{}'",
                        left_ty, right_ty
                    ),
                    loc.clone(),
                ))
            }
        }
    }

    /// Infer a boolean expression's type. Relational and logical nodes yield
    /// `boolean`; a bare pass-through is validated but stays unknown, like
    /// any other deferred judgement.
    fn check_comparison(
        &mut self,
        cmp: &Comparison,
        vars: &mut Scope,
    ) -> Result<Option<String>, BclError> {
        match cmp {
            Comparison::Not { operand, .. } => self.check_comparison(operand, vars),
            Comparison::Logical { left, right, loc, .. } => {
                let left_ty = self.check_comparison(left, vars)?;
                let right_ty = self.check_comparison(right, vars)?;
                for ty in [&left_ty, &right_ty].into_iter().flatten() {
                    if ty != "boolean" {
                        return Err(BclError::type_error(
                            format!("Expected 'boolean', but found '{}'", ty),
                            loc.clone(),
                        ));
                    }
                }
                Ok(Some("boolean".to_string()))
            }
            Comparison::Relation { op, left, right, loc } => {
                let left_ty = match self.check_expr(left, vars)? {
                    Some(ty) => ty,
                    None => return Ok(None),
                };
                let right_ty = match self.check_expr(right, vars)? {
                    Some(ty) => ty,
                    None => return Ok(None),
                };
                let equality = matches!(op, RelOp::Eq | RelOp::Ne);
                if left_ty == TYPE_NULL || right_ty == TYPE_NULL {
                    if !equality {
                        return Err(BclError::type_error(
                            "Only '==' and '!=' are allowed when comparing against 'null'"
                                .to_string(),
                            loc.clone(),
                        ));
                    }
                    return Ok(Some("boolean".to_string()));
                }
                let comparable = (left_ty == "string" && right_ty == "string")
                    || (is_numeric(&left_ty) && is_numeric(&right_ty))
                    || (equality && left_ty == "boolean" && right_ty == "boolean");
                if !comparable {
                    return Err(BclError::type_error(
                        format!(
                            "No comparison allowed between types '{}' and '{}'",
                            left_ty, right_ty
                        ),
                        loc.clone(),
                    ));
                }
                Ok(Some("boolean".to_string()))
            }
            Comparison::Bare(expr) => {
                match self.check_expr(expr, vars)? {
                    Some(ty) if ty != "boolean" => Err(BclError::type_error(
                        format!("Expected 'boolean', but found '{}'", ty),
                        expr.location(),
                    )),
                    // Validated, but the judgement stays deferred.
                    _ => Ok(None),
                }
            }
        }
    }

    fn enclosing_function(&self) -> Option<(String, String)> {
        for frame in self.stack.iter().rev() {
            if let Frame::Function { name, return_type } = frame {
                return Some((name.clone(), return_type.clone()));
            }
        }
        None
    }

    fn unknown_variable(&self, name: &str, loc: &SourceLocation, vars: &Scope) -> BclError {
        let candidates: Vec<String> = vars.keys().cloned().collect();
        let mut err = BclError::undefined_variable(name, loc.clone());
        if let Some(closest) = find_closest_match(name, &candidates) {
            err = err.with_suggestion(closest.to_string());
        }
        err
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// `int` widens to `double` everywhere a `double` is expected; everything
/// else must match exactly.
fn types_compatible(expected: &str, found: &str) -> bool {
    expected == found || (expected == "double" && found == "int")
}

fn is_numeric(ty: &str) -> bool {
    ty == "int" || ty == "double"
}

/// A non-void function needs at least one `return` somewhere in its body,
/// including nested blocks.
fn contains_return(stmts: &[Stmt]) -> bool {
    stmts.iter().any(|stmt| match stmt {
        Stmt::Return(_) => true,
        Stmt::If(if_stmt) => contains_return(&if_stmt.body),
        Stmt::For(for_loop) => contains_return(&for_loop.body),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::lexer::tokenize;
    use crate::parser::Parser;

    fn check_source(src: &str) -> Result<(), BclError> {
        let program = Parser::new(tokenize(src)).parse().expect("parse failed");
        Analyzer::new().check(&program)
    }

    #[test]
    fn test_well_typed_program_passes() {
        check_source(
            "struct Point { int x, y; }\n\
             int scale(int value, int factor = 2) { return value * factor; }\n\
             void main() { Point p = new Point(); p.x = scale(3, 4); printf(p.x); }",
        )
        .expect("expected the program to pass analysis");
    }

    #[test]
    fn test_unknown_variable_rejected_with_suggestion() {
        let err = check_source("void main() { int counter = 0; printf(countr); }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
        assert_eq!(err.suggestion.as_deref(), Some("counter"));
    }

    #[test]
    fn test_uninitialized_use_rejected() {
        let err = check_source("void main() { int a; printf(a); }").unwrap_err();
        assert!(err.message.contains("not initialized"));
    }

    #[test]
    fn test_assignment_marks_initialized() {
        check_source("void main() { int a; a = 1; printf(a); }")
            .expect("assignment should initialize the variable");
    }

    #[test]
    fn test_break_outside_loop_rejected() {
        let err = check_source("void main() { break; }").unwrap_err();
        assert!(err.message.contains("break"));
    }

    #[test]
    fn test_elseif_without_if_rejected() {
        let err = check_source("void main() { elseif (1 == 1) { printf(1); } }").unwrap_err();
        assert!(err.message.contains("'elseif'"));
    }

    #[test]
    fn test_chain_closed_by_plain_statement() {
        let err = check_source(
            "void main() { if (1 == 1) { printf(1); } printf(2); else { printf(3); } }",
        )
        .unwrap_err();
        assert!(err.message.contains("'else'"));
    }

    #[test]
    fn test_string_subtraction_rejected() {
        let err = check_source("void main() { printf(\"a\" - 1); }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_int_widens_to_double() {
        check_source("void main() { double d = 1; d = 2; printf(d); }")
            .expect("int should widen to double");
    }

    #[test]
    fn test_double_does_not_narrow_to_int() {
        let err = check_source("void main() { int a = 1.5; }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_self_allocating_field_rejected() {
        let err = check_source("struct Node { Node next = new Node(); }").unwrap_err();
        assert!(err.message.contains("never terminate"));
    }

    #[test]
    fn test_self_typed_field_without_allocation_allowed() {
        check_source("struct Node { int value; Node next; }")
            .expect("self-referential field type should be allowed");
    }

    #[test]
    fn test_non_void_function_requires_return() {
        let err = check_source("int f() { printf(1); }").unwrap_err();
        assert!(err.message.contains("'return'"));
    }

    #[test]
    fn test_return_inside_nested_block_counts() {
        check_source("int f() { if (1 == 1) { return 1; } }")
            .expect("a nested return should satisfy the requirement");
    }

    #[test]
    fn test_call_before_declaration_rejected() {
        let err = check_source("void main() { later(); }\nvoid later() { printf(1); }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedFunction);
    }

    #[test]
    fn test_main_cannot_take_arguments() {
        let err = check_source("void main(int a) { printf(a); }").unwrap_err();
        assert!(err.message.contains("main"));
    }

    #[test]
    fn test_null_ordering_comparison_rejected() {
        let err =
            check_source("void main() { if (null < 1) { printf(1); } }").unwrap_err();
        assert!(err.message.contains("null"));
    }

    #[test]
    fn test_shadowing_outer_variable_rejected() {
        let err = check_source(
            "void main() { int a = 1; if (a == 1) { int a = 2; printf(a); } }",
        )
        .unwrap_err();
        assert!(err.message.contains("already exists"));
    }
}
