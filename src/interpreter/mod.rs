// File: src/interpreter/mod.rs
//
// Tree-walking interpreter for the BCL language. Executes a program that
// has already passed semantic analysis by traversing the AST directly.
//
// Key behaviors:
// - Declarations run in file order; `main` executes when its declaration is
//   reached, so it only sees what was declared above it.
// - Scopes are copy-on-enter: a block reads everything visible outside but
//   its writes never survive the block.
// - A call pushes a child scope of the caller's environment, so the callee
//   sees the caller's variables in addition to its parameters.
// - break/return travel as explicit signals (see control_flow.rs).
// - printf lines go to an injected sink: a shared byte buffer when one is
//   installed (used by tests), stdout otherwise.

mod control_flow;
mod environment;
mod value;

pub use environment::{Binding, Environment};
pub use value::{StructInstance, Value};

use control_flow::Signal;

use crate::ast::{
    Assignment, BinOp, CallFunc, Comparison, Declaration, Expr, ForInit, ForLoop, Function,
    IfKind, IfStmt, Literal, LogicalOp, Program, RelOp, Stmt, StructDecl, VarList,
};
use crate::errors::{BclError, SourceLocation};
use ahash::AHashMap;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::io::Write;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// Tracks if/elseif/else membership while walking one statement list.
/// Chains are flat sibling statements, so the walker carries this state
/// instead of the AST carrying child pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainState {
    /// No chain is open; elseif/else arms are skipped
    Seeking,
    /// A chain is open and no arm has fired yet
    Armed,
    /// An arm already fired; remaining arms are skipped
    Fired,
}

pub struct Interpreter {
    structs: AHashMap<String, Rc<StructDecl>>,
    functions: AHashMap<String, Rc<Function>>,
    pub env: Environment,
    output: Option<Arc<Mutex<Vec<u8>>>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            structs: AHashMap::new(),
            functions: AHashMap::new(),
            env: Environment::new(),
            output: None,
        }
    }

    /// Redirect printf output into a shared buffer (used by tests).
    pub fn set_output(&mut self, output: Arc<Mutex<Vec<u8>>>) {
        self.output = Some(output);
    }

    fn write_output(&self, line: &str) {
        if let Some(ref buffer) = self.output {
            if let Ok(mut buffer) = buffer.lock() {
                let _ = writeln!(buffer, "{}", line);
            }
        } else {
            println!("{}", line);
        }
    }

    /// Execute a program: sweep the declarations in file order, registering
    /// structs and functions, initializing globals, and running `main` when
    /// its declaration is reached.
    pub fn run(&mut self, program: &Program) -> Result<(), BclError> {
        let mut main_ran = false;
        for declaration in &program.declarations {
            match declaration {
                Declaration::Struct(s) => {
                    self.structs.insert(s.name.clone(), Rc::new(s.clone()));
                }
                Declaration::VarList(list) => {
                    self.declare_var_list(list)?;
                }
                Declaration::Function(f) => {
                    let func = Rc::new(f.clone());
                    self.functions.insert(f.name.clone(), func.clone());
                    if f.name == "main" {
                        main_ran = true;
                        self.env.push_scope();
                        let result = self.eval_stmts(&func.body);
                        self.env.pop_scope();
                        result?;
                    }
                }
            }
        }
        if !main_ran {
            return Err(BclError::runtime_error(
                "Function 'main' is required to execute the program".to_string(),
                SourceLocation::unknown(),
            ));
        }
        Ok(())
    }

    /// Execute a statement list, carrying if-chain state, until a
    /// non-Normal signal appears.
    fn eval_stmts(&mut self, stmts: &[Stmt]) -> Result<Signal, BclError> {
        let mut chain = ChainState::Seeking;
        for stmt in stmts {
            let signal = match stmt {
                Stmt::If(if_stmt) => self.eval_if_arm(if_stmt, &mut chain)?,
                other => {
                    chain = ChainState::Seeking;
                    self.eval_stmt(other)?
                }
            };
            if !signal.is_normal() {
                return Ok(signal);
            }
        }
        Ok(Signal::Normal)
    }

    /// Execute one arm of an if-chain under the current chain state. Each
    /// condition is evaluated exactly once.
    fn eval_if_arm(
        &mut self,
        if_stmt: &IfStmt,
        chain: &mut ChainState,
    ) -> Result<Signal, BclError> {
        if if_stmt.kind != IfKind::If {
            match *chain {
                ChainState::Armed => {}
                ChainState::Fired | ChainState::Seeking => {
                    if if_stmt.kind == IfKind::Else {
                        *chain = ChainState::Seeking;
                    }
                    return Ok(Signal::Normal);
                }
            }
        }

        let fire = match &if_stmt.condition {
            None => true,
            Some(cond) => self.eval_condition(cond)?,
        };

        let closing = if_stmt.kind == IfKind::Else;
        if fire {
            *chain = if closing { ChainState::Seeking } else { ChainState::Fired };
            self.env.push_scope();
            let signal = self.eval_stmts(&if_stmt.body);
            self.env.pop_scope();
            signal
        } else {
            *chain = if closing { ChainState::Seeking } else { ChainState::Armed };
            Ok(Signal::Normal)
        }
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Signal, BclError> {
        match stmt {
            Stmt::VarList(list) => {
                self.declare_var_list(list)?;
                Ok(Signal::Normal)
            }
            Stmt::Assignment(assignment) => {
                self.eval_assignment(assignment)?;
                Ok(Signal::Normal)
            }
            Stmt::Call(call) => {
                self.eval_call(call)?;
                Ok(Signal::Normal)
            }
            Stmt::Printf(printf) => {
                let line = match &printf.expr {
                    Some(expr) => self.eval_expr(expr)?.to_string(),
                    None => String::new(),
                };
                self.write_output(&line);
                Ok(Signal::Normal)
            }
            Stmt::Return(ret) => {
                let value = match &ret.expr {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                Ok(Signal::Return(value))
            }
            Stmt::Break { .. } => Ok(Signal::Break),
            Stmt::For(for_loop) => self.eval_for(for_loop),
            Stmt::If(if_stmt) => {
                // Reached only for an isolated arm; a fresh chain applies.
                let mut chain = ChainState::Seeking;
                self.eval_if_arm(if_stmt, &mut chain)
            }
        }
    }

    fn declare_var_list(&mut self, list: &VarList) -> Result<(), BclError> {
        for var in &list.variables {
            let value = match &var.init {
                Some(init) => self.eval_expr(init)?,
                None => Value::Null,
            };
            self.env.declare(var.name.clone(), list.ty.clone(), value);
        }
        Ok(())
    }

    fn eval_for(&mut self, for_loop: &ForLoop) -> Result<Signal, BclError> {
        // One scope covers init, condition, increment and body, so the loop
        // variable persists across iterations but not past the loop.
        self.env.push_scope();
        let result = self.run_for(for_loop);
        self.env.pop_scope();
        result
    }

    fn run_for(&mut self, for_loop: &ForLoop) -> Result<Signal, BclError> {
        match &for_loop.init {
            Some(ForInit::Assignment(a)) => self.eval_assignment(a)?,
            Some(ForInit::VarList(list)) => self.declare_var_list(list)?,
            None => {}
        }
        loop {
            if let Some(cond) = &for_loop.condition {
                if !self.eval_condition(cond)? {
                    break;
                }
            }
            match self.eval_stmts(&for_loop.body)? {
                Signal::Break => break,
                Signal::Return(value) => return Ok(Signal::Return(value)),
                Signal::Normal => {}
            }
            if let Some(increment) = &for_loop.increment {
                self.eval_assignment(increment)?;
            }
        }
        Ok(Signal::Normal)
    }

    fn eval_assignment(&mut self, assignment: &Assignment) -> Result<(), BclError> {
        let value = self.eval_expr(&assignment.value)?;
        match &assignment.field {
            Some(field) => {
                let binding = self.env.get(&assignment.target).ok_or_else(|| {
                    BclError::undefined_variable(&assignment.target, assignment.loc.clone())
                })?;
                match binding.value {
                    Value::Struct(instance) => {
                        let struct_name = instance.borrow().name.clone();
                        let value = match self
                            .structs
                            .get(&struct_name)
                            .and_then(|decl| decl.field_type(field).map(str::to_string))
                        {
                            Some(field_ty) => value.coerce_to(&field_ty),
                            None => value,
                        };
                        instance.borrow_mut().fields.insert(field.clone(), value);
                        Ok(())
                    }
                    Value::Null => Err(BclError::runtime_error(
                        format!("Variable '{}' is null", assignment.target),
                        assignment.loc.clone(),
                    )),
                    other => Err(BclError::runtime_error(
                        format!(
                            "Variable '{}' has type '{}' and no fields",
                            assignment.target,
                            other.type_name()
                        ),
                        assignment.loc.clone(),
                    )),
                }
            }
            None => {
                if !self.env.assign(&assignment.target, value) {
                    return Err(BclError::undefined_variable(
                        &assignment.target,
                        assignment.loc.clone(),
                    ));
                }
                Ok(())
            }
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, BclError> {
        match expr {
            Expr::Literal { value, .. } => Ok(match value {
                Literal::Int(n) => Value::Int(*n),
                Literal::Double(d) => Value::Double(*d),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
            }),
            Expr::Null { .. } => Ok(Value::Null),
            Expr::Variable { name, field, loc } => {
                let binding = self
                    .env
                    .get(name)
                    .ok_or_else(|| BclError::undefined_variable(name, loc.clone()))?;
                match field {
                    None => Ok(binding.value),
                    Some(field) => match binding.value {
                        Value::Struct(instance) => Ok(instance
                            .borrow()
                            .fields
                            .get(field)
                            .cloned()
                            .unwrap_or(Value::Null)),
                        Value::Null => Err(BclError::runtime_error(
                            format!("Variable '{}' is null", name),
                            loc.clone(),
                        )),
                        other => Err(BclError::runtime_error(
                            format!(
                                "Variable '{}' has type '{}' and no fields",
                                name,
                                other.type_name()
                            ),
                            loc.clone(),
                        )),
                    },
                }
            }
            Expr::Call(call) => Ok(self.eval_call(call)?.unwrap_or(Value::Null)),
            Expr::New { ty, loc } => self.construct_struct(ty, loc),
            Expr::Binary { op, left, right, loc } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                apply_binary(*op, left, right, loc)
            }
        }
    }

    /// Call a function: arguments evaluate in the caller's environment, then
    /// the body runs in a child scope of that same environment, so the
    /// callee sees the caller's variables. A null argument falls back to the
    /// parameter's default initializer when one is declared.
    fn eval_call(&mut self, call: &CallFunc) -> Result<Option<Value>, BclError> {
        let func = self
            .functions
            .get(&call.name)
            .cloned()
            .ok_or_else(|| BclError::undefined_function(&call.name, call.loc.clone()))?;

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_expr(arg)?);
        }

        self.env.push_scope();
        let result = self.bind_and_run(&func, args);
        self.env.pop_scope();

        match result? {
            Signal::Return(Some(value)) => Ok(Some(value.coerce_to(&func.return_type))),
            Signal::Return(None) | Signal::Break | Signal::Normal => Ok(None),
        }
    }

    fn bind_and_run(&mut self, func: &Function, args: Vec<Value>) -> Result<Signal, BclError> {
        for (param, mut value) in func.params.iter().zip(args) {
            if matches!(value, Value::Null) {
                if let Some(default) = &param.init {
                    value = self.eval_expr(default)?;
                }
            }
            self.env.declare(param.name.clone(), param.ty.clone(), value);
        }
        self.eval_stmts(&func.body)
    }

    /// Allocate a fresh struct instance; field initializers evaluate in the
    /// current environment, missing initializers yield null.
    fn construct_struct(&mut self, ty: &str, loc: &SourceLocation) -> Result<Value, BclError> {
        let decl = self.structs.get(ty).cloned().ok_or_else(|| {
            BclError::runtime_error(format!("Struct type '{}' does not exist", ty), loc.clone())
        })?;

        let mut order = Vec::new();
        let mut fields = AHashMap::new();
        for list in &decl.fields {
            for var in &list.variables {
                let value = match &var.init {
                    Some(init) => self.eval_expr(init)?,
                    None => Value::Null,
                };
                order.push(var.name.clone());
                fields.insert(var.name.clone(), value.coerce_to(&list.ty));
            }
        }
        Ok(Value::Struct(Rc::new(RefCell::new(StructInstance {
            name: ty.to_string(),
            order,
            fields,
        }))))
    }

    fn eval_condition(&mut self, cond: &Comparison) -> Result<bool, BclError> {
        match self.eval_comparison(cond)? {
            Value::Bool(b) => Ok(b),
            other => Err(BclError::runtime_error(
                format!("Expected a boolean condition, but found '{}'", other.type_name()),
                cond.location(),
            )),
        }
    }

    fn eval_comparison(&mut self, cmp: &Comparison) -> Result<Value, BclError> {
        match cmp {
            Comparison::Bare(expr) => self.eval_expr(expr),
            Comparison::Not { operand, loc } => match self.eval_comparison(operand)? {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(BclError::runtime_error(
                    format!("Cannot negate a value of type '{}'", other.type_name()),
                    loc.clone(),
                )),
            },
            Comparison::Logical { op, left, right, loc } => {
                // Both sides evaluate eagerly; there is no short-circuiting.
                let left = self.eval_comparison(left)?;
                let right = self.eval_comparison(right)?;
                match (left, right) {
                    (Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(match op {
                        LogicalOp::And => l && r,
                        LogicalOp::Or => l || r,
                    })),
                    (l, r) => Err(BclError::runtime_error(
                        format!(
                            "Logical operators need boolean operands, found '{}' and '{}'",
                            l.type_name(),
                            r.type_name()
                        ),
                        loc.clone(),
                    )),
                }
            }
            Comparison::Relation { op, left, right, loc } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                compare_values(*op, &left, &right, loc).map(Value::Bool)
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_binary(op: BinOp, left: Value, right: Value, loc: &SourceLocation) -> Result<Value, BclError> {
    // String concatenation rides on Add and stringifies the other operand.
    if op == BinOp::Add && (matches!(left, Value::Str(_)) || matches!(right, Value::Str(_))) {
        return Ok(Value::Str(format!("{}{}", left, right)));
    }

    match (&left, &right) {
        (Value::Int(l), Value::Int(r)) => {
            let (l, r) = (*l, *r);
            match op {
                BinOp::Add => Ok(Value::Int(l.wrapping_add(r))),
                BinOp::Sub => Ok(Value::Int(l.wrapping_sub(r))),
                BinOp::Mul => Ok(Value::Int(l.wrapping_mul(r))),
                BinOp::Div => {
                    if r == 0 {
                        Err(BclError::runtime_error("Division by zero".to_string(), loc.clone()))
                    } else {
                        Ok(Value::Int(l.wrapping_div(r)))
                    }
                }
                BinOp::Mod => {
                    if r == 0 {
                        Err(BclError::runtime_error("Division by zero".to_string(), loc.clone()))
                    } else {
                        Ok(Value::Int(l.wrapping_rem(r)))
                    }
                }
            }
        }
        (Value::Int(_), Value::Double(_))
        | (Value::Double(_), Value::Int(_))
        | (Value::Double(_), Value::Double(_)) => {
            let l = as_f64(&left);
            let r = as_f64(&right);
            Ok(Value::Double(match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
                BinOp::Mod => l % r,
            }))
        }
        _ => Err(BclError::runtime_error(
            format!(
                "No arithmetic operation allowed between '{}' and '{}'",
                left.type_name(),
                right.type_name()
            ),
            loc.clone(),
        )),
    }
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int(n) => *n as f64,
        Value::Double(d) => *d,
        _ => 0.0,
    }
}

fn compare_values(
    op: RelOp,
    left: &Value,
    right: &Value,
    loc: &SourceLocation,
) -> Result<bool, BclError> {
    let ordering = match (left, right) {
        (Value::Null, Value::Null) => {
            return Ok(match op {
                RelOp::Eq => true,
                _ => false,
            });
        }
        (Value::Null, _) | (_, Value::Null) => {
            return Ok(match op {
                RelOp::Eq => false,
                RelOp::Ne => true,
                _ => false,
            });
        }
        (Value::Int(l), Value::Int(r)) => l.cmp(r),
        (Value::Int(_), Value::Double(_))
        | (Value::Double(_), Value::Int(_))
        | (Value::Double(_), Value::Double(_)) => as_f64(left).total_cmp(&as_f64(right)),
        (Value::Str(l), Value::Str(r)) => l.cmp(r),
        (Value::Bool(l), Value::Bool(r)) => match op {
            RelOp::Eq => return Ok(l == r),
            RelOp::Ne => return Ok(l != r),
            _ => {
                return Err(BclError::runtime_error(
                    "Booleans only support '==' and '!='".to_string(),
                    loc.clone(),
                ));
            }
        },
        _ => {
            return Err(BclError::runtime_error(
                format!(
                    "Cannot compare values of types '{}' and '{}'",
                    left.type_name(),
                    right.type_name()
                ),
                loc.clone(),
            ));
        }
    };

    Ok(match op {
        RelOp::Eq => ordering == Ordering::Equal,
        RelOp::Ne => ordering != Ordering::Equal,
        RelOp::Lt => ordering == Ordering::Less,
        RelOp::Gt => ordering == Ordering::Greater,
        RelOp::Le => ordering != Ordering::Greater,
        RelOp::Ge => ordering != Ordering::Less,
    })
}
