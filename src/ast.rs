// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the BCL language.
// Defines the structure of parsed BCL programs.
//
// A program is a flat list of declarations (structs, global variables,
// functions) in file order. Statements (Stmt) represent actions and control
// flow; arithmetic expressions (Expr) and boolean expressions (Comparison)
// are separate worlds that only meet at the relational operators.
//
// Every node carries the source location of the token it started at.

use crate::errors::SourceLocation;

/// A complete parsed program: top-level declarations in file order.
#[derive(Debug, Clone)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone)]
pub enum Declaration {
    Struct(StructDecl),
    VarList(VarList),
    Function(Function),
}

/// `struct Name { field lists }` — a named record type.
#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<VarList>,
    pub loc: SourceLocation,
}

impl StructDecl {
    /// Declared type of a field, if the struct has one by that name.
    pub fn field_type(&self, field: &str) -> Option<&str> {
        for list in &self.fields {
            if list.variables.iter().any(|v| v.name == field) {
                return Some(&list.ty);
            }
        }
        None
    }
}

/// One declaration line: a type followed by one or more variables,
/// e.g. `int a, b = 2;`.
#[derive(Debug, Clone)]
pub struct VarList {
    pub ty: String,
    pub variables: Vec<Variable>,
    pub loc: SourceLocation,
}

/// A single declared variable (or function parameter) with an optional
/// initializer. Parameters use the initializer as a default value.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub ty: String,
    pub init: Option<Expr>,
    pub is_param: bool,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub return_type: String,
    pub name: String,
    pub params: Vec<Variable>,
    pub body: Vec<Stmt>,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    VarList(VarList),
    Assignment(Assignment),
    Call(CallFunc),
    For(ForLoop),
    If(IfStmt),
    Printf(Printf),
    Return(Return),
    Break { loc: SourceLocation },
}

/// `target = value;` or `target.field = value;`
#[derive(Debug, Clone)]
pub struct Assignment {
    pub target: String,
    pub field: Option<String>,
    pub value: Expr,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct CallFunc {
    pub name: String,
    pub args: Vec<Expr>,
    pub loc: SourceLocation,
}

/// `for (init?; condition?; increment?) { body }` — every header slot is
/// optional; a missing condition loops until `break` or `return`.
#[derive(Debug, Clone)]
pub struct ForLoop {
    pub init: Option<ForInit>,
    pub condition: Option<Comparison>,
    pub increment: Option<Assignment>,
    pub body: Vec<Stmt>,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub enum ForInit {
    Assignment(Assignment),
    VarList(VarList),
}

/// One arm of an if-chain. `if`, `elseif` and `else` parse as flat sibling
/// statements; chain membership is resolved per statement list, not through
/// child pointers.
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub kind: IfKind,
    pub condition: Option<Comparison>,
    pub body: Vec<Stmt>,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfKind {
    If,
    Elseif,
    Else,
}

impl IfKind {
    pub fn keyword(self) -> &'static str {
        match self {
            IfKind::If => "if",
            IfKind::Elseif => "elseif",
            IfKind::Else => "else",
        }
    }
}

/// `printf(expr?);` — prints one line; no expression prints a blank line.
#[derive(Debug, Clone)]
pub struct Printf {
    pub expr: Option<Expr>,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct Return {
    pub expr: Option<Expr>,
    pub loc: SourceLocation,
}

/// Arithmetic expressions. String concatenation rides on `Add`.
#[derive(Debug, Clone)]
pub enum Expr {
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        loc: SourceLocation,
    },
    /// A variable read, optionally through one level of field access.
    Variable {
        name: String,
        field: Option<String>,
        loc: SourceLocation,
    },
    Literal {
        value: Literal,
        loc: SourceLocation,
    },
    Call(CallFunc),
    /// `new T()` — allocate a fresh struct instance.
    New {
        ty: String,
        loc: SourceLocation,
    },
    Null {
        loc: SourceLocation,
    },
}

impl Expr {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Binary { loc, .. }
            | Expr::Variable { loc, .. }
            | Expr::Literal { loc, .. }
            | Expr::New { loc, .. }
            | Expr::Null { loc } => loc.clone(),
            Expr::Call(call) => call.loc.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Double(f64),
    Str(String),
    Bool(bool),
}

/// Boolean expressions: logical connectives over negations, relational
/// comparisons, and bare boolean-valued arithmetic expressions.
#[derive(Debug, Clone)]
pub enum Comparison {
    Logical {
        op: LogicalOp,
        left: Box<Comparison>,
        right: Box<Comparison>,
        loc: SourceLocation,
    },
    Not {
        operand: Box<Comparison>,
        loc: SourceLocation,
    },
    Relation {
        op: RelOp,
        left: Expr,
        right: Expr,
        loc: SourceLocation,
    },
    Bare(Expr),
}

impl Comparison {
    pub fn location(&self) -> SourceLocation {
        match self {
            Comparison::Logical { loc, .. }
            | Comparison::Not { loc, .. }
            | Comparison::Relation { loc, .. } => loc.clone(),
            Comparison::Bare(expr) => expr.location(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}
