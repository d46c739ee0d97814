// File: src/interpreter/control_flow.rs
//
// Control flow signals for statement execution.
//
// Every statement evaluates to a Signal. Statement lists stop at the first
// non-Normal signal and hand it upward: a for-loop consumes Break, a call
// consumes Return and yields its value. This keeps break/return propagation
// explicit instead of threading sentinel values through the evaluator.

use super::value::Value;

/// Result of executing one statement (or statement list)
#[derive(Debug, Clone)]
pub(crate) enum Signal {
    /// Normal completion, continue with the next statement
    Normal,
    /// Break out of the innermost for-loop
    Break,
    /// Return from the current function, possibly with a value
    Return(Option<Value>),
}

impl Signal {
    pub(crate) fn is_normal(&self) -> bool {
        matches!(self, Signal::Normal)
    }
}
