// File: src/interpreter/environment.rs
//
// Scoped variable storage for the BCL interpreter, with copy-on-enter
// semantics: lookups search from the innermost scope outward, but every
// write lands in the innermost scope. A block therefore sees everything the
// enclosing scope holds, while its own declarations and reassignments
// vanish when the scope is popped.

use super::value::Value;
use ahash::AHashMap;

/// One variable binding: the declared type (used for int-to-double widening
/// on later writes) and the current value.
#[derive(Clone, Debug)]
pub struct Binding {
    pub ty: String,
    pub value: Value,
}

#[derive(Clone, Debug, Default)]
pub struct Environment {
    scopes: Vec<AHashMap<String, Binding>>,
}

impl Environment {
    /// Create a new environment with a single global scope
    pub fn new() -> Self {
        Environment { scopes: vec![AHashMap::new()] }
    }

    /// Push a new scope onto the stack (entering a block or a call)
    pub fn push_scope(&mut self) {
        self.scopes.push(AHashMap::new());
    }

    /// Pop the innermost scope, discarding every write made inside it
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Get a binding, searching from inner to outer scopes.
    /// Returns a clone; struct values still alias their instance.
    pub fn get(&self, name: &str) -> Option<Binding> {
        for scope in self.scopes.iter().rev() {
            if let Some(binding) = scope.get(name) {
                return Some(binding.clone());
            }
        }
        None
    }

    /// Declare a variable in the innermost scope, widening the value to the
    /// declared type.
    pub fn declare(&mut self, name: String, ty: String, value: Value) {
        let value = value.coerce_to(&ty);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, Binding { ty, value });
        }
    }

    /// Assign to an existing variable. The declared type is taken from the
    /// visible binding, but the write always lands in the innermost scope so
    /// it cannot leak out of the current block. Returns false when the name
    /// is not bound anywhere.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        let ty = match self.get(name) {
            Some(binding) => binding.ty,
            None => return false,
        };
        self.declare(name.to_string(), ty, value);
        true
    }
}
