// File: src/interpreter/value.rs
//
// Runtime value types for the BCL interpreter.
//
// Struct instances live behind Rc<RefCell<..>> so that copies of a binding
// alias the same instance: field mutation is visible through every binding,
// while rebinding a variable stays local to its scope.

use ahash::AHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Double(f64),
    Str(String),
    Bool(bool),
    Struct(Rc<RefCell<StructInstance>>),
    Null,
}

/// A live struct instance: field values plus the declaration order used for
/// display.
#[derive(Debug)]
pub struct StructInstance {
    pub name: String,
    pub order: Vec<String>,
    pub fields: AHashMap<String, Value>,
}

impl Value {
    /// Apply the declared-type widening rule: an `int` value stored where a
    /// `double` is declared becomes a `double`. Everything else is stored
    /// unchanged.
    pub fn coerce_to(self, declared: &str) -> Value {
        match (declared, self) {
            ("double", Value::Int(n)) => Value::Double(n as f64),
            (_, value) => value,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Struct(_) => "struct",
            Value::Null => "null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(d) => {
                // Doubles always show a decimal point, so `3` and `3.0`
                // stay distinguishable.
                if d.is_finite() && d.fract() == 0.0 && d.abs() < 1e16 {
                    write!(f, "{:.1}", d)
                } else {
                    write!(f, "{}", d)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::Struct(instance) => {
                let instance = instance.borrow();
                write!(f, "{{ ")?;
                for (i, field) in instance.order.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match instance.fields.get(field) {
                        Some(value) => write!(f, "{} = {}", field, value)?,
                        None => write!(f, "{} = null", field)?,
                    }
                }
                write!(f, " }}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_display_keeps_decimal_point() {
        assert_eq!(Value::Double(3.0).to_string(), "3.0");
        assert_eq!(Value::Double(0.5).to_string(), "0.5");
        assert_eq!(Value::Int(3).to_string(), "3");
    }

    #[test]
    fn test_null_displays_as_null() {
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_int_coerces_to_double() {
        assert!(matches!(Value::Int(2).coerce_to("double"), Value::Double(d) if d == 2.0));
        assert!(matches!(Value::Int(2).coerce_to("int"), Value::Int(2)));
    }

    #[test]
    fn test_struct_display_uses_declaration_order() {
        let mut fields = AHashMap::new();
        fields.insert("x".to_string(), Value::Int(7));
        fields.insert("y".to_string(), Value::Null);
        let instance = StructInstance {
            name: "Point".to_string(),
            order: vec!["x".to_string(), "y".to_string()],
            fields,
        };
        let value = Value::Struct(Rc::new(RefCell::new(instance)));
        assert_eq!(value.to_string(), "{ x = 7, y = null }");
    }
}
