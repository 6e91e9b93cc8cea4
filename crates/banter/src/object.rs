//! The public host-facing value type.

use std::fmt;
use std::rc::Rc;

use crate::value::{Value, format_number};

/// A value that can be passed to or returned from the interpreter.
///
/// This is the public-facing type for program inputs and results. It owns
/// all its data and can be freely cloned or stored. Unlike the internal
/// runtime value it cannot represent blocks, deferred bindings, or the
/// undefined value; results of those kinds surface as "no value"
/// (`None`) from [`crate::Vm::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// A 64-bit float.
    Number(f64),
    /// A UTF-8 string.
    String(String),
    /// `true` or `false`.
    Boolean(bool),
    /// A heterogeneous ordered sequence; may nest.
    Array(Vec<Self>),
}

impl Object {
    /// Converts a runtime value, answering `None` for kinds that have no
    /// host representation (blocks, deferred bindings, undefined), at any
    /// nesting depth.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Some(Self::Number(*number)),
            Value::Str(string) => Some(Self::String(string.to_string())),
            Value::Boolean(boolean) => Some(Self::Boolean(*boolean)),
            Value::Array(elements) => elements
                .iter()
                .map(Self::from_value)
                .collect::<Option<Vec<_>>>()
                .map(Self::Array),
            Value::Block(_) | Value::Deferred(_) | Value::Undefined => None,
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        match self {
            Self::Number(number) => Value::Number(*number),
            Self::String(string) => Value::Str(Rc::from(string.as_str())),
            Self::Boolean(boolean) => Value::Boolean(*boolean),
            Self::Array(elements) => {
                Value::Array(elements.iter().map(Self::to_value).collect::<Vec<_>>().into())
            }
        }
    }
}

/// Numbers print in shortest round-trip form, strings print verbatim, and
/// arrays print in literal-array syntax: `#(1.0 2.0 3.0)`.
impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => f.write_str(&format_number(*number)),
            Self::String(string) => f.write_str(string),
            Self::Boolean(boolean) => write!(f, "{boolean}"),
            Self::Array(elements) => {
                f.write_str("#(")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<f64> for Object {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Object>> for Object {
    fn from(value: Vec<Object>) -> Self {
        Self::Array(value)
    }
}
