use std::fmt;

/// One cell of a record.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Category(String),
    Missing,
}

impl Value {
    pub fn category(v: impl Into<String>) -> Value {
        Value::Category(v.into())
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    #[inline]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Value::Category(s) => Some(s),
            _ => None,
        }
    }
}

/// Numbers print as the shortest decimal that reads back to the same `f64`;
/// missing prints as nothing.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{x}"),
            Value::Category(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}
