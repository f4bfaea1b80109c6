//! Runtime variables substituted into `${name}` placeholders.

use serde_yaml::Value;
use std::collections::HashMap;
use std::fmt;

/// A typed runtime value.
///
/// The type decides what a placeholder turns into: `${rate}` bound to
/// `Variable::Float(0.1)` becomes the YAML number `0.1`, never the string
/// `"0.1"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<Variable>),
}

impl Variable {
    /// Parse a command-line literal: integer, then float, then boolean,
    /// falling back to a string.
    pub fn parse_literal(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            Self::Int(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            Self::Float(f)
        } else if let Ok(b) = raw.parse::<bool>() {
            Self::Bool(b)
        } else {
            Self::Str(raw.to_owned())
        }
    }

    /// The YAML value this variable substitutes as.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(i) => Value::Number((*i).into()),
            Self::Float(f) => Value::Number((*f).into()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Str(s) => Value::String(s.clone()),
            Self::List(items) => Value::Sequence(items.iter().map(Self::to_value).collect()),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<i64> for Variable {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Variable {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Variable {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Variable {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Variable {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Variable {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Variable {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Named runtime variables supplied by the caller at load time.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, Variable>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Variable>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Variable>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K: Into<String>, V: Into<Variable>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}
