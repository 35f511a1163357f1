//! Values held by variables.
//!
//! A `Value` is an immutable data item belonging to some domain. Discrete
//! values additionally expose an integer index; categorical values pair a
//! category label with that index.

use std::fmt;
use std::sync::Arc;

use crate::tensor::Tensor;

/// An immutable member of a domain.
///
/// # Example
///
/// ```
/// use factorforge_core::Value;
///
/// let v = Value::Discrete(3);
/// assert_eq!(v.index(), Some(3));
///
/// let c = Value::categorical(1, "NOUN");
/// assert_eq!(c.index(), Some(1));
/// assert_eq!(c.category(), Some("NOUN"));
///
/// assert_eq!(Value::Real(0.5).index(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Position in a fixed-size discrete domain.
    Discrete(usize),
    /// Category label paired with its index in a categorical domain.
    Category { index: usize, category: Arc<str> },
    /// Boolean value; index 0 is `false`, index 1 is `true`.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Real value.
    Real(f64),
    /// Free text.
    Text(Arc<str>),
    /// Tensor value, used by weights when scored against.
    Tensor(Tensor),
}

impl Value {
    /// Creates a categorical value.
    pub fn categorical(index: usize, category: impl Into<Arc<str>>) -> Self {
        Value::Category {
            index,
            category: category.into(),
        }
    }

    /// Creates a text value.
    pub fn text(text: impl Into<Arc<str>>) -> Self {
        Value::Text(text.into())
    }

    /// Returns the discrete index of this value, if it has one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Value::Discrete(index) => Some(*index),
            Value::Category { index, .. } => Some(*index),
            Value::Boolean(b) => Some(usize::from(*b)),
            _ => None,
        }
    }

    /// Returns the category label for categorical values.
    pub fn category_label(&self) -> Option<&Arc<str>> {
        match self {
            Value::Category { category, .. } => Some(category),
            _ => None,
        }
    }

    /// Returns the category label as a string slice.
    pub fn category(&self) -> Option<&str> {
        self.category_label().map(|c| c.as_ref())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a real view of numeric values.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Value::Tensor(t) => Some(t),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Discrete(_) => "discrete",
            Value::Category { .. } => "category",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Tensor(_) => "tensor",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Discrete(index) => write!(f, "#{index}"),
            Value::Category { index, category } => write!(f, "{category}(#{index})"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(t) => write!(f, "{t:?}"),
            Value::Tensor(t) => write!(f, "tensor{:?}", t.shape()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<Tensor> for Value {
    fn from(t: Tensor) -> Self {
        Value::Tensor(t)
    }
}
