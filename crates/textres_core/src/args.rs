use std::hash::{Hash, Hasher};

use crate::descriptor::TextDescriptor;

/// A formatting argument.
///
/// Floats compare and hash by bit pattern so that descriptors carrying them keep
/// a lawful `Eq`/`Hash` (`NaN == NaN`, `0.0 != -0.0`).
#[derive(Clone, Debug)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Another descriptor, resolved against the same context right before
    /// substitution.
    Text(TextDescriptor),
}

impl FormatArg {
    /// Short type name used in format error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FormatArg::Str(_) => "string",
            FormatArg::Int(_) => "integer",
            FormatArg::Float(_) => "float",
            FormatArg::Bool(_) => "bool",
            FormatArg::Text(_) => "text",
        }
    }
}

impl PartialEq for FormatArg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FormatArg::Str(a), FormatArg::Str(b)) => a == b,
            (FormatArg::Int(a), FormatArg::Int(b)) => a == b,
            (FormatArg::Float(a), FormatArg::Float(b)) => a.to_bits() == b.to_bits(),
            (FormatArg::Bool(a), FormatArg::Bool(b)) => a == b,
            (FormatArg::Text(a), FormatArg::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FormatArg {}

impl Hash for FormatArg {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FormatArg::Str(s) => s.hash(state),
            FormatArg::Int(i) => i.hash(state),
            FormatArg::Float(f) => f.to_bits().hash(state),
            FormatArg::Bool(b) => b.hash(state),
            FormatArg::Text(t) => t.hash(state),
        }
    }
}

impl From<String> for FormatArg {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for FormatArg {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<&String> for FormatArg {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<char> for FormatArg {
    fn from(v: char) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<i64> for FormatArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for FormatArg {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for FormatArg {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<usize> for FormatArg {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for FormatArg {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for FormatArg {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<bool> for FormatArg {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<TextDescriptor> for FormatArg {
    fn from(v: TextDescriptor) -> Self {
        Self::Text(v)
    }
}

impl From<&TextDescriptor> for FormatArg {
    fn from(v: &TextDescriptor) -> Self {
        Self::Text(v.clone())
    }
}
