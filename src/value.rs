use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

/// Marker prefixed to a reference when it is rendered or serialized.
pub const REFERENCE_MARKER: char = '!';

/// A resolved constant value.
///
/// `Reference` is what an identifier inside an array literal turns into. It is
/// never looked up while parsing: only a top-level `!NAME` line reads the
/// symbol table, and it returns the stored value as-is, references included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Array(Vec<Value>),
    Reference(String),
}

impl Value {
    pub fn reference(name: impl Into<String>) -> Self {
        Value::Reference(name.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Array(_) => "array",
            Value::Reference(_) => "reference",
        }
    }

    /// Names of every reference reachable from this value, in order of appearance.
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Value::Integer(_) => {}
            Value::Array(items) => {
                for item in items {
                    item.collect_references(names);
                }
            }
            Value::Reference(name) => names.push(name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Reference(name) => write!(f, "{REFERENCE_MARKER}{name}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Reference(name) => {
                serializer.serialize_str(&format!("{REFERENCE_MARKER}{name}"))
            }
        }
    }
}
