use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Value stored in an attribute slot.
///
/// An attribute does not fix the variant of its values; each slot holds
/// whatever was last written. Empty slots are `None` at the table level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Owned string.
    Str(String),
    /// Owned byte vector.
    Bytes(Vec<u8>),
}

impl AttributeValue {
    /// Name of the variant, as used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Int(_) => "int",
            AttributeValue::Float(_) => "float",
            AttributeValue::Str(_) => "str",
            AttributeValue::Bytes(_) => "bytes",
        }
    }

    fn mismatch(&self, expected: &'static str) -> GraphError {
        GraphError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    /// The boolean held by this value.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            AttributeValue::Bool(v) => Ok(*v),
            other => Err(other.mismatch("bool")),
        }
    }

    /// The integer held by this value.
    pub fn as_int(&self) -> Result<i64> {
        match self {
            AttributeValue::Int(v) => Ok(*v),
            other => Err(other.mismatch("int")),
        }
    }

    /// The number held by this value; integers widen to `f64`.
    pub fn as_float(&self) -> Result<f64> {
        match self {
            AttributeValue::Float(v) => Ok(*v),
            AttributeValue::Int(v) => Ok(*v as f64),
            other => Err(other.mismatch("float")),
        }
    }

    /// The string held by this value.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            AttributeValue::Str(v) => Ok(v),
            other => Err(other.mismatch("str")),
        }
    }

    /// The bytes held by this value.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            AttributeValue::Bytes(v) => Ok(v),
            other => Err(other.mismatch("bytes")),
        }
    }

    /// Converts a loader row cell. JSON `null` means "no value".
    ///
    /// Numbers become `Int` when they fit an `i64` and `Float` otherwise.
    /// Arrays and objects are rejected.
    pub fn from_json(value: serde_json::Value) -> Result<Option<AttributeValue>> {
        match value {
            serde_json::Value::Null => Ok(None),
            other => AttributeValue::try_from(other).map(Some),
        }
    }

    /// Renders the value as a JSON cell; bytes become an array of numbers.
    ///
    /// JSON has no NaN or infinity, so a non-finite `Float` renders as
    /// `null`. Feeding that cell back through [`AttributeValue::from_json`]
    /// clears the slot; check [`f64::is_finite`] first where that matters.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AttributeValue::Bool(v) => serde_json::Value::Bool(*v),
            AttributeValue::Int(v) => serde_json::Value::Number((*v).into()),
            AttributeValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            AttributeValue::Str(v) => serde_json::Value::String(v.clone()),
            AttributeValue::Bytes(v) => serde_json::Value::Array(
                v.iter()
                    .map(|b| serde_json::Value::Number((*b).into()))
                    .collect(),
            ),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl TryFrom<serde_json::Value> for AttributeValue {
    type Error = GraphError;

    fn try_from(value: serde_json::Value) -> std::result::Result<Self, Self::Error> {
        match value {
            serde_json::Value::Bool(v) => Ok(AttributeValue::Bool(v)),
            serde_json::Value::String(v) => Ok(AttributeValue::Str(v)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Ok(AttributeValue::Int(v)),
                None => n.as_f64().map(AttributeValue::Float).ok_or(GraphError::TypeMismatch {
                    expected: "scalar",
                    found: "number",
                }),
            },
            other => Err(GraphError::TypeMismatch {
                expected: "scalar",
                found: json_kind(&other),
            }),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Str(v) => write!(f, "{v}"),
            AttributeValue::Bytes(v) => write!(f, "bytes(len={})", v.len()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Bytes(value)
    }
}
