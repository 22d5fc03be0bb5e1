//! Node attribute model
//!
//! Attributes are a closed tagged union: integer, float, string, boolean, or a
//! list of attributes (nesting recursively). A node carries them in an
//! insertion-ordered [`AttrMap`] so that iteration and serialization are
//! deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attribute name → value, in insertion order
pub type AttrMap = IndexMap<String, AttrValue>;

/// A single attribute value
///
/// Serialized externally tagged, e.g. `{"int": 3}` or `{"list": [{"bool": true}]}`,
/// so integers and floats never get confused on reload. Finite floats are
/// written as JSON numbers and reload bit-for-bit; non-finite ones are
/// written as the strings `"inf"`, `"-inf"` and `"nan"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(#[serde(with = "serde_helpers::float_repr")] f64),
    /// UTF-8 string
    String(String),
    /// Boolean
    Bool(bool),
    /// Nested list of attributes
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Integer payload, if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float payload, if this is a `Float`
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload, if this is a `String`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean payload, if this is a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// List payload, if this is a `List`
    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Short tag name, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(v: Vec<AttrValue>) -> Self {
        Self::List(v)
    }
}

/// Build an [`AttrMap`] from `(name, value)` pairs
///
/// Later duplicates overwrite earlier ones, keeping names unique.
pub fn attrs<I, K, V>(pairs: I) -> AttrMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<AttrValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

mod serde_helpers {
    pub mod float_repr {
        use std::fmt;

        use serde::de::{self, Visitor};
        use serde::{Deserializer, Serializer};

        pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            if value.is_finite() {
                serializer.serialize_f64(*value)
            } else if value.is_nan() {
                serializer.serialize_str("nan")
            } else if value.is_sign_positive() {
                serializer.serialize_str("inf")
            } else {
                serializer.serialize_str("-inf")
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(FloatVisitor)
        }

        struct FloatVisitor;

        impl<'de> Visitor<'de> for FloatVisitor {
            type Value = f64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or one of \"inf\", \"-inf\", \"nan\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
                match v {
                    "inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    "nan" => Ok(f64::NAN),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }
    }
}
