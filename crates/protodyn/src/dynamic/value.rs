// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic field values.

use super::DynamicMessage;
use crate::definition::ScalarKind;
use crate::schema::EnumValue;

/// Value held by (or reported for) one field of a [`DynamicMessage`].
///
/// Several scalar kinds share a variant: `int32`, `sint32` and `sfixed32` all
/// hold [`Value::I32`], `uint32` and `fixed32` hold [`Value::U32`], and so on.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Enum(EnumValue),
    Message(DynamicMessage),
    /// Contents of a repeated field, in insertion order.
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Self::Message(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Short description of the variant, used in mismatch errors.
    pub fn kind_name(&self) -> String {
        match self {
            Self::Bool(_) => "bool".to_string(),
            Self::I32(_) => "i32".to_string(),
            Self::I64(_) => "i64".to_string(),
            Self::U32(_) => "u32".to_string(),
            Self::U64(_) => "u64".to_string(),
            Self::F32(_) => "f32".to_string(),
            Self::F64(_) => "f64".to_string(),
            Self::String(_) => "string".to_string(),
            Self::Bytes(_) => "bytes".to_string(),
            Self::Enum(v) => format!("enum {}", v.enum_type().full_name()),
            Self::Message(m) => format!("message {}", m.descriptor().full_name()),
            Self::List(_) => "list".to_string(),
        }
    }

    /// Whether this value can be stored in a field of the scalar kind.
    pub(crate) fn fits_scalar(&self, kind: ScalarKind) -> bool {
        matches!(
            (self, kind),
            (Self::F64(_), ScalarKind::Double)
                | (Self::F32(_), ScalarKind::Float)
                | (
                    Self::I32(_),
                    ScalarKind::Int32 | ScalarKind::SInt32 | ScalarKind::SFixed32
                )
                | (
                    Self::I64(_),
                    ScalarKind::Int64 | ScalarKind::SInt64 | ScalarKind::SFixed64
                )
                | (Self::U32(_), ScalarKind::UInt32 | ScalarKind::Fixed32)
                | (Self::U64(_), ScalarKind::UInt64 | ScalarKind::Fixed64)
                | (Self::Bool(_), ScalarKind::Bool)
                | (Self::String(_), ScalarKind::String)
                | (Self::Bytes(_), ScalarKind::Bytes)
        )
    }
}

macro_rules! impl_from_for_value {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_from_for_value!(bool, Bool);
impl_from_for_value!(i32, I32);
impl_from_for_value!(i64, I64);
impl_from_for_value!(u32, U32);
impl_from_for_value!(u64, U64);
impl_from_for_value!(f32, F32);
impl_from_for_value!(f64, F64);
impl_from_for_value!(String, String);
impl_from_for_value!(Vec<u8>, Bytes);
impl_from_for_value!(EnumValue, Enum);
impl_from_for_value!(DynamicMessage, Message);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(7i32), Value::I32(7));
        assert_eq!(Value::from("hi"), Value::String("hi".into()));
        assert_eq!(Value::from(&b"\x01"[..]), Value::Bytes(vec![1]));
        assert_eq!(Value::from(2.5f64).as_f64(), Some(2.5));
        assert_eq!(Value::from(true).as_i32(), None);
    }

    #[test]
    fn test_scalar_fit() {
        assert!(Value::I32(1).fits_scalar(ScalarKind::SFixed32));
        assert!(Value::U64(1).fits_scalar(ScalarKind::Fixed64));
        assert!(!Value::I32(1).fits_scalar(ScalarKind::Int64));
        assert!(!Value::F32(1.0).fits_scalar(ScalarKind::Double));
        assert!(!Value::String("x".into()).fits_scalar(ScalarKind::Bytes));
    }
}
