// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field and enum value declarations.

use crate::error::{Result, SchemaError};
use std::fmt;
use std::str::FromStr;

/// Highest field number accepted by the protobuf wire format.
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// Field numbers reserved for the protobuf implementation itself.
pub const RESERVED_FIELD_NUMBERS: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Required,
    Optional,
    Repeated,
}

impl Label {
    /// Keyword used in `.proto` syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Repeated => "repeated",
        }
    }

    pub fn is_repeated(self) -> bool {
        matches!(self, Self::Repeated)
    }
}

impl FromStr for Label {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "optional" => Ok(Self::Optional),
            "repeated" => Ok(Self::Repeated),
            other => Err(SchemaError::Validation(format!(
                "unrecognized field label '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar field kinds, one per protobuf scalar keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarKind {
    /// Map a declared type name to a scalar kind, if it is a scalar keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "double" => Self::Double,
            "float" => Self::Float,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint32" => Self::UInt32,
            "uint64" => Self::UInt64,
            "sint32" => Self::SInt32,
            "sint64" => Self::SInt64,
            "fixed32" => Self::Fixed32,
            "fixed64" => Self::Fixed64,
            "sfixed32" => Self::SFixed32,
            "sfixed64" => Self::SFixed64,
            "bool" => Self::Bool,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            _ => return None,
        };
        Some(kind)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::SInt32 => "sint32",
            Self::SInt64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::SFixed32 => "sfixed32",
            Self::SFixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One field declaration, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: Label,
    /// Scalar keyword or (possibly dotted, possibly absolute) type name.
    pub type_name: String,
    pub name: String,
    pub number: u32,
    /// Declared default, validated during resolution.
    pub default: Option<String>,
}

impl FieldSpec {
    /// Create a field declaration, checking the field number range.
    pub fn new(
        label: Label,
        type_name: impl Into<String>,
        name: impl Into<String>,
        number: u32,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::Validation(format!(
                "field number {} has an empty name",
                number
            )));
        }
        if number == 0 || number > MAX_FIELD_NUMBER {
            return Err(SchemaError::Validation(format!(
                "field '{}' number {} outside 1..={}",
                name, number, MAX_FIELD_NUMBER
            )));
        }
        if RESERVED_FIELD_NUMBERS.contains(&number) {
            return Err(SchemaError::Validation(format!(
                "field '{}' number {} is in the reserved range {:?}",
                name, number, RESERVED_FIELD_NUMBERS
            )));
        }
        Ok(Self {
            label,
            type_name: type_name.into(),
            name,
            number,
            default: None,
        })
    }

    /// Attach a declared default.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Scalar kind when the declared type is a scalar keyword.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        ScalarKind::from_keyword(&self.type_name)
    }
}

/// One enum value declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueSpec {
    pub name: String,
    pub number: i32,
}

impl EnumValueSpec {
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse() {
        assert_eq!("required".parse::<Label>().unwrap(), Label::Required);
        assert_eq!("Optional".parse::<Label>().unwrap(), Label::Optional);
        assert_eq!(" repeated ".parse::<Label>().unwrap(), Label::Repeated);
        assert!(matches!(
            "sometimes".parse::<Label>(),
            Err(SchemaError::Validation(_))
        ));
    }

    #[test]
    fn test_scalar_keywords() {
        assert_eq!(ScalarKind::from_keyword("int32"), Some(ScalarKind::Int32));
        assert_eq!(ScalarKind::from_keyword("bytes"), Some(ScalarKind::Bytes));
        assert_eq!(ScalarKind::from_keyword("PhoneType"), None);
        assert_eq!(ScalarKind::SFixed64.keyword(), "sfixed64");
    }

    #[test]
    fn test_field_number_range() {
        assert!(FieldSpec::new(Label::Optional, "int32", "a", 1).is_ok());
        assert!(FieldSpec::new(Label::Optional, "int32", "a", MAX_FIELD_NUMBER).is_ok());
        assert!(FieldSpec::new(Label::Optional, "int32", "a", 0).is_err());
        assert!(FieldSpec::new(Label::Optional, "int32", "a", MAX_FIELD_NUMBER + 1).is_err());
        assert!(FieldSpec::new(Label::Optional, "int32", "a", 19_500).is_err());
    }
}
