// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enum type builder.

use super::field::EnumValueSpec;
use crate::error::{Result, SchemaError};

/// Frozen enum type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumTypeSpec {
    pub name: String,
    pub values: Vec<EnumValueSpec>,
}

impl EnumTypeSpec {
    pub fn builder(name: impl Into<String>) -> EnumTypeBuilder {
        EnumTypeBuilder::new(name)
    }
}

/// Builder for an enum type; value names and numbers must be unique.
#[derive(Debug)]
pub struct EnumTypeBuilder {
    spec: EnumTypeSpec,
}

impl EnumTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            spec: EnumTypeSpec {
                name: name.into(),
                values: Vec::new(),
            },
        }
    }

    /// Append a value.
    pub fn add_value(mut self, name: &str, number: i32) -> Result<Self> {
        if name.is_empty() {
            return Err(SchemaError::Validation(format!(
                "enum {} has a value with an empty name",
                self.spec.name
            )));
        }
        if self.spec.values.iter().any(|v| v.name == name) {
            return Err(SchemaError::Validation(format!(
                "enum value '{}' already declared in enum {}",
                name, self.spec.name
            )));
        }
        if let Some(existing) = self.spec.values.iter().find(|v| v.number == number) {
            return Err(SchemaError::Validation(format!(
                "enum number {} of '{}' already used by '{}' in enum {}",
                number, name, existing.name, self.spec.name
            )));
        }
        self.spec.values.push(EnumValueSpec::new(name, number));
        Ok(self)
    }

    pub fn build(self) -> EnumTypeSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_builder() {
        let spec = EnumTypeBuilder::new("PhoneType")
            .add_value("MOBILE", 0)
            .and_then(|b| b.add_value("HOME", 1))
            .and_then(|b| b.add_value("WORK", 2))
            .expect("valid enum")
            .build();

        assert_eq!(spec.values.len(), 3);
        assert_eq!(spec.values[2], EnumValueSpec::new("WORK", 2));
    }

    #[test]
    fn test_empty_value_name() {
        let result = EnumTypeBuilder::new("PhoneType").add_value("", 0);
        assert!(matches!(result, Err(SchemaError::Validation(_))));
    }

    #[test]
    fn test_duplicate_value_name() {
        let result = EnumTypeBuilder::new("PhoneType")
            .add_value("MOBILE", 0)
            .and_then(|b| b.add_value("MOBILE", 1));
        assert!(matches!(result, Err(SchemaError::Validation(_))));
    }

    #[test]
    fn test_duplicate_value_number() {
        let result = EnumTypeBuilder::new("PhoneType")
            .add_value("MOBILE", 0)
            .and_then(|b| b.add_value("HOME", 0));
        assert!(matches!(result, Err(SchemaError::Validation(_))));
    }
}
