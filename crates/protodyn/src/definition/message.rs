// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message type builder.

use super::enumeration::EnumTypeSpec;
use super::field::{FieldSpec, Label};
use crate::error::{Result, SchemaError};

/// Frozen, unresolved message type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTypeSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,
    pub nested_messages: Vec<MessageTypeSpec>,
    pub nested_enums: Vec<EnumTypeSpec>,
}

impl MessageTypeSpec {
    /// Start building a message type.
    pub fn builder(name: impl Into<String>) -> MessageTypeBuilder {
        MessageTypeBuilder::new(name)
    }
}

/// Builder accumulating the fields and nested types of one message.
///
/// ```rust
/// use protodyn::MessageTypeBuilder;
///
/// # fn main() -> protodyn::Result<()> {
/// let person = MessageTypeBuilder::new("Person")
///     .add_field("required", "int32", "id", 1)?
///     .add_field("required", "string", "name", 2)?
///     .add_field("optional", "string", "email", 3)?
///     .build();
/// assert_eq!(person.fields.len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MessageTypeBuilder {
    spec: MessageTypeSpec,
}

impl MessageTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            spec: MessageTypeSpec {
                name: name.into(),
                fields: Vec::new(),
                nested_messages: Vec::new(),
                nested_enums: Vec::new(),
            },
        }
    }

    /// Add a field (`label` is `required`, `optional` or `repeated`).
    pub fn add_field(
        self,
        label: &str,
        type_name: &str,
        name: &str,
        number: u32,
    ) -> Result<Self> {
        let label: Label = label.parse()?;
        self.add_field_spec(FieldSpec::new(label, type_name, name, number)?)
    }

    /// Add a field with a declared default.
    pub fn add_field_with_default(
        self,
        label: &str,
        type_name: &str,
        name: &str,
        number: u32,
        default: &str,
    ) -> Result<Self> {
        let label: Label = label.parse()?;
        let spec = FieldSpec::new(label, type_name, name, number)?.with_default(default);
        self.add_field_spec(spec)
    }

    /// Add a prepared field declaration.
    pub fn add_field_spec(mut self, field: FieldSpec) -> Result<Self> {
        if let Some(existing) = self.spec.fields.iter().find(|f| f.number == field.number) {
            return Err(SchemaError::Validation(format!(
                "field number {} of '{}' already used by '{}' in message {}",
                field.number, field.name, existing.name, self.spec.name
            )));
        }
        if self.spec.fields.iter().any(|f| f.name == field.name) {
            return Err(SchemaError::Validation(format!(
                "field name '{}' already used in message {}",
                field.name, self.spec.name
            )));
        }
        self.spec.fields.push(field);
        Ok(self)
    }

    /// Nest a message type inside this one.
    pub fn add_message_definition(mut self, message: MessageTypeSpec) -> Result<Self> {
        self.check_nested_name(&message.name)?;
        self.spec.nested_messages.push(message);
        Ok(self)
    }

    /// Nest an enum type inside this one.
    pub fn add_enum_definition(mut self, enumeration: EnumTypeSpec) -> Result<Self> {
        self.check_nested_name(&enumeration.name)?;
        self.spec.nested_enums.push(enumeration);
        Ok(self)
    }

    /// Freeze the declaration. No name resolution happens here.
    pub fn build(self) -> MessageTypeSpec {
        self.spec
    }

    fn check_nested_name(&self, name: &str) -> Result<()> {
        let taken = self.spec.nested_messages.iter().any(|m| m.name == name)
            || self.spec.nested_enums.iter().any(|e| e.name == name);
        if taken {
            return Err(SchemaError::Validation(format!(
                "nested type '{}' already declared in message {}",
                name, self.spec.name
            )));
        }
        Ok(())
    }
}
