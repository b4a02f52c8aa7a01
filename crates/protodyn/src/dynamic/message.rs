// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic message values and their builder.

use super::{FieldRef, Value};
use crate::error::{Result, SchemaError};
use crate::schema::{FieldDescriptor, Kind, MessageDescriptor};
use std::collections::BTreeMap;

/// Immutable message value bound to one message type.
///
/// Only present fields are stored, keyed by field number; reads of absent
/// fields report the field's default. Repeated fields are stored as a
/// non-empty [`Value::List`].
#[derive(Clone)]
pub struct DynamicMessage {
    descriptor: MessageDescriptor,
    fields: BTreeMap<u32, Value>,
}

impl DynamicMessage {
    pub(crate) fn new(descriptor: MessageDescriptor) -> Self {
        Self {
            descriptor,
            fields: BTreeMap::new(),
        }
    }

    /// Message type of this value.
    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    /// Field value, or the field's default when unset.
    ///
    /// Repeated fields always yield a [`Value::List`], possibly empty.
    pub fn get_field(&self, field: impl FieldRef) -> Result<Value> {
        let field = field.resolve(&self.descriptor)?;
        Ok(self
            .fields
            .get(&field.number())
            .cloned()
            .unwrap_or_else(|| field.default_value()))
    }

    /// One element of a repeated field.
    pub fn get_repeated_field(&self, field: impl FieldRef, index: usize) -> Result<Value> {
        let field = repeated(field.resolve(&self.descriptor)?)?;
        let items = self.list(&field);
        items.get(index).cloned().ok_or_else(|| SchemaError::Index {
            field: field.full_name(),
            index,
            length: items.len(),
        })
    }

    /// Whether a singular field is set, or a repeated field is non-empty.
    pub fn has_field(&self, field: impl FieldRef) -> Result<bool> {
        let field = field.resolve(&self.descriptor)?;
        Ok(self.fields.contains_key(&field.number()))
    }

    pub fn repeated_field_count(&self, field: impl FieldRef) -> Result<usize> {
        let field = repeated(field.resolve(&self.descriptor)?)?;
        Ok(self.list(&field).len())
    }

    /// Present fields in field-number order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldDescriptor, &Value)> + '_ {
        self.fields.iter().filter_map(move |(&number, value)| {
            self.descriptor.get_field(number).map(|field| (field, value))
        })
    }

    /// Whether every required field is set, recursively.
    pub fn is_initialized(&self) -> bool {
        let mut missing = Vec::new();
        self.collect_missing("", &mut missing);
        missing.is_empty()
    }

    /// Mutable copy of this value.
    pub fn to_builder(&self) -> DynamicMessageBuilder {
        DynamicMessageBuilder {
            message: self.clone(),
        }
    }

    fn list(&self, field: &FieldDescriptor) -> &[Value] {
        match self.fields.get(&field.number()) {
            Some(Value::List(items)) => items,
            _ => &[],
        }
    }

    /// Paths of unset required fields, nested ones as `outer.inner`.
    fn collect_missing(&self, prefix: &str, missing: &mut Vec<String>) {
        for field in self.descriptor.fields() {
            let path = format!("{}{}", prefix, field.name());
            match self.fields.get(&field.number()) {
                None if field.is_required() => missing.push(path),
                Some(Value::Message(nested)) => {
                    nested.collect_missing(&format!("{}.", path), missing)
                }
                Some(Value::List(items)) => {
                    for (index, item) in items.iter().enumerate() {
                        if let Value::Message(nested) = item {
                            nested.collect_missing(&format!("{}[{}].", path, index), missing);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    pub(crate) fn insert_raw(&mut self, number: u32, value: Value) {
        self.fields.insert(number, value);
    }

    pub(crate) fn push_raw(&mut self, number: u32, value: Value) {
        match self.fields.get_mut(&number) {
            Some(Value::List(items)) => items.push(value),
            _ => {
                self.fields.insert(number, Value::List(vec![value]));
            }
        }
    }
}

/// Messages are equal when they share a type name and hold equal present fields.
impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.full_name() == other.descriptor.full_name() && self.fields == other.fields
    }
}

impl std::fmt::Debug for DynamicMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicMessage")
            .field("type", &self.descriptor.full_name())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Mutable builder for a [`DynamicMessage`].
///
/// ```rust
/// use protodyn::{MessageTypeBuilder, SchemaBuilder};
///
/// # fn main() -> protodyn::Result<()> {
/// let point = MessageTypeBuilder::new("Point")
///     .add_field("required", "int32", "x", 1)?
///     .add_field("required", "int32", "y", 2)?
///     .add_field("repeated", "string", "tags", 3)?
///     .build();
/// let mut schema = SchemaBuilder::new();
/// schema.set_name("point.proto").add_message_definition(point);
/// let schema = schema.build()?;
///
/// let mut builder = schema.new_message_builder("Point")?;
/// builder
///     .set_field("x", 3)?
///     .set_field("y", -4)?
///     .add_repeated_field("tags", "origin")?;
/// let point = builder.build()?;
///
/// assert_eq!(point.get_field("y")?.as_i32(), Some(-4));
/// assert_eq!(point.repeated_field_count("tags")?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DynamicMessageBuilder {
    message: DynamicMessage,
}

impl DynamicMessageBuilder {
    pub fn new(descriptor: MessageDescriptor) -> Self {
        Self {
            message: DynamicMessage::new(descriptor),
        }
    }

    pub fn descriptor(&self) -> &MessageDescriptor {
        self.message.descriptor()
    }

    /// Set a singular field, replacing any previous value.
    pub fn set_field(
        &mut self,
        field: impl FieldRef,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let field = field.resolve(self.message.descriptor())?;
        if field.is_repeated() {
            return Err(SchemaError::InvalidOperation(format!(
                "set_field on repeated field {}; use add_repeated_field",
                field.full_name()
            )));
        }
        let value = value.into();
        check_value(&field, &value)?;
        self.message.insert_raw(field.number(), value);
        Ok(self)
    }

    /// Append an element to a repeated field.
    pub fn add_repeated_field(
        &mut self,
        field: impl FieldRef,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let field = repeated(field.resolve(self.message.descriptor())?)?;
        let value = value.into();
        check_value(&field, &value)?;
        self.message.push_raw(field.number(), value);
        Ok(self)
    }

    /// Replace one element of a repeated field.
    pub fn set_repeated_field(
        &mut self,
        field: impl FieldRef,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let field = repeated(field.resolve(self.message.descriptor())?)?;
        let value = value.into();
        check_value(&field, &value)?;
        match self.message.fields.get_mut(&field.number()) {
            Some(Value::List(items)) if index < items.len() => {
                items[index] = value;
                Ok(self)
            }
            existing => Err(SchemaError::Index {
                field: field.full_name(),
                index,
                length: existing.and_then(|v| v.as_list()).map_or(0, <[Value]>::len),
            }),
        }
    }

    /// Unset a field; repeated fields become empty.
    pub fn clear_field(&mut self, field: impl FieldRef) -> Result<&mut Self> {
        let field = field.resolve(self.message.descriptor())?;
        self.message.fields.remove(&field.number());
        Ok(self)
    }

    pub fn get_field(&self, field: impl FieldRef) -> Result<Value> {
        self.message.get_field(field)
    }

    pub fn get_repeated_field(&self, field: impl FieldRef, index: usize) -> Result<Value> {
        self.message.get_repeated_field(field, index)
    }

    pub fn has_field(&self, field: impl FieldRef) -> Result<bool> {
        self.message.has_field(field)
    }

    pub fn repeated_field_count(&self, field: impl FieldRef) -> Result<usize> {
        self.message.repeated_field_count(field)
    }

    /// Snapshot the builder, failing when a required field is unset.
    pub fn build(&self) -> Result<DynamicMessage> {
        let mut missing = Vec::new();
        self.message.collect_missing("", &mut missing);
        if !missing.is_empty() {
            return Err(SchemaError::UninitializedMessage {
                message: self.message.descriptor().full_name().to_string(),
                missing,
            });
        }
        Ok(self.message.clone())
    }

    /// Snapshot the builder without the required-field check.
    pub fn build_partial(&self) -> DynamicMessage {
        self.message.clone()
    }
}

fn repeated(field: FieldDescriptor) -> Result<FieldDescriptor> {
    if field.is_repeated() {
        Ok(field)
    } else {
        Err(SchemaError::InvalidOperation(format!(
            "field {} is not repeated",
            field.full_name()
        )))
    }
}

/// Reject values whose variant does not fit the field's resolved kind.
fn check_value(field: &FieldDescriptor, value: &Value) -> Result<()> {
    let kind = field.kind();
    let fits = match (&kind, value) {
        (Kind::Scalar(scalar), _) => value.fits_scalar(*scalar),
        (Kind::Message(expected), Value::Message(message)) => message.descriptor() == expected,
        (Kind::Enum(expected), Value::Enum(enum_value)) => enum_value.enum_type() == expected,
        _ => false,
    };
    if fits {
        Ok(())
    } else {
        Err(SchemaError::TypeMismatch {
            field: field.full_name(),
            expected: kind.to_string(),
            got: value.kind_name(),
        })
    }
}
