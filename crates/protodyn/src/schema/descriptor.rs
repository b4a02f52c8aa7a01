// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handles onto types inside a [`ResolvedSchema`].

use super::pool::{DefaultValue, EnumEntry, FieldEntry, FieldKindIndex, MessageEntry};
use super::ResolvedSchema;
use crate::definition::{Label, ScalarKind};
use crate::dynamic::{DynamicMessage, Value};
use std::fmt;
use std::sync::Arc;

/// Resolved message type.
#[derive(Clone)]
pub struct MessageDescriptor {
    schema: ResolvedSchema,
    index: usize,
}

impl MessageDescriptor {
    pub(crate) fn new(schema: ResolvedSchema, index: usize) -> Self {
        Self { schema, index }
    }

    fn entry(&self) -> &MessageEntry {
        &self.schema.inner.messages[self.index]
    }

    /// Schema this type belongs to.
    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    /// Short name.
    pub fn name(&self) -> &str {
        &self.entry().name
    }

    /// Fully qualified dotted name, without a leading dot.
    pub fn full_name(&self) -> &str {
        &self.entry().full_name
    }

    /// Name of the descriptor record declaring this type.
    pub fn file_name(&self) -> &str {
        &self.schema.inner.files[self.entry().file].name
    }

    /// Enclosing message, for nested types.
    pub fn parent_message(&self) -> Option<MessageDescriptor> {
        self.entry()
            .parent
            .map(|index| MessageDescriptor::new(self.schema.clone(), index))
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        (0..self.entry().fields.len()).map(move |index| FieldDescriptor {
            message: self.clone(),
            index,
        })
    }

    /// Field by number.
    pub fn get_field(&self, number: u32) -> Option<FieldDescriptor> {
        self.entry()
            .field_index_by_number(number)
            .map(|index| FieldDescriptor {
                message: self.clone(),
                index,
            })
    }

    /// Field by name.
    pub fn get_field_by_name(&self, name: &str) -> Option<FieldDescriptor> {
        self.entry()
            .field_index_by_name(name)
            .map(|index| FieldDescriptor {
                message: self.clone(),
                index,
            })
    }

    pub fn nested_messages(&self) -> impl ExactSizeIterator<Item = MessageDescriptor> + '_ {
        self.entry()
            .nested_messages
            .iter()
            .map(move |&index| MessageDescriptor::new(self.schema.clone(), index))
    }

    pub fn nested_enums(&self) -> impl ExactSizeIterator<Item = EnumDescriptor> + '_ {
        self.entry()
            .nested_enums
            .iter()
            .map(move |&index| EnumDescriptor::new(self.schema.clone(), index))
    }

    /// Empty, immutable instance of this type.
    pub fn default_instance(&self) -> DynamicMessage {
        DynamicMessage::new(self.clone())
    }
}

impl PartialEq for MessageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema.inner, &other.schema.inner) && self.index == other.index
    }
}

impl Eq for MessageDescriptor {}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

/// Resolved type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Scalar(ScalarKind),
    Message(MessageDescriptor),
    Enum(EnumDescriptor),
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{}", kind),
            Self::Message(message) => write!(f, "message {}", message.full_name()),
            Self::Enum(enum_type) => write!(f, "enum {}", enum_type.full_name()),
        }
    }
}

/// Resolved field of a message type.
#[derive(Clone, PartialEq)]
pub struct FieldDescriptor {
    message: MessageDescriptor,
    index: usize,
}

impl FieldDescriptor {
    fn entry(&self) -> &FieldEntry {
        &self.message.entry().fields[self.index]
    }

    /// Message declaring this field.
    pub fn containing_message(&self) -> &MessageDescriptor {
        &self.message
    }

    pub fn name(&self) -> &str {
        &self.entry().name
    }

    /// `Message.field` with the message's qualified name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.message.full_name(), self.name())
    }

    pub fn number(&self) -> u32 {
        self.entry().number
    }

    pub fn label(&self) -> Label {
        self.entry().label
    }

    pub fn is_repeated(&self) -> bool {
        self.label().is_repeated()
    }

    pub fn is_required(&self) -> bool {
        self.label() == Label::Required
    }

    pub fn kind(&self) -> Kind {
        let schema = self.message.schema();
        match self.entry().kind {
            FieldKindIndex::Scalar(kind) => Kind::Scalar(kind),
            FieldKindIndex::Message(index) => {
                Kind::Message(MessageDescriptor::new(schema.clone(), index))
            }
            FieldKindIndex::Enum(index) => Kind::Enum(EnumDescriptor::new(schema.clone(), index)),
        }
    }

    /// Declared default text, if one was given.
    pub fn declared_default(&self) -> Option<&str> {
        self.entry().default_literal.as_deref()
    }

    /// Value reported for this field when it is not set.
    ///
    /// Repeated fields report an empty list.
    pub fn default_value(&self) -> Value {
        match (&self.entry().default, self.kind()) {
            (DefaultValue::Scalar(value), _) => value.clone(),
            (DefaultValue::Enum(value_index), Kind::Enum(enum_type)) => {
                Value::Enum(EnumValue::new(enum_type, *value_index))
            }
            (DefaultValue::Message, Kind::Message(message)) => {
                Value::Message(message.default_instance())
            }
            _ => Value::List(Vec::new()),
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.full_name())
            .field("number", &self.number())
            .field("label", &self.label())
            .finish()
    }
}

/// Resolved enum type.
#[derive(Clone)]
pub struct EnumDescriptor {
    schema: ResolvedSchema,
    index: usize,
}

impl EnumDescriptor {
    pub(crate) fn new(schema: ResolvedSchema, index: usize) -> Self {
        Self { schema, index }
    }

    fn entry(&self) -> &EnumEntry {
        &self.schema.inner.enums[self.index]
    }

    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.entry().name
    }

    pub fn full_name(&self) -> &str {
        &self.entry().full_name
    }

    /// Enclosing message, for nested enums.
    pub fn parent_message(&self) -> Option<MessageDescriptor> {
        self.entry()
            .parent
            .map(|index| MessageDescriptor::new(self.schema.clone(), index))
    }

    /// Values in declaration order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = EnumValue> + '_ {
        (0..self.entry().values.len()).map(move |index| EnumValue::new(self.clone(), index))
    }

    pub fn get_value(&self, name: &str) -> Option<EnumValue> {
        self.entry()
            .values
            .iter()
            .position(|v| v.name == name)
            .map(|index| EnumValue::new(self.clone(), index))
    }

    pub fn get_value_by_number(&self, number: i32) -> Option<EnumValue> {
        self.entry()
            .values
            .iter()
            .position(|v| v.number == number)
            .map(|index| EnumValue::new(self.clone(), index))
    }

    /// First declared value, the implicit default of enum fields.
    pub fn default_value(&self) -> EnumValue {
        EnumValue::new(self.clone(), 0)
    }
}

impl PartialEq for EnumDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema.inner, &other.schema.inner) && self.index == other.index
    }
}

impl Eq for EnumDescriptor {}

impl fmt::Debug for EnumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

/// Handle onto one value of a resolved enum.
#[derive(Clone)]
pub struct EnumValue {
    enum_type: EnumDescriptor,
    index: usize,
}

impl EnumValue {
    pub(crate) fn new(enum_type: EnumDescriptor, index: usize) -> Self {
        Self { enum_type, index }
    }

    pub fn enum_type(&self) -> &EnumDescriptor {
        &self.enum_type
    }

    pub fn name(&self) -> &str {
        &self.enum_type.entry().values[self.index].name
    }

    pub fn number(&self) -> i32 {
        self.enum_type.entry().values[self.index].number
    }
}

/// Enum values compare by enum type name and number.
impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.number() == other.number() && self.enum_type.full_name() == other.enum_type.full_name()
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EnumValue({}.{} = {})",
            self.enum_type.full_name(),
            self.name(),
            self.number()
        )
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
