// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolved descriptor pool.
//!
//! The pool is a flat arena: messages and enums live in two vectors and refer
//! to each other by index only. Handles ([`MessageDescriptor`],
//! [`EnumDescriptor`], ...) pair an `Arc` of the arena with an index, so they
//! are cheap to clone and keep the pool alive for as long as any value built
//! against it exists.

use super::descriptor::{EnumDescriptor, EnumValue, MessageDescriptor};
use super::SchemaBuilder;
use crate::definition::{EnumValueSpec, Label, ScalarKind};
use crate::dynamic::{DynamicMessageBuilder, Value};
use crate::error::{Result, SchemaError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Arena slot of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TypeIndex {
    Message(usize),
    Enum(usize),
}

/// Resolved storage kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKindIndex {
    Scalar(ScalarKind),
    Message(usize),
    Enum(usize),
}

/// Default computed during resolution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DefaultValue {
    /// Scalar default (never a message, enum or list value).
    Scalar(Value),
    /// Index into the referenced enum's values.
    Enum(usize),
    /// Empty instance of the referenced message type.
    Message,
    /// Repeated fields default to an empty list.
    Repeated,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FileEntry {
    pub(crate) name: String,
    pub(crate) package: String,
    pub(crate) dependencies: Vec<String>,
    /// Top-level messages, declaration order.
    pub(crate) messages: Vec<usize>,
    /// Top-level enums, declaration order.
    pub(crate) enums: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MessageEntry {
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) file: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) fields: Vec<FieldEntry>,
    pub(crate) nested_messages: Vec<usize>,
    pub(crate) nested_enums: Vec<usize>,
}

impl MessageEntry {
    pub(crate) fn field_index_by_number(&self, number: u32) -> Option<usize> {
        self.fields.iter().position(|f| f.number == number)
    }

    pub(crate) fn field_index_by_name(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldEntry {
    pub(crate) name: String,
    pub(crate) number: u32,
    pub(crate) label: Label,
    pub(crate) kind: FieldKindIndex,
    /// Declared default text, kept verbatim for serialization.
    pub(crate) default_literal: Option<String>,
    pub(crate) default: DefaultValue,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EnumEntry {
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) file: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) values: Vec<EnumValueSpec>,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct PoolInner {
    /// Descriptor records; imported records first, the schema's own record last.
    pub(crate) files: Vec<FileEntry>,
    pub(crate) messages: Vec<MessageEntry>,
    pub(crate) enums: Vec<EnumEntry>,
    /// Fully qualified name (no leading dot) to arena slot.
    pub(crate) names: HashMap<String, TypeIndex>,
}

impl PoolInner {
    pub(crate) fn full_name_of(&self, index: TypeIndex) -> &str {
        match index {
            TypeIndex::Message(i) => &self.messages[i].full_name,
            TypeIndex::Enum(i) => &self.enums[i].full_name,
        }
    }
}

/// Immutable pool of resolved message and enum types.
///
/// Produced by [`SchemaBuilder::build`] or [`ResolvedSchema::parse_from`].
/// Cloning shares the underlying pool.
#[derive(Clone)]
pub struct ResolvedSchema {
    pub(crate) inner: Arc<PoolInner>,
}

impl ResolvedSchema {
    pub(crate) fn from_inner(inner: PoolInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Start a new schema definition.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    fn primary(&self) -> &FileEntry {
        // Resolution always produces at least the schema's own record.
        &self.inner.files[self.inner.files.len() - 1]
    }

    /// External name of the schema (the primary descriptor record).
    pub fn name(&self) -> &str {
        &self.primary().name
    }

    /// Namespace prefix of the schema's own types.
    pub fn package(&self) -> &str {
        &self.primary().package
    }

    /// Names of the records merged into this schema.
    pub fn dependencies(&self) -> &[String] {
        &self.primary().dependencies
    }

    /// Names of all descriptor records, imported ones first.
    pub fn file_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.files.iter().map(|f| f.name.as_str())
    }

    /// Qualified names of all message types, in declaration order.
    pub fn message_type_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.messages.iter().map(|m| m.full_name.as_str())
    }

    /// Qualified names of all enum types, in declaration order.
    pub fn enum_type_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.enums.iter().map(|e| e.full_name.as_str())
    }

    pub fn messages(&self) -> impl ExactSizeIterator<Item = MessageDescriptor> + '_ {
        (0..self.inner.messages.len()).map(move |index| MessageDescriptor::new(self.clone(), index))
    }

    pub fn enums(&self) -> impl ExactSizeIterator<Item = EnumDescriptor> + '_ {
        (0..self.inner.enums.len()).map(move |index| EnumDescriptor::new(self.clone(), index))
    }

    /// Look up a message type by qualified or short name.
    ///
    /// Accepts a fully qualified name (with or without a leading `.`), a name
    /// relative to the schema's package, or an unambiguous short name.
    pub fn get_message_descriptor(&self, name: &str) -> Result<MessageDescriptor> {
        match self.lookup(name, |index| matches!(index, TypeIndex::Message(_)))? {
            TypeIndex::Message(index) => Ok(MessageDescriptor::new(self.clone(), index)),
            TypeIndex::Enum(_) => Err(SchemaError::NotFound(format!("message type {}", name))),
        }
    }

    /// Look up an enum type by qualified or short name.
    pub fn get_enum_descriptor(&self, name: &str) -> Result<EnumDescriptor> {
        match self.lookup(name, |index| matches!(index, TypeIndex::Enum(_)))? {
            TypeIndex::Enum(index) => Ok(EnumDescriptor::new(self.clone(), index)),
            TypeIndex::Message(_) => Err(SchemaError::NotFound(format!("enum type {}", name))),
        }
    }

    /// Look up one value of an enum type.
    pub fn get_enum_value(&self, enum_name: &str, value_name: &str) -> Result<EnumValue> {
        let enum_type = self.get_enum_descriptor(enum_name)?;
        enum_type.get_value(value_name).ok_or_else(|| {
            SchemaError::NotFound(format!(
                "enum value {} in {}",
                value_name,
                enum_type.full_name()
            ))
        })
    }

    /// Create a value builder for the named message type.
    pub fn new_message_builder(&self, name: &str) -> Result<DynamicMessageBuilder> {
        Ok(DynamicMessageBuilder::new(self.get_message_descriptor(name)?))
    }

    fn lookup(&self, name: &str, wanted: impl Fn(TypeIndex) -> bool) -> Result<TypeIndex> {
        let name = name.strip_prefix('.').unwrap_or(name);
        let names = &self.inner.names;

        if let Some(&index) = names.get(name).filter(|&&i| wanted(i)) {
            return Ok(index);
        }

        let package = self.package();
        if !package.is_empty() {
            let qualified = format!("{}.{}", package, name);
            if let Some(&index) = names.get(&qualified).filter(|&&i| wanted(i)) {
                return Ok(index);
            }
        }

        let short_matches: Vec<TypeIndex> = self
            .inner
            .messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.name == name)
            .map(|(i, _)| TypeIndex::Message(i))
            .chain(
                self.inner
                    .enums
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.name == name)
                    .map(|(i, _)| TypeIndex::Enum(i)),
            )
            .filter(|&i| wanted(i))
            .collect();

        match short_matches.as_slice() {
            [index] => Ok(*index),
            [] => Err(SchemaError::NotFound(format!("type {}", name))),
            many => Err(SchemaError::NotFound(format!(
                "type {} is ambiguous: {}",
                name,
                many.iter()
                    .map(|&i| self.inner.full_name_of(i))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

impl PartialEq for ResolvedSchema {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl fmt::Debug for ResolvedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSchema")
            .field("name", &self.name())
            .field("package", &self.package())
            .field("messages", &self.message_type_names().collect::<Vec<_>>())
            .field("enums", &self.enum_type_names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{EnumTypeBuilder, MessageTypeBuilder};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_handles_are_send_and_sync() {
        assert_send_sync::<ResolvedSchema>();
        assert_send_sync::<MessageDescriptor>();
        assert_send_sync::<crate::schema::FieldDescriptor>();
        assert_send_sync::<EnumDescriptor>();
        assert_send_sync::<EnumValue>();
        assert_send_sync::<crate::dynamic::DynamicMessage>();
        assert_send_sync::<DynamicMessageBuilder>();
        assert_send_sync::<Value>();
    }

    fn two_level_schema() -> ResolvedSchema {
        let kind = EnumTypeBuilder::new("Kind")
            .add_value("A", 0)
            .expect("add A")
            .build();
        let inner = MessageTypeBuilder::new("Inner")
            .add_field("optional", "Kind", "kind", 1)
            .expect("add kind")
            .build();
        let outer = MessageTypeBuilder::new("Outer")
            .add_enum_definition(kind)
            .and_then(|b| b.add_message_definition(inner))
            .and_then(|b| b.add_field("optional", "Inner", "inner", 1))
            .expect("valid outer")
            .build();

        let mut builder = SchemaBuilder::new();
        builder
            .set_name("outer.proto")
            .set_package("acme.test")
            .add_message_definition(outer);
        builder.build().expect("schema builds")
    }

    #[test]
    fn test_lookup_forms() {
        let schema = two_level_schema();

        let full = schema
            .get_message_descriptor("acme.test.Outer.Inner")
            .expect("qualified");
        let dotted = schema
            .get_message_descriptor(".acme.test.Outer.Inner")
            .expect("absolute");
        let relative = schema
            .get_message_descriptor("Outer.Inner")
            .expect("package relative");
        let short = schema.get_message_descriptor("Inner").expect("short");

        assert_eq!(full, dotted);
        assert_eq!(full, relative);
        assert_eq!(full, short);
        assert_eq!(full.full_name(), "acme.test.Outer.Inner");
    }

    #[test]
    fn test_lookup_kind_mismatch() {
        let schema = two_level_schema();
        assert!(matches!(
            schema.get_message_descriptor("acme.test.Outer.Kind"),
            Err(SchemaError::NotFound(_))
        ));
        assert!(schema.get_enum_descriptor("acme.test.Outer.Kind").is_ok());
        assert!(matches!(
            schema.get_enum_descriptor("Missing"),
            Err(SchemaError::NotFound(_))
        ));
    }

    #[test]
    fn test_enum_value_lookup() {
        let schema = two_level_schema();
        let value = schema.get_enum_value("Outer.Kind", "A").expect("value A");
        assert_eq!(value.number(), 0);
        assert!(matches!(
            schema.get_enum_value("Outer.Kind", "B"),
            Err(SchemaError::NotFound(_))
        ));
    }

    #[test]
    fn test_names_in_declaration_order() {
        let schema = two_level_schema();
        let messages: Vec<_> = schema.message_type_names().collect();
        assert_eq!(messages, ["acme.test.Outer", "acme.test.Outer.Inner"]);
        let enums: Vec<_> = schema.enum_type_names().collect();
        assert_eq!(enums, ["acme.test.Outer.Kind"]);
        assert_eq!(schema.name(), "outer.proto");
        assert_eq!(schema.package(), "acme.test");
    }
}
