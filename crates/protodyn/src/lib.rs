// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # protodyn - runtime protobuf schemas
//!
//! Define protobuf message and enum types while the program runs, resolve
//! them into an immutable descriptor pool, persist that pool as a standard
//! `FileDescriptorSet`, and build, read and encode message values without
//! generated code.
//!
//! ## Quick Start
//!
//! ```rust
//! use protodyn::{EnumTypeBuilder, MessageTypeBuilder, Result, SchemaBuilder};
//!
//! fn main() -> Result<()> {
//!     let phone_type = EnumTypeBuilder::new("PhoneType")
//!         .add_value("MOBILE", 0)?
//!         .add_value("HOME", 1)?
//!         .add_value("WORK", 2)?
//!         .build();
//!     let phone_number = MessageTypeBuilder::new("PhoneNumber")
//!         .add_field("required", "string", "number", 1)?
//!         .add_field_with_default("optional", "PhoneType", "type", 2, "HOME")?
//!         .build();
//!     let person = MessageTypeBuilder::new("Person")
//!         .add_enum_definition(phone_type)?
//!         .add_message_definition(phone_number)?
//!         .add_field("required", "int32", "id", 1)?
//!         .add_field("required", "string", "name", 2)?
//!         .add_field("repeated", "PhoneNumber", "phone", 4)?
//!         .build();
//!
//!     let mut builder = SchemaBuilder::new();
//!     builder.set_name("person.proto").set_package("tutorial").add_message_definition(person);
//!     let schema = builder.build()?;
//!
//!     let mut phone = schema.new_message_builder("Person.PhoneNumber")?;
//!     phone.set_field("number", "555-1212")?;
//!
//!     let mut person = schema.new_message_builder("Person")?;
//!     person
//!         .set_field("id", 1)?
//!         .set_field("name", "Alice")?
//!         .add_repeated_field("phone", phone.build()?)?;
//!     let person = person.build()?;
//!
//!     let restored = protodyn::ResolvedSchema::parse_from(&schema.to_bytes())?;
//!     assert_eq!(restored, schema);
//!     assert!(!person.encode_to_vec().is_empty());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  MessageTypeBuilder / EnumTypeBuilder   (unresolved definitions)    |
//! +---------------------------------------------------------------------+
//! |  SchemaBuilder -> two-pass resolver -> ResolvedSchema (Arc'd pool)  |
//! |                      to_bytes / parse_from (FileDescriptorSet)      |
//! +---------------------------------------------------------------------+
//! |  DynamicMessageBuilder -> DynamicMessage -> prost::encoding wire    |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`definition`] - builders for unresolved message and enum types
//! - [`schema`] - resolution, lookup, persistence and rendering
//! - [`dynamic`] - runtime message values
//! - [`loaders`] - YAML schema definitions (feature `loaders`)

pub mod definition;
pub mod dynamic;
pub mod error;
pub mod loaders;
pub mod schema;

pub use definition::{
    EnumTypeBuilder, EnumTypeSpec, EnumValueSpec, FieldSpec, Label, MessageTypeBuilder,
    MessageTypeSpec, ScalarKind,
};
pub use dynamic::{DynamicMessage, DynamicMessageBuilder, FieldRef, Value};
pub use error::{Result, SchemaError};
pub use schema::{
    EnumDescriptor, EnumValue, FieldDescriptor, Kind, MessageDescriptor, ResolvedSchema,
    SchemaBuilder,
};

/// Re-export of the descriptor record types used by the persistence API.
pub use prost_types::FileDescriptorSet;
