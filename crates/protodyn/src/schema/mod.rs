// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolved schemas.
//!
//! [`SchemaBuilder`] turns unresolved definitions into a [`ResolvedSchema`],
//! an immutable pool of message and enum types. The pool can be serialized
//! as a protobuf `FileDescriptorSet`, parsed back, merged into other schemas
//! and used to create [`DynamicMessageBuilder`](crate::DynamicMessageBuilder)s.

mod builder;
mod codec;
mod defaults;
mod descriptor;
mod pool;
mod render;
mod resolver;

pub use builder::SchemaBuilder;
pub use descriptor::{EnumDescriptor, EnumValue, FieldDescriptor, Kind, MessageDescriptor};
pub use pool::ResolvedSchema;
