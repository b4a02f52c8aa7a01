// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unresolved type definitions.
//!
//! Builders here only check what can be checked locally (labels, field number
//! ranges, uniqueness within one type). Type names stay raw strings until
//! [`SchemaBuilder::build`](crate::SchemaBuilder::build) resolves them.

mod enumeration;
mod field;
mod message;

pub use enumeration::{EnumTypeBuilder, EnumTypeSpec};
pub use field::{
    EnumValueSpec, FieldSpec, Label, ScalarKind, MAX_FIELD_NUMBER, RESERVED_FIELD_NUMBERS,
};
pub use message::{MessageTypeBuilder, MessageTypeSpec};
