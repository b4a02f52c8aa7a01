// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the builders, the resolver, the descriptor codec and
//! the dynamic message runtime.

use thiserror::Error;

/// Errors returned by protodyn operations.
///
/// Every variant is recoverable and reported by the call that detected it.
/// A failed [`SchemaBuilder::build`](crate::SchemaBuilder::build) never
/// publishes a partial schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    // ========================================================================
    // Definition errors
    // ========================================================================
    /// Malformed builder input (bad label, duplicate field or enum value, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Two own types produced the same fully qualified name.
    #[error("Duplicate type: {name}")]
    DuplicateType {
        /// Fully qualified name that was declared twice.
        name: String,
    },

    /// A type collides with a type imported through `add_schema`.
    #[error("Type {name} conflicts with a type imported from {file}")]
    Conflict {
        /// Fully qualified name that collided.
        name: String,
        /// Descriptor record that already declared it.
        file: String,
    },

    /// A field references a type that neither scoped nor qualified lookup found.
    #[error("Unresolved type '{type_name}' for field {message}.{field}")]
    UnresolvedType {
        /// Qualified name of the message declaring the field.
        message: String,
        /// Field name.
        field: String,
        /// Declared type name.
        type_name: String,
    },

    /// A declared default does not fit the field's resolved kind.
    #[error("Invalid default '{value}' for field {field}: {reason}")]
    InvalidDefault {
        /// Qualified field name (`Message.field`).
        field: String,
        /// Declared default text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    // ========================================================================
    // Lookup and runtime errors
    // ========================================================================
    /// Unknown type, field or enum value.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Repeated field index out of range.
    #[error("Index out of bounds for field {field}: {index} >= {length}")]
    Index {
        /// Field name.
        field: String,
        /// Requested index.
        index: usize,
        /// Current element count.
        length: usize,
    },

    /// A value does not match the field's resolved kind.
    #[error("Type mismatch for field {field}: expected {expected}, got {got}")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Expected kind.
        expected: String,
        /// Kind of the rejected value.
        got: String,
    },

    /// Operation not valid for this field (e.g. `set_field` on a repeated field).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// `build()` on a message whose required fields are not all set.
    #[error("Message {message} is missing required fields: {}", missing.join(", "))]
    UninitializedMessage {
        /// Qualified message name.
        message: String,
        /// Names of the unset required fields.
        missing: Vec<String>,
    },

    // ========================================================================
    // Codec errors
    // ========================================================================
    /// Bytes that do not decode as a consistent descriptor set.
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    /// Message payload rejected by the protobuf wire decoder.
    #[error("Wire decode failed: {0}")]
    WireDecode(#[from] prost::DecodeError),

    /// I/O error while reading descriptor or definition input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML definition document could not be parsed.
    #[cfg(feature = "loaders")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for protodyn operations.
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
