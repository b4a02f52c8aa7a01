// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field addressing for the dynamic accessors.

use crate::error::{Result, SchemaError};
use crate::schema::{FieldDescriptor, MessageDescriptor};

/// Anything that names a field of a message type: a [`FieldDescriptor`], the
/// field's name or its number.
pub trait FieldRef {
    fn resolve(&self, message: &MessageDescriptor) -> Result<FieldDescriptor>;
}

impl FieldRef for &FieldDescriptor {
    fn resolve(&self, message: &MessageDescriptor) -> Result<FieldDescriptor> {
        if self.containing_message() == message {
            Ok((*self).clone())
        } else {
            Err(SchemaError::NotFound(format!(
                "field {} does not belong to {}",
                self.full_name(),
                message.full_name()
            )))
        }
    }
}

impl FieldRef for FieldDescriptor {
    fn resolve(&self, message: &MessageDescriptor) -> Result<FieldDescriptor> {
        <&FieldDescriptor as FieldRef>::resolve(&self, message)
    }
}

impl FieldRef for &str {
    fn resolve(&self, message: &MessageDescriptor) -> Result<FieldDescriptor> {
        message.get_field_by_name(self).ok_or_else(|| {
            SchemaError::NotFound(format!("field '{}' in {}", self, message.full_name()))
        })
    }
}

impl FieldRef for u32 {
    fn resolve(&self, message: &MessageDescriptor) -> Result<FieldDescriptor> {
        message.get_field(*self).ok_or_else(|| {
            SchemaError::NotFound(format!("field number {} in {}", self, message.full_name()))
        })
    }
}
