// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative schema loaders.
//!
//! Type definitions can be kept in configuration files instead of code. The
//! loaders feed the same validating builders as hand-written definitions.
//!
//! # Example
//!
//! ```rust,ignore
//! use protodyn::loaders::YamlSchemaLoader;
//!
//! let schema = YamlSchemaLoader::load_schema("schemas/person.yaml")?;
//! let person = schema.new_message_builder("Person")?;
//! ```

#[cfg(feature = "loaders")]
pub mod yaml;

#[cfg(feature = "loaders")]
pub use yaml::{
    YamlEnum, YamlEnumValue, YamlField, YamlMessage, YamlSchemaDocument, YamlSchemaLoader,
};
