// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic messages
//!
//! Values of runtime-defined message types, manipulated through a generic
//! field API instead of generated code.
//!
//! # Features
//!
//! - **DynamicMessageBuilder**: mutable, validates every value against the field's kind
//! - **DynamicMessage**: immutable snapshot with default-aware reads
//! - **FieldRef**: address fields by descriptor, name or number
//! - **Wire codec**: protobuf binary encoding through `prost::encoding`
//! - **Text format**: `Display` renders protobuf text format
//!
//! # Example
//!
//! ```rust
//! use protodyn::{EnumTypeBuilder, MessageTypeBuilder, SchemaBuilder, DynamicMessage};
//!
//! # fn main() -> protodyn::Result<()> {
//! let unit = EnumTypeBuilder::new("Unit")
//!     .add_value("CELSIUS", 0)?
//!     .add_value("KELVIN", 1)?
//!     .build();
//! let reading = MessageTypeBuilder::new("Reading")
//!     .add_field("required", "uint32", "sensor_id", 1)?
//!     .add_field("optional", "double", "value", 2)?
//!     .add_field("optional", "Unit", "unit", 3)?
//!     .build();
//!
//! let mut schema = SchemaBuilder::new();
//! schema.set_name("sensor.proto").add_enum_definition(unit).add_message_definition(reading);
//! let schema = schema.build()?;
//!
//! let mut builder = schema.new_message_builder("Reading")?;
//! builder
//!     .set_field("sensor_id", 42u32)?
//!     .set_field("value", 23.5)?
//!     .set_field("unit", schema.get_enum_value("Unit", "KELVIN")?)?;
//! let reading = builder.build()?;
//!
//! let bytes = reading.encode_to_vec();
//! let decoded = DynamicMessage::decode(reading.descriptor().clone(), &bytes)?;
//! assert_eq!(decoded, reading);
//! assert_eq!(decoded.to_string(), "sensor_id: 42\nvalue: 23.5\nunit: KELVIN\n");
//! # Ok(())
//! # }
//! ```

mod field_ref;
mod message;
mod text;
mod value;
mod wire;

pub use field_ref::FieldRef;
pub use message::{DynamicMessage, DynamicMessageBuilder};
pub use text::{escape_bytes, unescape_bytes};
pub use value::Value;
