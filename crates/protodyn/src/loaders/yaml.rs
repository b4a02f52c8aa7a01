// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML schema loader.
//!
//! # Example YAML
//!
//! ```yaml
//! # person.yaml
//! name: person.proto
//! package: tutorial
//! messages:
//!   - name: Person
//!     fields:
//!       - { label: required, type: int32, name: id, number: 1 }
//!       - { label: required, type: string, name: name, number: 2 }
//!       - { type: string, name: email, number: 3 }
//!       - { label: repeated, type: PhoneNumber, name: phone, number: 4 }
//!     messages:
//!       - name: PhoneNumber
//!         fields:
//!           - { label: required, type: string, name: number, number: 1 }
//!           - { type: PhoneType, name: type, number: 2, default: HOME }
//!     enums:
//!       - name: PhoneType
//!         values:
//!           - { name: MOBILE, number: 0 }
//!           - { name: HOME, number: 1 }
//!           - { name: WORK, number: 2 }
//! ```

use crate::definition::{EnumTypeBuilder, EnumTypeSpec, MessageTypeBuilder, MessageTypeSpec};
use crate::error::{Result, SchemaError};
use crate::schema::{ResolvedSchema, SchemaBuilder};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// YAML schema loader.
pub struct YamlSchemaLoader;

/// Root YAML document: one descriptor record.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlSchemaDocument {
    /// Record name (`person.proto`).
    pub name: String,

    /// Package prefix of the top-level types.
    pub package: String,

    /// Top-level message types.
    pub messages: Vec<YamlMessage>,

    /// Top-level enum types.
    pub enums: Vec<YamlEnum>,
}

/// A message type in YAML format.
#[derive(Debug, Deserialize)]
pub struct YamlMessage {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<YamlField>,

    /// Nested message types
    #[serde(default)]
    pub messages: Vec<YamlMessage>,

    /// Nested enum types
    #[serde(default)]
    pub enums: Vec<YamlEnum>,
}

/// A field in YAML format.
#[derive(Debug, Deserialize)]
pub struct YamlField {
    /// required, optional or repeated
    #[serde(default = "default_label")]
    pub label: String,

    /// Scalar keyword or type name
    #[serde(rename = "type")]
    pub type_name: String,

    pub name: String,

    pub number: u32,

    /// Declared default; numbers and booleans are taken as written.
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,
}

fn default_label() -> String {
    "optional".to_string()
}

/// An enum type in YAML format.
#[derive(Debug, Deserialize)]
pub struct YamlEnum {
    pub name: String,

    #[serde(default)]
    pub values: Vec<YamlEnumValue>,
}

/// One enum value in YAML format.
#[derive(Debug, Deserialize)]
pub struct YamlEnumValue {
    pub name: String,
    pub number: i32,
}

impl YamlSchemaLoader {
    /// Load a schema document from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<YamlSchemaDocument> {
        let path = path.as_ref();
        log::debug!("[YamlSchemaLoader::load_from_file] {}", path.display());
        let yaml_content = fs::read_to_string(path)?;
        Self::parse_yaml(&yaml_content)
    }

    /// Parse YAML content.
    pub fn parse_yaml(yaml_content: &str) -> Result<YamlSchemaDocument> {
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    /// Load and resolve a schema from a YAML file.
    pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<ResolvedSchema> {
        Self::load_from_file(path)?.to_schema_builder()?.build()
    }
}

impl YamlSchemaDocument {
    /// Run the document through the definition builders.
    pub fn to_schema_builder(&self) -> Result<SchemaBuilder> {
        let mut builder = SchemaBuilder::new();
        builder.set_name(self.name.as_str()).set_package(self.package.as_str());
        for message in &self.messages {
            builder.add_message_definition(message.to_spec()?);
        }
        for enumeration in &self.enums {
            builder.add_enum_definition(enumeration.to_spec()?);
        }
        Ok(builder)
    }
}

impl YamlMessage {
    pub fn to_spec(&self) -> Result<MessageTypeSpec> {
        let mut builder = MessageTypeBuilder::new(self.name.as_str());
        for field in &self.fields {
            builder = match default_text(&field.default, &self.name, &field.name)? {
                Some(default) => builder.add_field_with_default(
                    &field.label,
                    &field.type_name,
                    &field.name,
                    field.number,
                    &default,
                )?,
                None => {
                    builder.add_field(&field.label, &field.type_name, &field.name, field.number)?
                }
            };
        }
        for nested in &self.enums {
            builder = builder.add_enum_definition(nested.to_spec()?)?;
        }
        for nested in &self.messages {
            builder = builder.add_message_definition(nested.to_spec()?)?;
        }
        Ok(builder.build())
    }
}

impl YamlEnum {
    pub fn to_spec(&self) -> Result<EnumTypeSpec> {
        let mut builder = EnumTypeBuilder::new(self.name.as_str());
        for value in &self.values {
            builder = builder.add_value(&value.name, value.number)?;
        }
        Ok(builder.build())
    }
}

fn default_text(
    value: &Option<serde_yaml::Value>,
    message: &str,
    field: &str,
) -> Result<Option<String>> {
    use serde_yaml::Value;

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(SchemaError::Validation(format!(
            "default of {}.{} must be a scalar, got {:?}",
            message, field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::Value;
    use std::io::Write;

    const PERSON_YAML: &str = r#"
name: person.proto
package: tutorial
messages:
  - name: Person
    fields:
      - { label: required, type: int32, name: id, number: 1 }
      - { label: required, type: string, name: name, number: 2 }
      - { type: double, name: score, number: 3, default: 1.5 }
      - { label: repeated, type: PhoneNumber, name: phone, number: 4 }
    messages:
      - name: PhoneNumber
        fields:
          - { label: required, type: string, name: number, number: 1 }
          - { type: PhoneType, name: type, number: 2, default: HOME }
    enums:
      - name: PhoneType
        values:
          - { name: MOBILE, number: 0 }
          - { name: HOME, number: 1 }
"#;

    #[test]
    fn test_parse_document() {
        let doc = YamlSchemaLoader::parse_yaml(PERSON_YAML).expect("valid YAML should parse");
        assert_eq!(doc.name, "person.proto");
        assert_eq!(doc.messages.len(), 1);

        let person = &doc.messages[0];
        assert_eq!(person.fields[2].label, "optional");
        assert_eq!(person.messages[0].fields[1].type_name, "PhoneType");
    }

    #[test]
    fn test_document_resolves() {
        let doc = YamlSchemaLoader::parse_yaml(PERSON_YAML).expect("parse");
        let schema = doc
            .to_schema_builder()
            .and_then(|b| b.build())
            .expect("schema builds");

        let phone = schema
            .new_message_builder("Person.PhoneNumber")
            .expect("nested type");
        let kind = phone.get_field("type").expect("default");
        assert_eq!(kind.as_enum().map(|v| v.name()), Some("HOME"));

        let person = schema.new_message_builder("tutorial.Person").expect("person");
        assert_eq!(person.get_field("score").expect("score"), Value::F64(1.5));
    }

    #[test]
    fn test_invalid_label_is_validation_error() {
        let yaml = r#"
messages:
  - name: Broken
    fields:
      - { label: sometimes, type: int32, name: x, number: 1 }
"#;
        let doc = YamlSchemaLoader::parse_yaml(yaml).expect("parse");
        assert!(matches!(
            doc.to_schema_builder(),
            Err(SchemaError::Validation(_))
        ));
    }

    #[test]
    fn test_non_scalar_default_rejected() {
        let yaml = r#"
messages:
  - name: Broken
    fields:
      - { type: int32, name: x, number: 1, default: [1, 2] }
"#;
        let doc = YamlSchemaLoader::parse_yaml(yaml).expect("parse");
        assert!(matches!(
            doc.to_schema_builder(),
            Err(SchemaError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = YamlSchemaLoader::parse_yaml("messages: [ {name: ").unwrap_err();
        assert!(matches!(err, SchemaError::Yaml(_)));
    }

    #[test]
    fn test_load_schema_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(PERSON_YAML.as_bytes()).expect("write yaml");

        let schema = YamlSchemaLoader::load_schema(file.path()).expect("load schema");
        assert_eq!(schema.name(), "person.proto");
        assert_eq!(
            schema.message_type_names().collect::<Vec<_>>(),
            ["tutorial.Person", "tutorial.Person.PhoneNumber"]
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = YamlSchemaLoader::load_from_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, SchemaError::Io(_)));
    }
}
