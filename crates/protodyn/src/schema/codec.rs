// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary persistence of a [`ResolvedSchema`].
//!
//! The persisted layout is a `google.protobuf.FileDescriptorSet`: one
//! `FileDescriptorProto` per descriptor record, imported records first. Field
//! references are always written as absolute names, and parsing accepts
//! absolute names only, so the rebuilt pool never depends on scope rules.

use super::pool::{FieldKindIndex, MessageEntry, PoolInner, TypeIndex};
use super::resolver::{self, Origin, SourceFile};
use super::ResolvedSchema;
use crate::definition::{
    EnumTypeBuilder, EnumTypeSpec, FieldSpec, Label, MessageTypeBuilder, MessageTypeSpec,
    ScalarKind,
};
use crate::error::{Result, SchemaError};
use prost::Message;
use prost_types::field_descriptor_proto::{Label as ProtoLabel, Type as ProtoType};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet,
};
use std::io::Read;

impl ResolvedSchema {
    /// Descriptor records of this pool as a `FileDescriptorSet`.
    pub fn file_descriptor_set(&self) -> FileDescriptorSet {
        let inner = &self.inner;
        FileDescriptorSet {
            file: inner
                .files
                .iter()
                .map(|file| FileDescriptorProto {
                    name: Some(file.name.clone()),
                    package: non_empty(&file.package),
                    dependency: file.dependencies.clone(),
                    message_type: file
                        .messages
                        .iter()
                        .map(|&index| message_proto(inner, index))
                        .collect(),
                    enum_type: file
                        .enums
                        .iter()
                        .map(|&index| enum_proto(inner, index))
                        .collect(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    /// Serialize the pool. Output is deterministic for a given pool.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.file_descriptor_set().encode_to_vec()
    }

    /// Rebuild a pool from bytes produced by [`to_bytes`](Self::to_bytes) or
    /// by other protobuf tooling.
    pub fn parse_from(bytes: &[u8]) -> Result<Self> {
        let set = FileDescriptorSet::decode(bytes).map_err(|e| {
            SchemaError::MalformedDescriptor(format!("undecodable descriptor set: {}", e))
        })?;
        Self::from_file_descriptor_set(&set)
    }

    /// Same as [`parse_from`](Self::parse_from), reading the whole stream.
    pub fn parse_from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse_from(&bytes)
    }

    /// Rebuild a pool from a descriptor set.
    ///
    /// The last record becomes the schema's own record. Any inconsistency
    /// (unresolvable reference, wrong type tag, duplicate names) is reported
    /// as [`SchemaError::MalformedDescriptor`].
    pub fn from_file_descriptor_set(set: &FileDescriptorSet) -> Result<Self> {
        if set.file.is_empty() {
            return Err(SchemaError::MalformedDescriptor(
                "descriptor set holds no records".to_string(),
            ));
        }

        let mut files = source_files(set, Origin::Imported)?;
        if let Some(last) = files.last_mut() {
            last.origin = Origin::Own;
        }

        let pool = resolver::resolve(&files).map_err(|e| match e {
            SchemaError::MalformedDescriptor(_) => e,
            other => SchemaError::MalformedDescriptor(other.to_string()),
        })?;

        for file in &set.file {
            let package = file.package.as_deref().unwrap_or_default();
            for message in &file.message_type {
                check_reference_tags(&pool, package, message)?;
            }
        }

        log::debug!(
            "[ResolvedSchema::parse_from] {} records, {} messages, {} enums",
            pool.files.len(),
            pool.messages.len(),
            pool.enums.len()
        );
        Ok(Self::from_inner(pool))
    }
}

// ----------------------------------------------------------------------
// Pool -> descriptor protos
// ----------------------------------------------------------------------

fn message_proto(inner: &PoolInner, index: usize) -> DescriptorProto {
    let message = &inner.messages[index];
    DescriptorProto {
        name: Some(message.name.clone()),
        field: message
            .fields
            .iter()
            .map(|field| {
                let mut proto = FieldDescriptorProto {
                    name: Some(field.name.clone()),
                    number: Some(field.number as i32),
                    default_value: field.default_literal.clone(),
                    ..Default::default()
                };
                proto.set_label(label_to_proto(field.label));
                match field.kind {
                    FieldKindIndex::Scalar(kind) => proto.set_type(scalar_to_proto(kind)),
                    FieldKindIndex::Message(target) => {
                        proto.set_type(ProtoType::Message);
                        proto.type_name = Some(format!(".{}", inner.messages[target].full_name));
                    }
                    FieldKindIndex::Enum(target) => {
                        proto.set_type(ProtoType::Enum);
                        proto.type_name = Some(format!(".{}", inner.enums[target].full_name));
                    }
                }
                proto
            })
            .collect(),
        nested_type: message
            .nested_messages
            .iter()
            .map(|&nested| message_proto(inner, nested))
            .collect(),
        enum_type: message
            .nested_enums
            .iter()
            .map(|&nested| enum_proto(inner, nested))
            .collect(),
        ..Default::default()
    }
}

fn enum_proto(inner: &PoolInner, index: usize) -> EnumDescriptorProto {
    let entry = &inner.enums[index];
    EnumDescriptorProto {
        name: Some(entry.name.clone()),
        value: entry
            .values
            .iter()
            .map(|value| EnumValueDescriptorProto {
                name: Some(value.name.clone()),
                number: Some(value.number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn label_to_proto(label: Label) -> ProtoLabel {
    match label {
        Label::Required => ProtoLabel::Required,
        Label::Optional => ProtoLabel::Optional,
        Label::Repeated => ProtoLabel::Repeated,
    }
}

fn scalar_to_proto(kind: ScalarKind) -> ProtoType {
    match kind {
        ScalarKind::Double => ProtoType::Double,
        ScalarKind::Float => ProtoType::Float,
        ScalarKind::Int32 => ProtoType::Int32,
        ScalarKind::Int64 => ProtoType::Int64,
        ScalarKind::UInt32 => ProtoType::Uint32,
        ScalarKind::UInt64 => ProtoType::Uint64,
        ScalarKind::SInt32 => ProtoType::Sint32,
        ScalarKind::SInt64 => ProtoType::Sint64,
        ScalarKind::Fixed32 => ProtoType::Fixed32,
        ScalarKind::Fixed64 => ProtoType::Fixed64,
        ScalarKind::SFixed32 => ProtoType::Sfixed32,
        ScalarKind::SFixed64 => ProtoType::Sfixed64,
        ScalarKind::Bool => ProtoType::Bool,
        ScalarKind::String => ProtoType::String,
        ScalarKind::Bytes => ProtoType::Bytes,
    }
}

// ----------------------------------------------------------------------
// Descriptor protos -> resolver input
// ----------------------------------------------------------------------

/// Convert descriptor records into resolver input.
///
/// Definitions go through the same validating builders as hand-written ones;
/// their failures surface as malformed descriptors.
pub(crate) fn source_files(set: &FileDescriptorSet, origin: Origin) -> Result<Vec<SourceFile>> {
    set.file
        .iter()
        .map(|file| {
            let name = file.name.clone().unwrap_or_default();
            Ok(SourceFile {
                package: file.package.clone().unwrap_or_default(),
                dependencies: file.dependency.clone(),
                messages: file
                    .message_type
                    .iter()
                    .map(message_spec)
                    .collect::<Result<_>>()
                    .map_err(|e| malformed(&name, e))?,
                enums: file
                    .enum_type
                    .iter()
                    .map(enum_spec)
                    .collect::<Result<_>>()
                    .map_err(|e| malformed(&name, e))?,
                name,
                origin,
            })
        })
        .collect()
}

fn malformed(file: &str, error: SchemaError) -> SchemaError {
    match error {
        SchemaError::MalformedDescriptor(_) => error,
        other => SchemaError::MalformedDescriptor(format!("record '{}': {}", file, other)),
    }
}

fn message_spec(proto: &DescriptorProto) -> Result<MessageTypeSpec> {
    let name = required_name(proto.name.as_deref(), "message")?;
    let mut builder = MessageTypeBuilder::new(name);
    for field in &proto.field {
        builder = builder.add_field_spec(field_spec(name, field)?)?;
    }
    for nested in &proto.enum_type {
        builder = builder.add_enum_definition(enum_spec(nested)?)?;
    }
    for nested in &proto.nested_type {
        builder = builder.add_message_definition(message_spec(nested)?)?;
    }
    Ok(builder.build())
}

fn enum_spec(proto: &EnumDescriptorProto) -> Result<EnumTypeSpec> {
    let name = required_name(proto.name.as_deref(), "enum")?;
    let mut builder = EnumTypeBuilder::new(name);
    for value in &proto.value {
        let value_name = required_name(value.name.as_deref(), "enum value")?;
        builder = builder.add_value(value_name, value.number.unwrap_or_default())?;
    }
    Ok(builder.build())
}

fn field_spec(message: &str, proto: &FieldDescriptorProto) -> Result<FieldSpec> {
    let name = required_name(proto.name.as_deref(), "field")?;
    let bad = |what: String| {
        SchemaError::MalformedDescriptor(format!("field {}.{}: {}", message, name, what))
    };

    let label = match proto.label {
        None => Label::Optional,
        Some(raw) => match ProtoLabel::try_from(raw) {
            Ok(ProtoLabel::Required) => Label::Required,
            Ok(ProtoLabel::Optional) => Label::Optional,
            Ok(ProtoLabel::Repeated) => Label::Repeated,
            Err(_) => return Err(bad(format!("unknown label {}", raw))),
        },
    };

    let raw_type = proto.r#type.ok_or_else(|| bad("missing type".to_string()))?;
    let field_type =
        ProtoType::try_from(raw_type).map_err(|_| bad(format!("unknown type {}", raw_type)))?;
    let type_name = match proto_to_scalar(field_type) {
        Some(kind) => kind.keyword().to_string(),
        None if field_type == ProtoType::Group => {
            return Err(bad("groups are not supported".to_string()))
        }
        None => match proto.type_name.as_deref() {
            Some(reference) if reference.starts_with('.') => reference.to_string(),
            Some(reference) => {
                return Err(bad(format!("reference '{}' is not absolute", reference)))
            }
            None => return Err(bad("missing type name".to_string())),
        },
    };

    let number = proto
        .number
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| bad(format!("invalid number {:?}", proto.number)))?;

    let mut spec = FieldSpec::new(label, type_name, name, number)?;
    if let Some(default) = &proto.default_value {
        spec = spec.with_default(default.clone());
    }
    Ok(spec)
}

fn required_name<'a>(name: Option<&'a str>, what: &str) -> Result<&'a str> {
    match name {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(SchemaError::MalformedDescriptor(format!(
            "{} without a name",
            what
        ))),
    }
}

fn proto_to_scalar(field_type: ProtoType) -> Option<ScalarKind> {
    Some(match field_type {
        ProtoType::Double => ScalarKind::Double,
        ProtoType::Float => ScalarKind::Float,
        ProtoType::Int32 => ScalarKind::Int32,
        ProtoType::Int64 => ScalarKind::Int64,
        ProtoType::Uint32 => ScalarKind::UInt32,
        ProtoType::Uint64 => ScalarKind::UInt64,
        ProtoType::Sint32 => ScalarKind::SInt32,
        ProtoType::Sint64 => ScalarKind::SInt64,
        ProtoType::Fixed32 => ScalarKind::Fixed32,
        ProtoType::Fixed64 => ScalarKind::Fixed64,
        ProtoType::Sfixed32 => ScalarKind::SFixed32,
        ProtoType::Sfixed64 => ScalarKind::SFixed64,
        ProtoType::Bool => ScalarKind::Bool,
        ProtoType::String => ScalarKind::String,
        ProtoType::Bytes => ScalarKind::Bytes,
        ProtoType::Group | ProtoType::Message | ProtoType::Enum => return None,
    })
}

/// Resolution matches names only; check that every reference's declared
/// tag (message or enum) agrees with what the name resolved to.
fn check_reference_tags(pool: &PoolInner, scope: &str, proto: &DescriptorProto) -> Result<()> {
    let name = proto.name.as_deref().unwrap_or_default();
    let full_name = if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    };
    let entry: &MessageEntry = match pool.names.get(&full_name) {
        Some(TypeIndex::Message(index)) => &pool.messages[*index],
        _ => {
            return Err(SchemaError::MalformedDescriptor(format!(
                "message {} missing after resolution",
                full_name
            )))
        }
    };

    for field in &proto.field {
        let declared = field.r#type.and_then(|raw| ProtoType::try_from(raw).ok());
        let resolved = field
            .number
            .and_then(|n| u32::try_from(n).ok())
            .and_then(|n| entry.field_index_by_number(n))
            .map(|index| entry.fields[index].kind);
        let consistent = matches!(
            (declared, resolved),
            (Some(ProtoType::Message), Some(FieldKindIndex::Message(_)))
                | (Some(ProtoType::Enum), Some(FieldKindIndex::Enum(_)))
        ) || !matches!(declared, Some(ProtoType::Message | ProtoType::Enum));
        if !consistent {
            return Err(SchemaError::MalformedDescriptor(format!(
                "field {}.{} declares {:?} but '{}' is not one",
                full_name,
                field.name.as_deref().unwrap_or_default(),
                declared,
                field.type_name.as_deref().unwrap_or_default()
            )));
        }
    }

    for nested in &proto.nested_type {
        check_reference_tags(pool, &full_name, nested)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaBuilder;

    fn sample() -> ResolvedSchema {
        let mood = EnumTypeBuilder::new("Mood")
            .add_value("CALM", 0)
            .and_then(|b| b.add_value("ANGRY", 5))
            .expect("valid enum")
            .build();
        let note = MessageTypeBuilder::new("Note")
            .add_field("required", "string", "text", 1)
            .and_then(|b| b.add_field_with_default("optional", "Mood", "mood", 2, "ANGRY"))
            .and_then(|b| b.add_field_with_default("optional", "bytes", "blob", 3, "\\001x"))
            .and_then(|b| b.add_field("repeated", "Note", "replies", 4))
            .expect("valid message")
            .build();

        let mut builder = SchemaBuilder::new();
        builder
            .set_name("note.proto")
            .set_package("notes")
            .add_enum_definition(mood)
            .add_message_definition(note);
        builder.build().expect("schema builds")
    }

    #[test]
    fn test_descriptor_set_layout() {
        let set = sample().file_descriptor_set();
        assert_eq!(set.file.len(), 1);

        let file = &set.file[0];
        assert_eq!(file.name(), "note.proto");
        assert_eq!(file.package(), "notes");

        let note = &file.message_type[0];
        let mood = &note.field[1];
        assert_eq!(mood.r#type(), ProtoType::Enum);
        assert_eq!(mood.type_name(), ".notes.Mood");
        assert_eq!(mood.default_value(), "ANGRY");
        assert_eq!(note.field[3].label(), ProtoLabel::Repeated);
        assert_eq!(note.field[3].type_name(), ".notes.Note");
    }

    #[test]
    fn test_round_trip() {
        let schema = sample();
        let bytes = schema.to_bytes();
        let parsed = ResolvedSchema::parse_from(&bytes).expect("parses");

        assert_eq!(parsed, schema);
        assert_eq!(parsed.to_string(), schema.to_string());
        assert_eq!(parsed.to_bytes(), bytes);
    }

    #[test]
    fn test_parse_from_reader() {
        let bytes = sample().to_bytes();
        let parsed = ResolvedSchema::parse_from_reader(bytes.as_slice()).expect("parses");
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = ResolvedSchema::parse_from(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedDescriptor(_)));

        let err = ResolvedSchema::parse_from(&[]).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedDescriptor(_)));
    }

    #[test]
    fn test_dangling_reference_is_malformed() {
        let mut set = sample().file_descriptor_set();
        set.file[0].message_type[0].field[1].type_name = Some(".notes.Gone".to_string());
        let err = ResolvedSchema::from_file_descriptor_set(&set).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedDescriptor(_)));
    }

    #[test]
    fn test_wrong_type_tag_is_malformed() {
        let mut set = sample().file_descriptor_set();
        set.file[0].message_type[0].field[1].set_type(ProtoType::Message);
        let err = ResolvedSchema::from_file_descriptor_set(&set).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedDescriptor(_)));
    }

    #[test]
    fn test_relative_reference_is_malformed() {
        let mut set = sample().file_descriptor_set();
        set.file[0].message_type[0].field[3].type_name = Some("Note".to_string());
        let err = ResolvedSchema::from_file_descriptor_set(&set).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedDescriptor(_)));
    }
}
