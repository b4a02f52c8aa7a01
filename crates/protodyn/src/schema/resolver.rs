// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Two-pass type resolution.
//!
//! Pass 1 walks every record depth-first, gives each message and enum an
//! arena index and a fully qualified name, and fills the flat name table.
//! Pass 2 resolves every field's declared type against that table, using the
//! lexical scope chain of the declaring message first and the flat table
//! second, then computes the field's default.
//!
//! Fields only ever point at arena indices, so forward references and
//! recursive types need no special handling.

use super::defaults::{parse_scalar_default, zero_value};
use super::pool::{
    DefaultValue, EnumEntry, FieldEntry, FieldKindIndex, FileEntry, MessageEntry, PoolInner,
    TypeIndex,
};
use crate::definition::{EnumTypeSpec, FieldSpec, MessageTypeSpec, ScalarKind};
use crate::error::{Result, SchemaError};
use std::collections::HashMap;

/// Where a record came from; decides how name collisions are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    /// Declared by the schema being built.
    Own,
    /// Brought in through `add_schema` (or decoded from bytes).
    Imported,
}

/// One descriptor record to resolve.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourceFile {
    pub(crate) name: String,
    pub(crate) package: String,
    pub(crate) dependencies: Vec<String>,
    pub(crate) messages: Vec<MessageTypeSpec>,
    pub(crate) enums: Vec<EnumTypeSpec>,
    pub(crate) origin: Origin,
}

/// Resolve a set of records into a pool.
///
/// Records are laid out in the given order, so callers list imported records
/// before the schema's own one.
pub(crate) fn resolve(files: &[SourceFile]) -> Result<PoolInner> {
    let mut resolver = TypeResolver::default();
    for (file_index, file) in files.iter().enumerate() {
        resolver.qualify_file(file_index, file)?;
    }
    resolver.resolve_fields()?;

    log::debug!(
        "[TypeResolver::resolve] {} records, {} messages, {} enums",
        resolver.pool.files.len(),
        resolver.pool.messages.len(),
        resolver.pool.enums.len()
    );
    Ok(resolver.pool)
}

#[derive(Default)]
struct TypeResolver<'a> {
    pool: PoolInner,
    /// Message spec per arena index, consumed by pass 2.
    message_specs: Vec<&'a MessageTypeSpec>,
    /// Origin and record of every registered name.
    owners: HashMap<String, (Origin, usize)>,
}

impl<'a> TypeResolver<'a> {
    // ------------------------------------------------------------------
    // Pass 1: qualify
    // ------------------------------------------------------------------

    fn qualify_file(&mut self, file_index: usize, file: &'a SourceFile) -> Result<()> {
        self.pool.files.push(FileEntry {
            name: file.name.clone(),
            package: file.package.clone(),
            dependencies: file.dependencies.clone(),
            messages: Vec::new(),
            enums: Vec::new(),
        });

        let scope = file.package.as_str();
        for message in &file.messages {
            let index = self.qualify_message(message, file_index, file.origin, None, scope)?;
            self.pool.files[file_index].messages.push(index);
        }
        for enumeration in &file.enums {
            let index = self.qualify_enum(enumeration, file_index, file.origin, None, scope)?;
            self.pool.files[file_index].enums.push(index);
        }
        Ok(())
    }

    fn qualify_message(
        &mut self,
        spec: &'a MessageTypeSpec,
        file: usize,
        origin: Origin,
        parent: Option<usize>,
        scope: &str,
    ) -> Result<usize> {
        check_type_name(&spec.name, "message", scope)?;
        let full_name = qualify(scope, &spec.name);
        let index = self.pool.messages.len();
        self.register(&full_name, TypeIndex::Message(index), origin, file)?;

        self.pool.messages.push(MessageEntry {
            name: spec.name.clone(),
            full_name: full_name.clone(),
            file,
            parent,
            fields: Vec::with_capacity(spec.fields.len()),
            nested_messages: Vec::new(),
            nested_enums: Vec::new(),
        });
        self.message_specs.push(spec);

        for nested in &spec.nested_enums {
            let child = self.qualify_enum(nested, file, origin, Some(index), &full_name)?;
            self.pool.messages[index].nested_enums.push(child);
        }
        for nested in &spec.nested_messages {
            let child = self.qualify_message(nested, file, origin, Some(index), &full_name)?;
            self.pool.messages[index].nested_messages.push(child);
        }
        Ok(index)
    }

    fn qualify_enum(
        &mut self,
        spec: &EnumTypeSpec,
        file: usize,
        origin: Origin,
        parent: Option<usize>,
        scope: &str,
    ) -> Result<usize> {
        check_type_name(&spec.name, "enum", scope)?;
        let full_name = qualify(scope, &spec.name);
        if spec.values.is_empty() {
            return Err(SchemaError::Validation(format!(
                "enum {} declares no values",
                full_name
            )));
        }

        let index = self.pool.enums.len();
        self.register(&full_name, TypeIndex::Enum(index), origin, file)?;
        self.pool.enums.push(EnumEntry {
            name: spec.name.clone(),
            full_name,
            file,
            parent,
            values: spec.values.clone(),
        });
        Ok(index)
    }

    fn register(
        &mut self,
        full_name: &str,
        index: TypeIndex,
        origin: Origin,
        file: usize,
    ) -> Result<()> {
        if let Some(&(existing_origin, existing_file)) = self.owners.get(full_name) {
            if origin == Origin::Own && existing_origin == Origin::Own {
                return Err(SchemaError::DuplicateType {
                    name: full_name.to_string(),
                });
            }
            return Err(SchemaError::Conflict {
                name: full_name.to_string(),
                file: self.pool.files[existing_file].name.clone(),
            });
        }
        self.owners.insert(full_name.to_string(), (origin, file));
        self.pool.names.insert(full_name.to_string(), index);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Pass 2: resolve field types and defaults
    // ------------------------------------------------------------------

    fn resolve_fields(&mut self) -> Result<()> {
        for message_index in 0..self.message_specs.len() {
            let spec = self.message_specs[message_index];
            let mut fields = Vec::with_capacity(spec.fields.len());
            for field in &spec.fields {
                fields.push(self.resolve_field(message_index, field)?);
            }
            self.pool.messages[message_index].fields = fields;
        }
        Ok(())
    }

    fn resolve_field(&self, message_index: usize, field: &FieldSpec) -> Result<FieldEntry> {
        let message = &self.pool.messages[message_index];

        let kind = match ScalarKind::from_keyword(&field.type_name) {
            Some(scalar) => FieldKindIndex::Scalar(scalar),
            None => {
                let found = self
                    .lookup(&message.full_name, &field.type_name)
                    .ok_or_else(|| SchemaError::UnresolvedType {
                        message: message.full_name.clone(),
                        field: field.name.clone(),
                        type_name: field.type_name.clone(),
                    })?;
                log::trace!(
                    "[TypeResolver::resolve_field] {}.{}: '{}' -> {}",
                    message.full_name,
                    field.name,
                    field.type_name,
                    self.pool.full_name_of(found)
                );
                match found {
                    TypeIndex::Message(index) => FieldKindIndex::Message(index),
                    TypeIndex::Enum(index) => FieldKindIndex::Enum(index),
                }
            }
        };

        let default = self.compute_default(message, field, kind)?;
        Ok(FieldEntry {
            name: field.name.clone(),
            number: field.number,
            label: field.label,
            kind,
            default_literal: field.default.clone(),
            default,
        })
    }

    /// Scoped lookup from `scope` outward, then exact lookup in the flat table.
    ///
    /// A leading `.` marks an absolute name and skips the scope search.
    fn lookup(&self, scope: &str, type_name: &str) -> Option<TypeIndex> {
        let names = &self.pool.names;
        if let Some(absolute) = type_name.strip_prefix('.') {
            return names.get(absolute).copied();
        }

        let mut scope = scope;
        while !scope.is_empty() {
            let candidate = qualify(scope, type_name);
            if let Some(&found) = names.get(&candidate) {
                return Some(found);
            }
            scope = match scope.rfind('.') {
                Some(pos) => &scope[..pos],
                None => "",
            };
        }

        names.get(type_name).copied()
    }

    fn compute_default(
        &self,
        message: &MessageEntry,
        field: &FieldSpec,
        kind: FieldKindIndex,
    ) -> Result<DefaultValue> {
        let invalid = |value: &str, reason: String| SchemaError::InvalidDefault {
            field: format!("{}.{}", message.full_name, field.name),
            value: value.to_string(),
            reason,
        };

        if field.label.is_repeated() {
            return match &field.default {
                Some(value) => Err(invalid(
                    value,
                    "repeated fields cannot declare a default".to_string(),
                )),
                None => Ok(DefaultValue::Repeated),
            };
        }

        match (kind, field.default.as_deref()) {
            (FieldKindIndex::Scalar(scalar), None) => Ok(DefaultValue::Scalar(zero_value(scalar))),
            (FieldKindIndex::Scalar(scalar), Some(text)) => parse_scalar_default(scalar, text)
                .map(DefaultValue::Scalar)
                .map_err(|reason| invalid(text, reason)),
            (FieldKindIndex::Enum(_), None) => Ok(DefaultValue::Enum(0)),
            (FieldKindIndex::Enum(enum_index), Some(text)) => {
                let enum_entry = &self.pool.enums[enum_index];
                enum_entry
                    .values
                    .iter()
                    .position(|v| v.name == text)
                    .map(DefaultValue::Enum)
                    .ok_or_else(|| {
                        invalid(
                            text,
                            format!("not a value of enum {}", enum_entry.full_name),
                        )
                    })
            }
            (FieldKindIndex::Message(_), None) => Ok(DefaultValue::Message),
            (FieldKindIndex::Message(_), Some(text)) => Err(invalid(
                text,
                "message fields cannot declare a default".to_string(),
            )),
        }
    }
}

/// Type names are single identifiers; the scope supplies every dot.
fn check_type_name(name: &str, what: &str, scope: &str) -> Result<()> {
    if name.is_empty() || name.contains('.') {
        return Err(SchemaError::Validation(format!(
            "{} name '{}' in scope '{}' is not a plain identifier",
            what, name, scope
        )));
    }
    Ok(())
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{EnumTypeBuilder, MessageTypeBuilder};

    fn own_file(
        package: &str,
        messages: Vec<MessageTypeSpec>,
        enums: Vec<EnumTypeSpec>,
    ) -> SourceFile {
        SourceFile {
            name: "test.proto".into(),
            package: package.into(),
            dependencies: Vec::new(),
            messages,
            enums,
            origin: Origin::Own,
        }
    }

    fn color_enum() -> EnumTypeSpec {
        EnumTypeBuilder::new("Color")
            .add_value("RED", 0)
            .and_then(|b| b.add_value("GREEN", 1))
            .expect("valid enum")
            .build()
    }

    #[test]
    fn test_sibling_and_ancestor_references() {
        let leaf = MessageTypeBuilder::new("Leaf")
            .add_field("optional", "Color", "color", 1)
            .and_then(|b| b.add_field("optional", "Branch", "sibling", 2))
            .expect("valid leaf")
            .build();
        let branch = MessageTypeBuilder::new("Branch").build();
        let tree = MessageTypeBuilder::new("Tree")
            .add_message_definition(leaf)
            .and_then(|b| b.add_message_definition(branch))
            .and_then(|b| b.add_field("repeated", "Leaf", "leaves", 1))
            .expect("valid tree")
            .build();

        let pool = resolve(&[own_file("forest", vec![tree], vec![color_enum()])])
            .expect("resolves");

        let leaf = &pool.messages[pool.names["forest.Tree.Leaf"].message()];
        assert_eq!(
            leaf.fields[0].kind,
            FieldKindIndex::Enum(pool.names["forest.Color"].enumeration())
        );
        assert_eq!(
            leaf.fields[1].kind,
            FieldKindIndex::Message(pool.names["forest.Tree.Branch"].message())
        );
    }

    #[test]
    fn test_forward_and_recursive_references() {
        let node = MessageTypeBuilder::new("Node")
            .add_field("optional", "Node", "next", 1)
            .and_then(|b| b.add_field("optional", "Later", "later", 2))
            .expect("valid node")
            .build();
        let later = MessageTypeBuilder::new("Later").build();

        let pool = resolve(&[own_file("", vec![node, later], vec![])]).expect("resolves");
        assert_eq!(pool.messages[0].fields[0].kind, FieldKindIndex::Message(0));
        assert_eq!(pool.messages[0].fields[1].kind, FieldKindIndex::Message(1));
    }

    #[test]
    fn test_fully_qualified_cross_package_reference() {
        let target = MessageTypeBuilder::new("Target").build();
        let imported = SourceFile {
            name: "other.proto".into(),
            package: "other.pkg".into(),
            dependencies: Vec::new(),
            messages: vec![target],
            enums: Vec::new(),
            origin: Origin::Imported,
        };
        let user = MessageTypeBuilder::new("User")
            .add_field("optional", "other.pkg.Target", "relative", 1)
            .and_then(|b| b.add_field("optional", ".other.pkg.Target", "absolute", 2))
            .expect("valid user")
            .build();

        let pool = resolve(&[imported, own_file("mine", vec![user], vec![])]).expect("resolves");
        let user = &pool.messages[pool.names["mine.User"].message()];
        assert_eq!(user.fields[0].kind, FieldKindIndex::Message(0));
        assert_eq!(user.fields[1].kind, FieldKindIndex::Message(0));
    }

    #[test]
    fn test_unresolved_type() {
        let msg = MessageTypeBuilder::new("Msg")
            .add_field("optional", "Missing", "missing", 1)
            .expect("valid")
            .build();
        let err = resolve(&[own_file("pkg", vec![msg], vec![])]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnresolvedType { ref type_name, .. } if type_name == "Missing"
        ));
    }

    #[test]
    fn test_duplicate_own_type() {
        let first = MessageTypeBuilder::new("Dup").build();
        let second = MessageTypeBuilder::new("Dup").build();
        let err = resolve(&[own_file("pkg", vec![first, second], vec![])]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateType { ref name } if name == "pkg.Dup"));
    }

    #[test]
    fn test_imported_collision_is_conflict() {
        let imported = SourceFile {
            name: "a.proto".into(),
            package: "pkg".into(),
            dependencies: Vec::new(),
            messages: vec![MessageTypeBuilder::new("Dup").build()],
            enums: Vec::new(),
            origin: Origin::Imported,
        };
        let own = own_file("pkg", vec![MessageTypeBuilder::new("Dup").build()], vec![]);
        let err = resolve(&[imported, own]).unwrap_err();
        assert!(matches!(err, SchemaError::Conflict { ref file, .. } if file == "a.proto"));
    }

    #[test]
    fn test_defaults() {
        let msg = MessageTypeBuilder::new("Msg")
            .add_field("optional", "Color", "implicit", 1)
            .and_then(|b| b.add_field_with_default("optional", "Color", "explicit", 2, "GREEN"))
            .and_then(|b| b.add_field_with_default("optional", "int32", "count", 3, "7"))
            .and_then(|b| b.add_field("repeated", "int32", "items", 4))
            .expect("valid")
            .build();
        let pool = resolve(&[own_file("", vec![msg], vec![color_enum()])]).expect("resolves");
        let fields = &pool.messages[0].fields;

        assert_eq!(fields[0].default, DefaultValue::Enum(0));
        assert_eq!(fields[1].default, DefaultValue::Enum(1));
        assert_eq!(
            fields[2].default,
            DefaultValue::Scalar(crate::dynamic::Value::I32(7))
        );
        assert_eq!(fields[3].default, DefaultValue::Repeated);
    }

    #[test]
    fn test_invalid_defaults() {
        let bad_enum = MessageTypeBuilder::new("Msg")
            .add_field_with_default("optional", "Color", "c", 1, "PURPLE")
            .expect("valid")
            .build();
        let err = resolve(&[own_file("", vec![bad_enum], vec![color_enum()])]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));

        let bad_repeated = MessageTypeBuilder::new("Msg")
            .add_field_with_default("repeated", "int32", "r", 1, "1")
            .expect("valid")
            .build();
        let err = resolve(&[own_file("", vec![bad_repeated], vec![])]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));

        let bad_number = MessageTypeBuilder::new("Msg")
            .add_field_with_default("optional", "uint32", "n", 1, "-3")
            .expect("valid")
            .build();
        let err = resolve(&[own_file("", vec![bad_number], vec![])]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));

        let bad_flag = MessageTypeBuilder::new("Msg")
            .add_field_with_default("optional", "bool", "flag", 1, "yes")
            .expect("valid")
            .build();
        let err = resolve(&[own_file("", vec![bad_flag], vec![])]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));

        let bad_sign = MessageTypeBuilder::new("Msg")
            .add_field_with_default("optional", "int64", "n", 1, "--9")
            .expect("valid")
            .build();
        let err = resolve(&[own_file("", vec![bad_sign], vec![])]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    }

    #[test]
    fn test_message_field_default_rejected() {
        let inner = MessageTypeBuilder::new("Inner").build();
        let outer = MessageTypeBuilder::new("Outer")
            .add_field_with_default("optional", "Inner", "inner", 1, "x")
            .expect("valid")
            .build();
        let err = resolve(&[own_file("pkg", vec![inner, outer], vec![])]).unwrap_err();
        match err {
            SchemaError::InvalidDefault { field, value, .. } => {
                assert_eq!(field, "pkg.Outer.inner");
                assert_eq!(value, "x");
            }
            other => panic!("expected an invalid default, got {:?}", other),
        }
    }

    #[test]
    fn test_type_names_must_be_plain_identifiers() {
        let unnamed = MessageTypeBuilder::new("").build();
        let err = resolve(&[own_file("pkg", vec![unnamed], vec![])]).unwrap_err();
        assert!(matches!(err, SchemaError::Validation(_)));

        let dotted = MessageTypeBuilder::new("a.B").build();
        let err = resolve(&[own_file("pkg", vec![dotted], vec![])]).unwrap_err();
        assert!(matches!(err, SchemaError::Validation(_)));

        let unnamed_enum = EnumTypeBuilder::new("")
            .add_value("ZERO", 0)
            .expect("valid")
            .build();
        let holder = MessageTypeBuilder::new("Holder")
            .add_enum_definition(unnamed_enum)
            .expect("first nested type")
            .build();
        let err = resolve(&[own_file("pkg", vec![holder], vec![])]).unwrap_err();
        assert!(matches!(err, SchemaError::Validation(_)));
    }

    #[test]
    fn test_empty_enum_rejected() {
        let empty = EnumTypeBuilder::new("Empty").build();
        let err = resolve(&[own_file("", vec![], vec![empty])]).unwrap_err();
        assert!(matches!(err, SchemaError::Validation(_)));
    }

    impl TypeIndex {
        fn message(self) -> usize {
            match self {
                Self::Message(index) => index,
                Self::Enum(_) => panic!("expected a message"),
            }
        }

        fn enumeration(self) -> usize {
            match self {
                Self::Enum(index) => index,
                Self::Message(_) => panic!("expected an enum"),
            }
        }
    }
}
