// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema builder.

use super::codec;
use super::resolver::{self, Origin, SourceFile};
use super::ResolvedSchema;
use crate::definition::{EnumTypeSpec, MessageTypeSpec};
use crate::error::Result;

/// Collects top-level type definitions and imported schemas, then resolves
/// them into a [`ResolvedSchema`].
///
/// ```rust
/// use protodyn::{MessageTypeBuilder, SchemaBuilder};
///
/// # fn main() -> protodyn::Result<()> {
/// let person = MessageTypeBuilder::new("Person")
///     .add_field("required", "int32", "id", 1)?
///     .add_field("required", "string", "name", 2)?
///     .build();
///
/// let mut builder = SchemaBuilder::new();
/// builder.set_name("person.proto").set_package("demo").add_message_definition(person);
/// let schema = builder.build()?;
///
/// assert!(schema.get_message_descriptor("demo.Person").is_ok());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    name: String,
    package: String,
    messages: Vec<MessageTypeSpec>,
    enums: Vec<EnumTypeSpec>,
    imports: Vec<ResolvedSchema>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the schema's own descriptor record.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Package prefixed to every top-level type.
    pub fn set_package(&mut self, package: impl Into<String>) -> &mut Self {
        self.package = package.into();
        self
    }

    pub fn add_message_definition(&mut self, message: MessageTypeSpec) -> &mut Self {
        self.messages.push(message);
        self
    }

    pub fn add_enum_definition(&mut self, enumeration: EnumTypeSpec) -> &mut Self {
        self.enums.push(enumeration);
        self
    }

    /// Merge a resolved schema: its types become visible to this schema's
    /// fields and are re-exposed by the built pool.
    pub fn add_schema(&mut self, schema: &ResolvedSchema) -> &mut Self {
        self.imports.push(schema.clone());
        self
    }

    /// Resolve own and imported definitions.
    ///
    /// Imported records come first in the result, each record once; the
    /// schema's own record lists them as dependencies. Fails without
    /// producing anything on the first resolution error.
    pub fn build(&self) -> Result<ResolvedSchema> {
        let mut files: Vec<SourceFile> = Vec::new();
        for import in &self.imports {
            let set = import.file_descriptor_set();
            for file in codec::source_files(&set, Origin::Imported)? {
                if files.contains(&file) {
                    log::trace!("[SchemaBuilder::build] '{}' already imported", file.name);
                    continue;
                }
                files.push(file);
            }
        }

        let mut dependencies: Vec<String> = Vec::new();
        for file in &files {
            if !dependencies.contains(&file.name) {
                dependencies.push(file.name.clone());
            }
        }

        files.push(SourceFile {
            name: self.name.clone(),
            package: self.package.clone(),
            dependencies,
            messages: self.messages.clone(),
            enums: self.enums.clone(),
            origin: Origin::Own,
        });

        let pool = resolver::resolve(&files)?;
        log::debug!(
            "[SchemaBuilder::build] '{}' built: {} messages, {} enums, {} imported records",
            self.name,
            pool.messages.len(),
            pool.enums.len(),
            pool.files.len() - 1
        );
        Ok(ResolvedSchema::from_inner(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{EnumTypeBuilder, MessageTypeBuilder};
    use crate::error::SchemaError;

    fn single(name: &str, package: &str, message: &str) -> ResolvedSchema {
        let mut builder = SchemaBuilder::new();
        builder
            .set_name(name)
            .set_package(package)
            .add_message_definition(MessageTypeBuilder::new(message).build());
        builder.build().expect("schema builds")
    }

    #[test]
    fn test_package_prefix() {
        let schema = single("a.proto", "pkg.sub", "Thing");
        assert_eq!(
            schema.message_type_names().collect::<Vec<_>>(),
            ["pkg.sub.Thing"]
        );
    }

    #[test]
    fn test_imported_types_are_visible() {
        let base = single("base.proto", "base", "Shared");
        let user = MessageTypeBuilder::new("User")
            .add_field("optional", "base.Shared", "shared", 1)
            .expect("valid")
            .build();

        let mut builder = SchemaBuilder::new();
        builder
            .set_name("user.proto")
            .set_package("app")
            .add_schema(&base)
            .add_message_definition(user);
        let schema = builder.build().expect("merged schema builds");

        assert_eq!(schema.dependencies(), ["base.proto"]);
        assert!(schema.get_message_descriptor("base.Shared").is_ok());
        assert!(schema.get_message_descriptor("Shared").is_ok());
        assert_eq!(
            schema.file_names().collect::<Vec<_>>(),
            ["base.proto", "user.proto"]
        );
    }

    #[test]
    fn test_same_schema_imported_twice() {
        let base = single("base.proto", "base", "Shared");
        let mut builder = SchemaBuilder::new();
        builder.set_name("twice.proto").add_schema(&base).add_schema(&base);
        let schema = builder.build().expect("duplicate import is deduplicated");
        assert_eq!(schema.file_names().count(), 2);
    }

    #[test]
    fn test_conflict_between_imports() {
        let first = single("first.proto", "same", "Thing");
        let second = single("second.proto", "same", "Thing");
        let mut builder = SchemaBuilder::new();
        builder.add_schema(&first).add_schema(&second);
        let err = builder.build().unwrap_err();
        match err {
            SchemaError::Conflict { name, file } => {
                assert_eq!(name, "same.Thing");
                assert_eq!(file, "first.proto");
            }
            other => panic!("expected a conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_conflict_with_own_type() {
        let base = single("base.proto", "pkg", "Thing");
        let mut builder = SchemaBuilder::new();
        builder
            .set_package("pkg")
            .add_schema(&base)
            .add_message_definition(MessageTypeBuilder::new("Thing").build());
        assert!(matches!(
            builder.build(),
            Err(SchemaError::Conflict { .. })
        ));
    }

    #[test]
    fn test_unnamed_types_do_not_build() {
        let mut builder = SchemaBuilder::new();
        builder
            .set_name("anon.proto")
            .add_message_definition(MessageTypeBuilder::new("").build());
        assert!(matches!(builder.build(), Err(SchemaError::Validation(_))));

        let mut builder = SchemaBuilder::new();
        builder
            .set_name("anon.proto")
            .add_enum_definition(EnumTypeBuilder::new("").build());
        assert!(matches!(builder.build(), Err(SchemaError::Validation(_))));
    }

    #[test]
    fn test_build_is_repeatable() {
        let status = EnumTypeBuilder::new("Status")
            .add_value("ON", 0)
            .expect("valid")
            .build();
        let mut builder = SchemaBuilder::new();
        builder.set_name("s.proto").add_enum_definition(status);
        let first = builder.build().expect("first build");
        let second = builder.build().expect("second build");
        assert_eq!(first, second);
        assert_eq!(first.to_bytes(), second.to_bytes());
    }
}
