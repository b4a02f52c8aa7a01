// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Textual rendering of a [`ResolvedSchema`].

use super::pool::{FieldKindIndex, PoolInner};
use super::ResolvedSchema;
use std::fmt::{self, Write};

const INDENT: &str = "  ";

impl fmt::Display for ResolvedSchema {
    /// Lists the qualified type names, then every descriptor record in a
    /// proto2-like syntax with absolute references.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = &self.inner;
        writeln!(
            f,
            "types: [{}]",
            self.message_type_names().collect::<Vec<_>>().join(", ")
        )?;
        writeln!(
            f,
            "enums: [{}]",
            self.enum_type_names().collect::<Vec<_>>().join(", ")
        )?;

        for file in &inner.files {
            writeln!(f, "// {}", file.name)?;
            if !file.package.is_empty() {
                writeln!(f, "package {};", file.package)?;
            }
            for dependency in &file.dependencies {
                writeln!(f, "import \"{}\";", dependency)?;
            }
            for &index in &file.messages {
                write_message(f, inner, index, 0)?;
            }
            for &index in &file.enums {
                write_enum(f, inner, index, 0)?;
            }
        }
        Ok(())
    }
}

fn write_message<W: Write>(
    out: &mut W,
    inner: &PoolInner,
    index: usize,
    depth: usize,
) -> fmt::Result {
    let message = &inner.messages[index];
    let pad = INDENT.repeat(depth);
    writeln!(out, "{}message {} {{", pad, message.name)?;

    for field in &message.fields {
        let type_name = match field.kind {
            FieldKindIndex::Scalar(kind) => kind.keyword().to_string(),
            FieldKindIndex::Message(target) => format!(".{}", inner.messages[target].full_name),
            FieldKindIndex::Enum(target) => format!(".{}", inner.enums[target].full_name),
        };
        write!(
            out,
            "{}{}{} {} {} = {}",
            pad,
            INDENT,
            field.label,
            type_name,
            field.name,
            field.number
        )?;
        if let Some(default) = &field.default_literal {
            write!(out, " [default = {}]", default)?;
        }
        writeln!(out, ";")?;
    }
    for &nested in &message.nested_enums {
        write_enum(out, inner, nested, depth + 1)?;
    }
    for &nested in &message.nested_messages {
        write_message(out, inner, nested, depth + 1)?;
    }

    writeln!(out, "{}}}", pad)
}

fn write_enum<W: Write>(
    out: &mut W,
    inner: &PoolInner,
    index: usize,
    depth: usize,
) -> fmt::Result {
    let entry = &inner.enums[index];
    let pad = INDENT.repeat(depth);
    writeln!(out, "{}enum {} {{", pad, entry.name)?;
    for value in &entry.values {
        writeln!(out, "{}{}{} = {};", pad, INDENT, value.name, value.number)?;
    }
    writeln!(out, "{}}}", pad)
}

#[cfg(test)]
mod tests {
    use crate::definition::{EnumTypeBuilder, MessageTypeBuilder};
    use crate::SchemaBuilder;

    #[test]
    fn test_render_layout() {
        let level = EnumTypeBuilder::new("Level")
            .add_value("LOW", 0)
            .and_then(|b| b.add_value("HIGH", 1))
            .expect("valid enum")
            .build();
        let task = MessageTypeBuilder::new("Task")
            .add_enum_definition(level)
            .and_then(|b| b.add_field("required", "string", "title", 1))
            .and_then(|b| b.add_field_with_default("optional", "Level", "level", 2, "HIGH"))
            .expect("valid message")
            .build();

        let mut builder = SchemaBuilder::new();
        builder
            .set_name("task.proto")
            .set_package("todo")
            .add_message_definition(task);
        let schema = builder.build().expect("schema builds");

        let expected = "\
types: [todo.Task]
enums: [todo.Task.Level]
// task.proto
package todo;
message Task {
  required string title = 1;
  optional .todo.Task.Level level = 2 [default = HIGH];
  enum Level {
    LOW = 0;
    HIGH = 1;
  }
}
";
        assert_eq!(schema.to_string(), expected);
    }
}
