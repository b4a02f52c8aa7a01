// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protobuf text format rendering of dynamic messages.

use super::{DynamicMessage, Value};
use std::fmt::{self, Write};

impl fmt::Display for DynamicMessage {
    /// Present fields in field-number order, one `name: value` per line and
    /// nested messages as indented `name { ... }` blocks.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fields(f, self, 0)
    }
}

fn write_fields<W: Write>(out: &mut W, message: &DynamicMessage, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    for (field, value) in message.fields() {
        match value {
            Value::List(items) => {
                for item in items {
                    write_entry(out, &pad, field.name(), item, depth)?;
                }
            }
            single => write_entry(out, &pad, field.name(), single, depth)?,
        }
    }
    Ok(())
}

fn write_entry<W: Write>(
    out: &mut W,
    pad: &str,
    name: &str,
    value: &Value,
    depth: usize,
) -> fmt::Result {
    if let Value::Message(nested) = value {
        writeln!(out, "{}{} {{", pad, name)?;
        write_fields(out, nested, depth + 1)?;
        return writeln!(out, "{}}}", pad);
    }

    write!(out, "{}{}: ", pad, name)?;
    match value {
        Value::Bool(v) => write!(out, "{}", v)?,
        Value::I32(v) => write!(out, "{}", v)?,
        Value::I64(v) => write!(out, "{}", v)?,
        Value::U32(v) => write!(out, "{}", v)?,
        Value::U64(v) => write!(out, "{}", v)?,
        Value::F32(v) => write_float(out, f64::from(*v), v)?,
        Value::F64(v) => write_float(out, *v, v)?,
        Value::String(v) => write!(out, "\"{}\"", escape_bytes(v.as_bytes()))?,
        Value::Bytes(v) => write!(out, "\"{}\"", escape_bytes(v))?,
        Value::Enum(v) => write!(out, "{}", v.name())?,
        Value::Message(_) | Value::List(_) => {}
    }
    writeln!(out)
}

fn write_float<W: Write>(out: &mut W, probe: f64, value: &dyn fmt::Debug) -> fmt::Result {
    if probe.is_nan() {
        out.write_str("nan")
    } else if probe.is_infinite() {
        out.write_str(if probe > 0.0 { "inf" } else { "-inf" })
    } else {
        write!(out, "{:?}", value)
    }
}

/// C-style escaping as used by text format and descriptor defaults.
///
/// Printable ASCII passes through; quotes, backslash and common control
/// characters get their short escapes; everything else becomes `\NNN` octal.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'"' => out.push_str("\\\""),
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
    }
    out
}

/// Inverse of [`escape_bytes`]; also accepts `\xHH` and short octal forms.
pub fn unescape_bytes(text: &str) -> Result<Vec<u8>, String> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let escape = *bytes
            .get(i + 1)
            .ok_or_else(|| "dangling backslash".to_string())?;
        i += 2;
        match escape {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'\\' | b'\'' | b'"' | b'?' => out.push(escape),
            b'x' | b'X' => {
                let digits = take_while(bytes, i, 2, |b| b.is_ascii_hexdigit());
                if digits == 0 {
                    return Err("\\x without hex digits".to_string());
                }
                out.push(parse_radix(&bytes[i..i + digits], 16)?);
                i += digits;
            }
            b'0'..=b'7' => {
                let start = i - 1;
                let digits = 1 + take_while(bytes, i, 2, |b| (b'0'..=b'7').contains(&b));
                out.push(parse_radix(&bytes[start..start + digits], 8)?);
                i = start + digits;
            }
            other => return Err(format!("unknown escape \\{}", other as char)),
        }
    }
    Ok(out)
}

fn take_while(bytes: &[u8], from: usize, max: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes[from.min(bytes.len())..]
        .iter()
        .take(max)
        .take_while(|&&b| pred(b))
        .count()
}

fn parse_radix(digits: &[u8], radix: u32) -> Result<u8, String> {
    let text = std::str::from_utf8(digits).map_err(|e| e.to_string())?;
    u8::from_str_radix(text, radix).map_err(|_| format!("escape \\{} out of range", text))
}
