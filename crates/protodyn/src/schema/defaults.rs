// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared default parsing and zero values.

use crate::definition::ScalarKind;
use crate::dynamic::{unescape_bytes, Value};
use std::str::FromStr;

/// Zero value of a scalar kind.
pub(crate) fn zero_value(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Double => Value::F64(0.0),
        ScalarKind::Float => Value::F32(0.0),
        ScalarKind::Int32 | ScalarKind::SInt32 | ScalarKind::SFixed32 => Value::I32(0),
        ScalarKind::Int64 | ScalarKind::SInt64 | ScalarKind::SFixed64 => Value::I64(0),
        ScalarKind::UInt32 | ScalarKind::Fixed32 => Value::U32(0),
        ScalarKind::UInt64 | ScalarKind::Fixed64 => Value::U64(0),
        ScalarKind::Bool => Value::Bool(false),
        ScalarKind::String => Value::String(String::new()),
        ScalarKind::Bytes => Value::Bytes(Vec::new()),
    }
}

/// Parse declared default text for a scalar kind.
///
/// Follows the descriptor conventions: decimal integers (a `0x` prefix is
/// accepted), `inf`/`-inf`/`nan` for floating kinds, `true`/`false`, raw text
/// for strings and C-escaped text for bytes.
pub(crate) fn parse_scalar_default(kind: ScalarKind, text: &str) -> Result<Value, String> {
    match kind {
        ScalarKind::Double => parse_float::<f64>(text).map(Value::F64),
        ScalarKind::Float => parse_float::<f32>(text).map(Value::F32),
        ScalarKind::Int32 | ScalarKind::SInt32 | ScalarKind::SFixed32 => {
            parse_integer(text).and_then(narrow::<i32>).map(Value::I32)
        }
        ScalarKind::Int64 | ScalarKind::SInt64 | ScalarKind::SFixed64 => {
            parse_integer(text).and_then(narrow::<i64>).map(Value::I64)
        }
        ScalarKind::UInt32 | ScalarKind::Fixed32 => {
            parse_integer(text).and_then(narrow::<u32>).map(Value::U32)
        }
        ScalarKind::UInt64 | ScalarKind::Fixed64 => {
            parse_integer(text).and_then(narrow::<u64>).map(Value::U64)
        }
        ScalarKind::Bool => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err("expected true or false".to_string()),
        },
        ScalarKind::String => Ok(Value::String(text.to_string())),
        ScalarKind::Bytes => unescape_bytes(text).map(Value::Bytes),
    }
}

fn parse_float<T>(text: &str) -> Result<T, String>
where
    T: FromStr,
{
    // Accepts inf, -inf and nan spellings as well as plain decimals.
    text.parse::<T>()
        .map_err(|_| "not a floating point number".to_string())
}

fn parse_integer(text: &str) -> Result<i128, String> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    // The radix parsers accept their own sign; only one leading '-' is valid.
    if digits.starts_with(['+', '-']) {
        return Err("not an integer".to_string());
    }
    let hex = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"));
    if hex.is_some_and(|hex| hex.starts_with(['+', '-'])) {
        return Err("not an integer".to_string());
    }
    let magnitude = match hex {
        Some(hex) => u128::from_str_radix(hex, 16),
        None => digits.parse::<u128>(),
    }
    .map_err(|_| "not an integer".to_string())?;
    let value = if negative {
        0i128.checked_sub_unsigned(magnitude)
    } else {
        i128::try_from(magnitude).ok()
    };
    value.ok_or_else(|| format!("{} out of range", text))
}

fn narrow<T>(value: i128) -> Result<T, String>
where
    T: TryFrom<i128>,
{
    T::try_from(value).map_err(|_| format!("{} out of range", value))
}
