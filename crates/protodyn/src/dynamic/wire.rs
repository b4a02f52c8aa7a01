// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protobuf wire encoding of dynamic messages.
//!
//! Only field dispatch lives here; every scalar, key and length prefix goes
//! through `prost::encoding`. Repeated scalars are written unpacked and read
//! in either form.

use super::{DynamicMessage, Value};
use crate::definition::ScalarKind;
use crate::error::Result;
use crate::schema::{FieldDescriptor, Kind, MessageDescriptor};
use prost::bytes::{Buf, BufMut};
use prost::encoding::{self, DecodeContext, WireType};
use prost::DecodeError;

/// Nesting depth beyond which decoding gives up.
const RECURSION_LIMIT: usize = 100;

impl DynamicMessage {
    /// Encode present fields in field-number order.
    pub fn encode(&self, buf: &mut impl BufMut) {
        for (field, value) in self.fields() {
            match value {
                Value::List(items) => {
                    for item in items {
                        encode_value(&field, item, buf);
                    }
                }
                single => encode_value(&field, single, buf),
            }
        }
    }

    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }

    /// Decode a message of the given type.
    ///
    /// Unknown field numbers are skipped, as are enum numbers the enum does
    /// not declare. The result is not checked for required fields.
    pub fn decode(descriptor: MessageDescriptor, mut bytes: &[u8]) -> Result<Self> {
        let mut message = DynamicMessage::new(descriptor);
        merge_fields(&mut message, &mut bytes, 0)?;
        Ok(message)
    }
}

macro_rules! encode_scalar {
    ($module:ident, $tag:expr, $value:expr, $buf:expr) => {
        encoding::$module::encode($tag, $value, $buf)
    };
}

fn encode_value(field: &FieldDescriptor, value: &Value, buf: &mut impl BufMut) {
    let tag = field.number();
    match (field.kind(), value) {
        (Kind::Message(_), Value::Message(nested)) => {
            let body = nested.encode_to_vec();
            encoding::encode_key(tag, WireType::LengthDelimited, buf);
            encoding::encode_varint(body.len() as u64, buf);
            buf.put_slice(&body);
        }
        (Kind::Enum(_), Value::Enum(enum_value)) => {
            encode_scalar!(int32, tag, &enum_value.number(), buf)
        }
        (Kind::Scalar(kind), scalar) => match (kind, scalar) {
            (ScalarKind::Double, Value::F64(v)) => encode_scalar!(double, tag, v, buf),
            (ScalarKind::Float, Value::F32(v)) => encode_scalar!(float, tag, v, buf),
            (ScalarKind::Int32, Value::I32(v)) => encode_scalar!(int32, tag, v, buf),
            (ScalarKind::Int64, Value::I64(v)) => encode_scalar!(int64, tag, v, buf),
            (ScalarKind::UInt32, Value::U32(v)) => encode_scalar!(uint32, tag, v, buf),
            (ScalarKind::UInt64, Value::U64(v)) => encode_scalar!(uint64, tag, v, buf),
            (ScalarKind::SInt32, Value::I32(v)) => encode_scalar!(sint32, tag, v, buf),
            (ScalarKind::SInt64, Value::I64(v)) => encode_scalar!(sint64, tag, v, buf),
            (ScalarKind::Fixed32, Value::U32(v)) => encode_scalar!(fixed32, tag, v, buf),
            (ScalarKind::Fixed64, Value::U64(v)) => encode_scalar!(fixed64, tag, v, buf),
            (ScalarKind::SFixed32, Value::I32(v)) => encode_scalar!(sfixed32, tag, v, buf),
            (ScalarKind::SFixed64, Value::I64(v)) => encode_scalar!(sfixed64, tag, v, buf),
            (ScalarKind::Bool, Value::Bool(v)) => encode_scalar!(bool, tag, v, buf),
            (ScalarKind::String, Value::String(v)) => encode_scalar!(string, tag, v, buf),
            (ScalarKind::Bytes, Value::Bytes(v)) => encode_scalar!(bytes, tag, v, buf),
            (kind, other) => log::debug!(
                "[DynamicMessage::encode] skipping {} value for {} field {}",
                other.kind_name(),
                kind,
                field.full_name()
            ),
        },
        (_, other) => log::debug!(
            "[DynamicMessage::encode] skipping {} value for field {}",
            other.kind_name(),
            field.full_name()
        ),
    }
}

macro_rules! merge_scalar {
    (
        $module:ident, $ty:ty, $variant:ident,
        $message:expr, $field:expr, $wire_type:expr, $buf:expr, $ctx:expr
    ) => {{
        let number = $field.number();
        if $field.is_repeated() {
            let mut values: Vec<$ty> = Vec::new();
            encoding::$module::merge_repeated($wire_type, &mut values, $buf, $ctx)?;
            for value in values {
                $message.push_raw(number, Value::$variant(value));
            }
        } else {
            let mut value: $ty = Default::default();
            encoding::$module::merge($wire_type, &mut value, $buf, $ctx)?;
            $message.insert_raw(number, Value::$variant(value));
        }
    }};
}

fn merge_fields(message: &mut DynamicMessage, buf: &mut &[u8], depth: usize) -> Result<()> {
    if depth > RECURSION_LIMIT {
        return Err(DecodeError::new("recursion limit reached").into());
    }
    let ctx = DecodeContext::default();

    while buf.has_remaining() {
        let (tag, wire_type) = encoding::decode_key(buf)?;
        let Some(field) = message.descriptor().get_field(tag) else {
            encoding::skip_field(wire_type, tag, buf, ctx.clone())?;
            continue;
        };

        match field.kind() {
            Kind::Scalar(kind) => merge_scalar_field(message, &field, kind, wire_type, buf)?,
            Kind::Enum(enum_type) => {
                let mut numbers: Vec<i32> = Vec::new();
                if field.is_repeated() {
                    encoding::int32::merge_repeated(wire_type, &mut numbers, buf, ctx.clone())?;
                } else {
                    let mut number = 0;
                    encoding::int32::merge(wire_type, &mut number, buf, ctx.clone())?;
                    numbers.push(number);
                }
                for number in numbers {
                    match enum_type.get_value_by_number(number) {
                        Some(value) if field.is_repeated() => {
                            message.push_raw(tag, Value::Enum(value))
                        }
                        Some(value) => message.insert_raw(tag, Value::Enum(value)),
                        None => log::debug!(
                            "[DynamicMessage::decode] dropping unknown {} number {} in {}",
                            enum_type.full_name(),
                            number,
                            field.full_name()
                        ),
                    }
                }
            }
            Kind::Message(nested_type) => {
                encoding::check_wire_type(WireType::LengthDelimited, wire_type)?;
                let len = encoding::decode_varint(buf)?;
                if len > buf.remaining() as u64 {
                    return Err(DecodeError::new("buffer underflow").into());
                }
                let current: &[u8] = *buf;
                let (mut body, rest) = current.split_at(len as usize);
                *buf = rest;

                // A singular message seen twice merges into the first occurrence.
                let mut nested = match message.get_field(tag)? {
                    Value::Message(existing) if !field.is_repeated() => existing,
                    _ => DynamicMessage::new(nested_type),
                };
                merge_fields(&mut nested, &mut body, depth + 1)?;
                if field.is_repeated() {
                    message.push_raw(tag, Value::Message(nested));
                } else {
                    message.insert_raw(tag, Value::Message(nested));
                }
            }
        }
    }
    Ok(())
}

fn merge_scalar_field(
    message: &mut DynamicMessage,
    field: &FieldDescriptor,
    kind: ScalarKind,
    wire_type: WireType,
    buf: &mut &[u8],
) -> Result<()> {
    let ctx = DecodeContext::default();
    match kind {
        ScalarKind::Double => merge_scalar!(double, f64, F64, message, field, wire_type, buf, ctx),
        ScalarKind::Float => merge_scalar!(float, f32, F32, message, field, wire_type, buf, ctx),
        ScalarKind::Int32 => merge_scalar!(int32, i32, I32, message, field, wire_type, buf, ctx),
        ScalarKind::Int64 => merge_scalar!(int64, i64, I64, message, field, wire_type, buf, ctx),
        ScalarKind::UInt32 => merge_scalar!(uint32, u32, U32, message, field, wire_type, buf, ctx),
        ScalarKind::UInt64 => merge_scalar!(uint64, u64, U64, message, field, wire_type, buf, ctx),
        ScalarKind::SInt32 => merge_scalar!(sint32, i32, I32, message, field, wire_type, buf, ctx),
        ScalarKind::SInt64 => merge_scalar!(sint64, i64, I64, message, field, wire_type, buf, ctx),
        ScalarKind::Fixed32 => {
            merge_scalar!(fixed32, u32, U32, message, field, wire_type, buf, ctx)
        }
        ScalarKind::Fixed64 => {
            merge_scalar!(fixed64, u64, U64, message, field, wire_type, buf, ctx)
        }
        ScalarKind::SFixed32 => {
            merge_scalar!(sfixed32, i32, I32, message, field, wire_type, buf, ctx)
        }
        ScalarKind::SFixed64 => {
            merge_scalar!(sfixed64, i64, I64, message, field, wire_type, buf, ctx)
        }
        ScalarKind::Bool => merge_scalar!(bool, bool, Bool, message, field, wire_type, buf, ctx),
        ScalarKind::String => {
            merge_scalar!(string, String, String, message, field, wire_type, buf, ctx)
        }
        ScalarKind::Bytes => {
            merge_scalar!(bytes, Vec<u8>, Bytes, message, field, wire_type, buf, ctx)
        }
    }
    Ok(())
}
