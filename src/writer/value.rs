//! Field and value serialization

use super::varint::{put_varint, varint_len, zigzag32, zigzag64};
use crate::schema::{FieldDescriptor, FieldType, WireType};
use crate::types::{FieldValue, Record, Value};

/// Append a field key
pub fn put_tag(buf: &mut Vec<u8>, number: u32, wire_type: WireType) {
    put_varint(buf, (u64::from(number) << 3) | wire_type as u64);
}

fn tag_len(number: u32) -> usize {
    varint_len(u64::from(number) << 3)
}

/// Append one value without its key. Values must already match `ty`.
pub fn put_payload(buf: &mut Vec<u8>, ty: &FieldType, value: &Value) {
    match value {
        Value::Bool(b) => put_varint(buf, u64::from(*b)),
        Value::I32(v) => match ty {
            FieldType::SInt32 => put_varint(buf, u64::from(zigzag32(*v))),
            FieldType::SFixed32 => buf.extend_from_slice(&v.to_le_bytes()),
            // Negative int32 is sign-extended to 64 bits
            _ => put_varint(buf, i64::from(*v) as u64),
        },
        Value::I64(v) => match ty {
            FieldType::SInt64 => put_varint(buf, zigzag64(*v)),
            FieldType::SFixed64 => buf.extend_from_slice(&v.to_le_bytes()),
            _ => put_varint(buf, *v as u64),
        },
        Value::U32(v) => match ty {
            FieldType::Fixed32 => buf.extend_from_slice(&v.to_le_bytes()),
            _ => put_varint(buf, u64::from(*v)),
        },
        Value::U64(v) => match ty {
            FieldType::Fixed64 => buf.extend_from_slice(&v.to_le_bytes()),
            _ => put_varint(buf, *v),
        },
        Value::F32(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::F64(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::String(s) => {
            put_varint(buf, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Bytes(b) => {
            put_varint(buf, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Value::Enum(v) => put_varint(buf, i64::from(*v) as u64),
        Value::Message(record) => {
            put_varint(buf, record_len(record) as u64);
            put_record(buf, record);
        }
    }
}

/// Encoded length of one value without its key
pub fn payload_len(ty: &FieldType, value: &Value) -> usize {
    match value {
        Value::Bool(_) => 1,
        Value::I32(v) => match ty {
            FieldType::SInt32 => varint_len(u64::from(zigzag32(*v))),
            FieldType::SFixed32 => 4,
            _ => varint_len(i64::from(*v) as u64),
        },
        Value::I64(v) => match ty {
            FieldType::SInt64 => varint_len(zigzag64(*v)),
            FieldType::SFixed64 => 8,
            _ => varint_len(*v as u64),
        },
        Value::U32(v) => match ty {
            FieldType::Fixed32 => 4,
            _ => varint_len(u64::from(*v)),
        },
        Value::U64(v) => match ty {
            FieldType::Fixed64 => 8,
            _ => varint_len(*v),
        },
        Value::F32(_) => 4,
        Value::F64(_) => 8,
        Value::String(s) => varint_len(s.len() as u64) + s.len(),
        Value::Bytes(b) => varint_len(b.len() as u64) + b.len(),
        Value::Enum(v) => varint_len(i64::from(*v) as u64),
        Value::Message(record) => {
            let len = record_len(record);
            varint_len(len as u64) + len
        }
    }
}

fn packed_len(ty: &FieldType, items: &[Value]) -> usize {
    items.iter().map(|v| payload_len(ty, v)).sum()
}

/// Append every value stored in a field, keys included
pub fn put_field(buf: &mut Vec<u8>, field: &FieldDescriptor, value: &FieldValue) {
    match value {
        FieldValue::Single(v) => {
            put_tag(buf, field.number, field.ty.wire_type());
            put_payload(buf, &field.ty, v);
        }
        FieldValue::Repeated(items) if field.is_packed() => {
            if items.is_empty() {
                return;
            }
            put_tag(buf, field.number, WireType::LengthDelimited);
            put_varint(buf, packed_len(&field.ty, items) as u64);
            for item in items {
                put_payload(buf, &field.ty, item);
            }
        }
        FieldValue::Repeated(items) => {
            for item in items {
                put_tag(buf, field.number, field.ty.wire_type());
                put_payload(buf, &field.ty, item);
            }
        }
    }
}

pub fn field_len(field: &FieldDescriptor, value: &FieldValue) -> usize {
    match value {
        FieldValue::Single(v) => tag_len(field.number) + payload_len(&field.ty, v),
        FieldValue::Repeated(items) if field.is_packed() => {
            if items.is_empty() {
                return 0;
            }
            let len = packed_len(&field.ty, items);
            tag_len(field.number) + varint_len(len as u64) + len
        }
        FieldValue::Repeated(items) => items
            .iter()
            .map(|item| tag_len(field.number) + payload_len(&field.ty, item))
            .sum(),
    }
}

/// Append the fields of a record in field-number order
pub fn put_record(buf: &mut Vec<u8>, record: &Record) {
    let descriptor = record.descriptor();
    for (number, value) in record.fields() {
        if let Some(field) = descriptor.field_by_number(number) {
            put_field(buf, field, value);
        }
    }
}

/// Encoded length of a record's fields
pub fn record_len(record: &Record) -> usize {
    let descriptor = record.descriptor();
    record
        .fields()
        .filter_map(|(number, value)| {
            descriptor
                .field_by_number(number)
                .map(|field| field_len(field, value))
        })
        .sum()
}
