//! Binary decoder
//!
//! The inverse of [`crate::writer`]: rebuilds a [`Record`] from the wire
//! encoding. Repeated scalars are accepted packed or unpacked, a singular
//! field seen twice keeps the last value, and nested messages seen twice are
//! merged.

mod input;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::schema::{FieldDescriptor, FieldType, MessageDescriptor, WireType};
use crate::types::{FieldValue, Record, Value};
use input::Input;

/// Largest field number the key format allows
const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

/// Decode bytes as a message of the given type
pub fn decode(bytes: &[u8], descriptor: &'static MessageDescriptor) -> Result<Record, DecodeError> {
    decode_message(descriptor, Input::new(bytes))
}

fn decode_message(
    descriptor: &'static MessageDescriptor,
    input: Input<'_>,
) -> Result<Record, DecodeError> {
    let mut record = Record::new(descriptor);
    let mut input = input;

    while !input.eos() {
        let key_at = input;
        let (key, rest) = input.varint()?;
        let wire = WireType::from_u8((key & 0x7) as u8)
            .ok_or_else(|| key_at.error(DecodeErrorKind::InvalidWireType((key & 0x7) as u8)))?;
        let number = key >> 3;
        if number == 0 || number > MAX_FIELD_NUMBER {
            return Err(key_at.error(DecodeErrorKind::InvalidFieldNumber(number)));
        }
        let number = number as u32;
        let field = descriptor.field_by_number(number).ok_or_else(|| {
            key_at.error(DecodeErrorKind::UnknownField {
                message: descriptor.name,
                number,
            })
        })?;

        if field.is_repeated() && field.ty.is_packable() && wire == WireType::LengthDelimited {
            let (mut run, rest) = rest.delimited()?;
            while !run.eos() {
                let (value, next) = decode_payload(field, run)?;
                record.push(number, value);
                run = next;
            }
            input = rest;
            continue;
        }

        let expected = field.ty.wire_type();
        if wire != expected {
            return Err(key_at.error(DecodeErrorKind::WireTypeMismatch {
                field: field.name,
                expected,
                found: wire,
            }));
        }

        let (value, rest) = decode_payload(field, rest)?;
        store(&mut record, field, value);
        input = rest;
    }

    Ok(record)
}

fn store(record: &mut Record, field: &'static FieldDescriptor, value: Value) {
    if field.is_repeated() {
        record.push(field.number, value);
        return;
    }
    let value = match value {
        Value::Message(incoming) => {
            if let Some(FieldValue::Single(Value::Message(existing))) =
                record.get_mut(field.number)
            {
                merge(existing, incoming);
                return;
            }
            Value::Message(incoming)
        }
        value => value,
    };
    record.insert(field.number, FieldValue::Single(value));
}

/// Fold `from` into `into` field by field
fn merge(into: &mut Record, from: Record) {
    let descriptor = from.descriptor();
    for (number, value) in from.into_fields() {
        let Some(field) = descriptor.field_by_number(number) else {
            continue;
        };
        match value {
            FieldValue::Single(v) => store(into, field, v),
            FieldValue::Repeated(items) => {
                for item in items {
                    into.push(number, item);
                }
            }
        }
    }
}

/// Decode one value (without its key)
fn decode_payload<'a>(
    field: &'static FieldDescriptor,
    input: Input<'a>,
) -> Result<(Value, Input<'a>), DecodeError> {
    let at = input;
    match field.ty {
        FieldType::Int32 => input.varint().map(|(v, rest)| (Value::I32(v as i32), rest)),
        FieldType::Int64 => input.varint().map(|(v, rest)| (Value::I64(v as i64), rest)),
        FieldType::UInt32 => input.varint().map(|(v, rest)| (Value::U32(v as u32), rest)),
        FieldType::UInt64 => input.varint().map(|(v, rest)| (Value::U64(v), rest)),
        FieldType::SInt32 => input.varint().map(|(v, rest)| {
            let n = v as u32;
            (Value::I32(((n >> 1) as i32) ^ -((n & 1) as i32)), rest)
        }),
        FieldType::SInt64 => input
            .varint()
            .map(|(v, rest)| (Value::I64(((v >> 1) as i64) ^ -((v & 1) as i64)), rest)),
        FieldType::Bool => input.varint().map(|(v, rest)| (Value::Bool(v != 0), rest)),
        FieldType::Enum(desc) => {
            let (v, rest) = input.varint()?;
            let n = v as i32;
            if desc.name_of(n).is_none() {
                return Err(at.error(DecodeErrorKind::UnknownEnumValue {
                    field: field.name,
                    value: n,
                }));
            }
            Ok((Value::Enum(n), rest))
        }
        FieldType::Fixed32 => input
            .fixed32()
            .map(|(b, rest)| (Value::U32(u32::from_le_bytes(b)), rest)),
        FieldType::SFixed32 => input
            .fixed32()
            .map(|(b, rest)| (Value::I32(i32::from_le_bytes(b)), rest)),
        FieldType::Float => input
            .fixed32()
            .map(|(b, rest)| (Value::F32(f32::from_le_bytes(b)), rest)),
        FieldType::Fixed64 => input
            .fixed64()
            .map(|(b, rest)| (Value::U64(u64::from_le_bytes(b)), rest)),
        FieldType::SFixed64 => input
            .fixed64()
            .map(|(b, rest)| (Value::I64(i64::from_le_bytes(b)), rest)),
        FieldType::Double => input
            .fixed64()
            .map(|(b, rest)| (Value::F64(f64::from_le_bytes(b)), rest)),
        FieldType::String => {
            let (inner, rest) = input.delimited()?;
            let s = std::str::from_utf8(inner.bytes()).map_err(|_| {
                inner.error(DecodeErrorKind::InvalidUtf8 { field: field.name })
            })?;
            Ok((Value::String(s.to_string()), rest))
        }
        FieldType::Bytes => {
            let (inner, rest) = input.delimited()?;
            Ok((Value::Bytes(inner.bytes().to_vec()), rest))
        }
        FieldType::Message(desc) => {
            let (inner, rest) = input.delimited()?;
            let record = decode_message(desc, inner)?;
            Ok((Value::Message(record), rest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::job::{GRAYFILTER_PARAMETERS, JOB_PARAMETERS, MULTI_INDEX, POINT};
    use crate::writer;

    #[test]
    fn test_roundtrip_scalars() {
        let mut record = Record::new(&JOB_PARAMETERS);
        record.set("layout", Value::Enum(2));
        record.set("start_sheet", -3);
        record.set("black_threshold", 0.33f32);
        record.set("overwrite", true);
        record.set("dpi", 600u32);
        record.set("post_rotate", -90);
        record.set("background_color", 0x00ff_ffffu32);
        record.set("output_pixel_format", "gray8");

        let bytes = writer::to_bytes(&record).unwrap();
        assert_eq!(decode(&bytes, &JOB_PARAMETERS).unwrap(), record);
    }

    #[test]
    fn test_roundtrip_nested_and_repeated() {
        let mut gray = Record::new(&GRAYFILTER_PARAMETERS);
        gray.set("threshold", 0.5f32);
        let mut index = Record::new(&MULTI_INDEX);
        for i in [1, 5, -1] {
            index.push(1, Value::I32(i));
        }
        let mut record = Record::new(&JOB_PARAMETERS);
        record.set("grayfilter", gray);
        record.set("sheet_multi_index", index);
        for x in 0..3 {
            let mut point = Record::new(&POINT);
            point.set("x", x);
            record.push(24, Value::Message(point));
        }

        let bytes = writer::to_bytes(&record).unwrap();
        assert_eq!(decode(&bytes, &JOB_PARAMETERS).unwrap(), record);
    }

    #[test]
    fn test_unpacked_repeated_accepted() {
        // index: 1, index: 2 written as two varint fields
        let bytes = [0x08, 0x01, 0x08, 0x02];
        let record = decode(&bytes, &MULTI_INDEX).unwrap();
        assert_eq!(
            record.get(1).and_then(FieldValue::as_repeated).unwrap(),
            &[Value::I32(1), Value::I32(2)]
        );
    }

    #[test]
    fn test_last_singular_value_wins() {
        let bytes = [0x08, 0x01, 0x08, 0x02];
        let record = decode(&bytes, &POINT).unwrap();
        assert_eq!(record.path("x"), Some(&Value::I32(2)));
    }

    #[test]
    fn test_nested_messages_merge() {
        // grayfilter { threshold: 0.5 } then grayfilter { scan_size { horizontal: 2 } }
        let bytes = [
            0x92, 0x01, 0x05, 0x1d, 0x00, 0x00, 0x00, 0x3f, //
            0x92, 0x01, 0x04, 0x0a, 0x02, 0x08, 0x02,
        ];
        let record = decode(&bytes, &JOB_PARAMETERS).unwrap();
        assert_eq!(record.path("grayfilter.threshold"), Some(&Value::F32(0.5)));
        assert_eq!(
            record.path("grayfilter.scan_size.horizontal"),
            Some(&Value::U32(2))
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(decode(&[], &JOB_PARAMETERS).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_nested() {
        let err = decode(&[0x92, 0x01, 0x05, 0x1d], &JOB_PARAMETERS).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Truncated);
    }

    #[test]
    fn test_wire_type_mismatch() {
        // field 1 (x: int32) sent as fixed32
        let err = decode(&[0x0d, 0, 0, 0, 0], &POINT).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::WireTypeMismatch {
                field: "x",
                expected: WireType::Varint,
                found: WireType::Fixed32,
            }
        );
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_invalid_keys() {
        let err = decode(&[0x0b], &POINT).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::InvalidWireType(3));
        let err = decode(&[0x00], &POINT).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::InvalidFieldNumber(0));
        let err = decode(&[0x18, 0x01], &POINT).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::UnknownField {
                message: "Point",
                number: 3
            }
        );
    }

    #[test]
    fn test_invalid_utf8() {
        // output_pixel_format: "\xff"
        let err = decode(&[0x82, 0x02, 0x01, 0xff], &JOB_PARAMETERS).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::InvalidUtf8 {
                field: "output_pixel_format"
            }
        );
    }

    #[test]
    fn test_unknown_enum_value() {
        let err = decode(&[0x08, 0x07], &JOB_PARAMETERS).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::UnknownEnumValue {
                field: "layout",
                value: 7
            }
        );
        assert_eq!(err.offset, 1);
    }
}
