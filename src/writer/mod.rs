//! Binary serialization of records
//!
//! Produces the canonical wire encoding: fields in ascending field-number
//! order, varint and zigzag integers, little-endian fixed-width numbers,
//! and length-prefixed strings, bytes and nested messages.

mod value;
mod varint;

use crate::error::EncodeError;
use crate::schema::{FieldType, Label};
use crate::types::{FieldValue, Record, Value};
use log::debug;
use std::io::{self, Write};

use value::{put_record, record_len};

/// Check that a record can be encoded: required fields are set and every
/// value agrees with its field's declared type and cardinality.
pub fn validate(record: &Record) -> Result<(), EncodeError> {
    validate_at(record, "")
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn validate_at(record: &Record, prefix: &str) -> Result<(), EncodeError> {
    let descriptor = record.descriptor();

    for field in descriptor.fields {
        if field.label == Label::Required && !record.contains(field.number) {
            return Err(EncodeError::MissingRequired {
                path: join(prefix, field.name),
            });
        }
    }

    for (number, value) in record.fields() {
        let field = descriptor
            .field_by_number(number)
            .ok_or(EncodeError::UnknownField {
                message: descriptor.name,
                number,
            })?;
        let path = join(prefix, field.name);

        match (value, field.is_repeated()) {
            (FieldValue::Single(v), false) => validate_value(&field.ty, v, &path)?,
            (FieldValue::Repeated(items), true) => {
                for (i, v) in items.iter().enumerate() {
                    validate_value(&field.ty, v, &format!("{}[{}]", path, i))?;
                }
            }
            (FieldValue::Single(_), true) => return Err(EncodeError::ExpectedList { path }),
            (FieldValue::Repeated(_), false) => return Err(EncodeError::UnexpectedList { path }),
        }
    }

    Ok(())
}

fn validate_value(ty: &FieldType, value: &Value, path: &str) -> Result<(), EncodeError> {
    if !value.matches(ty) {
        return Err(EncodeError::TypeMismatch {
            path: path.to_string(),
            expected: ty.name(),
            actual: value.kind(),
        });
    }
    match (ty, value) {
        (FieldType::Enum(desc), Value::Enum(n)) if desc.name_of(*n).is_none() => {
            Err(EncodeError::UnknownEnumValue {
                path: path.to_string(),
                value: *n,
            })
        }
        (_, Value::Message(nested)) => validate_at(nested, path),
        _ => Ok(()),
    }
}

/// Encode a record to bytes
pub fn to_bytes(record: &Record) -> Result<Vec<u8>, EncodeError> {
    validate(record)?;
    let mut buf = Vec::with_capacity(record_len(record));
    put_record(&mut buf, record);
    debug!(
        "encoded {} into {} bytes",
        record.descriptor().name,
        buf.len()
    );
    Ok(buf)
}

/// Encode a record into a writer
pub fn write<W: Write>(writer: &mut W, record: &Record) -> io::Result<()> {
    let bytes =
        to_bytes(record).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    writer.write_all(&bytes)
}
