//! Field values

use super::Record;
use crate::schema::FieldType;

/// A single typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    /// int32, sint32 and sfixed32
    I32(i32),
    /// int64, sint64 and sfixed64
    I64(i64),
    /// uint32 and fixed32
    U32(u32),
    /// uint64 and fixed64
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Enum value by number
    Enum(i32),
    Message(Record),
}

impl Value {
    /// Whether this value can be stored in a field of the given type
    pub fn matches(&self, ty: &FieldType) -> bool {
        match (self, ty) {
            (Value::Bool(_), FieldType::Bool) => true,
            (Value::I32(_), FieldType::Int32 | FieldType::SInt32 | FieldType::SFixed32) => true,
            (Value::I64(_), FieldType::Int64 | FieldType::SInt64 | FieldType::SFixed64) => true,
            (Value::U32(_), FieldType::UInt32 | FieldType::Fixed32) => true,
            (Value::U64(_), FieldType::UInt64 | FieldType::Fixed64) => true,
            (Value::F32(_), FieldType::Float) => true,
            (Value::F64(_), FieldType::Double) => true,
            (Value::String(_), FieldType::String) => true,
            (Value::Bytes(_), FieldType::Bytes) => true,
            (Value::Enum(_), FieldType::Enum(_)) => true,
            (Value::Message(record), FieldType::Message(desc)) => {
                std::ptr::eq(record.descriptor(), *desc)
            }
            _ => false,
        }
    }

    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Enum(_) => "enum",
            Value::Message(_) => "message",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any signed or unsigned integer that fits in an i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I32(v) | Value::Enum(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            Value::U32(v) => Some(i64::from(*v)),
            Value::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Record> {
        match self {
            Value::Message(r) => Some(r),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Message(v)
    }
}

/// Contents of a field: one value, or the ordered values of a repeated field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Single(Value),
    Repeated(Vec<Value>),
}

impl FieldValue {
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            FieldValue::Single(v) => Some(v),
            FieldValue::Repeated(_) => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&[Value]> {
        match self {
            FieldValue::Single(_) => None,
            FieldValue::Repeated(items) => Some(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::job::{JOB_PARAMETERS, POINT};

    #[test]
    fn test_matches_field_types() {
        assert!(Value::I32(-1).matches(&FieldType::SInt32));
        assert!(Value::U32(7).matches(&FieldType::Fixed32));
        assert!(!Value::U32(7).matches(&FieldType::Int32));
        assert!(!Value::F64(1.0).matches(&FieldType::Float));
        assert!(Value::Enum(2).matches(&FieldType::Enum(&crate::schema::job::LAYOUT)));
    }

    #[test]
    fn test_message_matches_only_its_descriptor() {
        let point = Value::Message(Record::new(&POINT));
        assert!(point.matches(&FieldType::Message(&POINT)));
        assert!(!point.matches(&FieldType::Message(&JOB_PARAMETERS)));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::U64(u64::MAX).as_i64(), None);
        assert_eq!(Value::U32(300).as_i64(), Some(300));
        assert_eq!(Value::F32(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::from("abc").as_bytes(), Some(&b"abc"[..]));
        assert_eq!(Value::Bool(true).as_str(), None);
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert_eq!(Value::I32(1).as_bool(), None);
    }
}
