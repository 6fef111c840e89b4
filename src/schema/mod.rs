//! Message descriptors
//!
//! A descriptor names the fields of a message, their numbers, types and
//! cardinality. Both the text parser and the binary writer/reader are driven
//! entirely by descriptors, so the same pipeline works for any message set
//! declared as `static` items.

pub mod job;

/// Wire types of the binary encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }
}

/// Field cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

/// Declared type of a field
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
    Enum(&'static EnumDescriptor),
    Message(&'static MessageDescriptor),
}

impl FieldType {
    /// Wire type used for a single, unpacked value of this type
    pub fn wire_type(&self) -> WireType {
        match self {
            FieldType::Int32
            | FieldType::Int64
            | FieldType::UInt32
            | FieldType::UInt64
            | FieldType::SInt32
            | FieldType::SInt64
            | FieldType::Bool
            | FieldType::Enum(_) => WireType::Varint,
            FieldType::Fixed64 | FieldType::SFixed64 | FieldType::Double => WireType::Fixed64,
            FieldType::Fixed32 | FieldType::SFixed32 | FieldType::Float => WireType::Fixed32,
            FieldType::String | FieldType::Bytes | FieldType::Message(_) => {
                WireType::LengthDelimited
            }
        }
    }

    /// Whether repeated values of this type may be packed
    pub fn is_packable(&self) -> bool {
        self.wire_type() != WireType::LengthDelimited
    }

    /// Type name as written in a schema declaration
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::UInt32 => "uint32",
            FieldType::UInt64 => "uint64",
            FieldType::SInt32 => "sint32",
            FieldType::SInt64 => "sint64",
            FieldType::Fixed32 => "fixed32",
            FieldType::Fixed64 => "fixed64",
            FieldType::SFixed32 => "sfixed32",
            FieldType::SFixed64 => "sfixed64",
            FieldType::Bool => "bool",
            FieldType::String => "string",
            FieldType::Bytes => "bytes",
            FieldType::Enum(e) => e.name,
            FieldType::Message(m) => m.name,
        }
    }
}

/// A single field of a message
#[derive(Debug)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub number: u32,
    pub label: Label,
    pub ty: FieldType,
    /// Repeated scalars are written as one length-delimited run
    pub packed: bool,
}

impl FieldDescriptor {
    pub const fn optional(name: &'static str, number: u32, ty: FieldType) -> Self {
        FieldDescriptor {
            name,
            number,
            label: Label::Optional,
            ty,
            packed: false,
        }
    }

    pub const fn required(name: &'static str, number: u32, ty: FieldType) -> Self {
        FieldDescriptor {
            name,
            number,
            label: Label::Required,
            ty,
            packed: false,
        }
    }

    pub const fn repeated(name: &'static str, number: u32, ty: FieldType) -> Self {
        FieldDescriptor {
            name,
            number,
            label: Label::Repeated,
            ty,
            packed: false,
        }
    }

    pub const fn packed(name: &'static str, number: u32, ty: FieldType) -> Self {
        FieldDescriptor {
            name,
            number,
            label: Label::Repeated,
            ty,
            packed: true,
        }
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    pub fn is_packed(&self) -> bool {
        self.packed && self.is_repeated() && self.ty.is_packable()
    }
}

/// A message type: an ordered set of fields
#[derive(Debug)]
pub struct MessageDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    pub fn field_by_name(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_number(&self, number: u32) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }
}

/// An enum type: named integer constants
#[derive(Debug)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub values: &'static [(&'static str, i32)],
}

impl EnumDescriptor {
    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    pub fn name_of(&self, number: i32) -> Option<&'static str> {
        self.values.iter().find(|(_, v)| *v == number).map(|(n, _)| *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLOR: EnumDescriptor = EnumDescriptor {
        name: "Color",
        values: &[("RED", 0), ("GREEN", 1), ("BLUE", 2)],
    };

    static PIXEL: MessageDescriptor = MessageDescriptor {
        name: "Pixel",
        fields: &[
            FieldDescriptor::optional("color", 1, FieldType::Enum(&COLOR)),
            FieldDescriptor::packed("weights", 4, FieldType::Float),
            FieldDescriptor::packed("tags", 5, FieldType::String),
        ],
    };

    #[test]
    fn test_field_lookup() {
        assert_eq!(PIXEL.field_by_name("weights").unwrap().number, 4);
        assert_eq!(PIXEL.field_by_number(1).unwrap().name, "color");
        assert!(PIXEL.field_by_name("missing").is_none());
        assert!(PIXEL.field_by_number(2).is_none());
    }

    #[test]
    fn test_enum_lookup() {
        assert_eq!(COLOR.number_of("BLUE"), Some(2));
        assert_eq!(COLOR.name_of(1), Some("GREEN"));
        assert_eq!(COLOR.number_of("PURPLE"), None);
    }

    #[test]
    fn test_packed_only_for_scalars() {
        assert!(PIXEL.field_by_name("weights").unwrap().is_packed());
        // Strings are length-delimited and never packed
        assert!(!PIXEL.field_by_name("tags").unwrap().is_packed());
    }

    #[test]
    fn test_wire_types() {
        assert_eq!(FieldType::SInt64.wire_type(), WireType::Varint);
        assert_eq!(FieldType::Double.wire_type(), WireType::Fixed64);
        assert_eq!(FieldType::SFixed32.wire_type(), WireType::Fixed32);
        assert_eq!(FieldType::Message(&PIXEL).wire_type(), WireType::LengthDelimited);
        assert_eq!(WireType::from_u8(3), None);
    }
}
