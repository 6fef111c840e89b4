//! Error types for jobfig

use crate::schema::WireType;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to read a text document, with the position it happened at.
///
/// Lines and columns are 1-based; columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

/// What went wrong while parsing text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("message type \"{message}\" has no field named \"{field}\"")]
    UnknownField {
        message: &'static str,
        field: String,
    },

    #[error("message type \"{message}\" should not have multiple \"{field}\" fields")]
    DuplicateField {
        message: &'static str,
        field: &'static str,
    },

    #[error("field \"{field}\" is not repeated, list syntax is not allowed")]
    NotRepeated { field: &'static str },

    #[error("expected {expected} for field \"{field}\", found {found}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("value {value} is out of range for {ty} field \"{field}\"")]
    OutOfRange {
        field: &'static str,
        ty: &'static str,
        value: String,
    },

    #[error("invalid {expected} literal \"{text}\"")]
    InvalidNumber {
        expected: &'static str,
        text: String,
    },

    #[error("enum type \"{enum_name}\" has no value {value}")]
    UnknownEnumValue {
        enum_name: &'static str,
        value: String,
    },

    #[error("invalid escape sequence \"{0}\"")]
    InvalidEscape(String),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("value for string field \"{field}\" is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
}

/// A record that cannot be written in the binary encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("required field \"{path}\" is not set")]
    MissingRequired { path: String },

    #[error("field \"{path}\" expects a {expected} value, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field \"{path}\" is repeated, but holds a single value")]
    ExpectedList { path: String },

    #[error("field \"{path}\" is singular, but holds a list")]
    UnexpectedList { path: String },

    #[error("message type \"{message}\" has no field number {number}")]
    UnknownField { message: &'static str, number: u32 },

    #[error("enum field \"{path}\" has undeclared value {value}")]
    UnknownEnumValue { path: String, value: i32 },
}

/// Failure to read the binary encoding, with the byte offset it happened at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at byte {offset}: {kind}")]
pub struct DecodeError {
    pub offset: usize,
    pub kind: DecodeErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("unexpected end of data")]
    Truncated,

    #[error("varint longer than 10 bytes")]
    VarintOverflow,

    #[error("invalid wire type {0}")]
    InvalidWireType(u8),

    #[error("invalid field number {0}")]
    InvalidFieldNumber(u64),

    #[error("field \"{field}\" has wire type {found:?}, expected {expected:?}")]
    WireTypeMismatch {
        field: &'static str,
        expected: WireType,
        found: WireType,
    },

    #[error("message type \"{message}\" has no field number {number}")]
    UnknownField { message: &'static str, number: u32 },

    #[error("value for string field \"{field}\" is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("enum field \"{field}\" has undeclared value {value}")]
    UnknownEnumValue { field: &'static str, value: i32 },
}

/// Errors surfaced by the compile pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse job parameters: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to encode job parameters: {0}")]
    Encode(#[from] EncodeError),

    #[error("failed to decode job parameters: {0}")]
    Decode(#[from] DecodeError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("round-trip check failed: {0}")]
    RoundTrip(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
