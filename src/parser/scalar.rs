//! Scalar field values

use super::cursor::Cursor;
use super::token::{Token, TokenKind, next_token, peek_token};
use crate::error::{ParseError, ParseErrorKind};
use crate::schema::{FieldDescriptor, FieldType};
use crate::types::Value;

/// Parse the value of a non-message field
pub fn parse_scalar<'a>(
    field: &'static FieldDescriptor,
    cursor: Cursor<'a>,
) -> Result<(Value, Cursor<'a>), ParseError> {
    let (first, after) = next_token(cursor)?;
    let (negative, token, cursor) = match first.kind {
        TokenKind::Punct('-') => {
            let (token, cursor) = next_token(after)?;
            // The sign belongs to the literal, nothing may separate them
            if token.at.rest().len() != after.rest().len() {
                return Err(first.at.error(ParseErrorKind::UnexpectedToken {
                    expected: "a number directly after \"-\"",
                    found: "\"-\" separated from its number".into(),
                }));
            }
            (true, token, cursor)
        }
        _ => (false, first, after),
    };

    match field.ty {
        FieldType::String | FieldType::Bytes => parse_text(field, negative, token, cursor),
        FieldType::Bool => {
            let value = match (&token.kind, negative) {
                (TokenKind::Ident("true" | "True" | "t"), false)
                | (TokenKind::Number("1"), false) => true,
                (TokenKind::Ident("false" | "False" | "f"), false)
                | (TokenKind::Number("0"), false) => false,
                _ => return Err(mismatch(field, "bool", &token)),
            };
            Ok((Value::Bool(value), cursor))
        }
        FieldType::Float | FieldType::Double => {
            let value = parse_float(field, negative, &token)?;
            let value = match field.ty {
                FieldType::Float => Value::F32(value as f32),
                _ => Value::F64(value),
            };
            Ok((value, cursor))
        }
        FieldType::Enum(desc) => {
            let number = match &token.kind {
                TokenKind::Ident(name) if !negative => {
                    desc.number_of(name).ok_or_else(|| {
                        token.at.error(ParseErrorKind::UnknownEnumValue {
                            enum_name: desc.name,
                            value: format!("\"{}\"", name),
                        })
                    })?
                }
                TokenKind::Number(text) => {
                    let value = signed(field, negative, &token, text)?;
                    let number = i32::try_from(value).ok().filter(|n| desc.name_of(*n).is_some());
                    number.ok_or_else(|| {
                        token.at.error(ParseErrorKind::UnknownEnumValue {
                            enum_name: desc.name,
                            value: value.to_string(),
                        })
                    })?
                }
                _ => return Err(mismatch(field, "enum value", &token)),
            };
            Ok((Value::Enum(number), cursor))
        }
        FieldType::Message(_) => Err(token.at.error(ParseErrorKind::UnexpectedToken {
            expected: "\"{\" or \"<\"",
            found: token.kind.describe(),
        })),
        FieldType::Int32
        | FieldType::Int64
        | FieldType::UInt32
        | FieldType::UInt64
        | FieldType::SInt32
        | FieldType::SInt64
        | FieldType::Fixed32
        | FieldType::Fixed64
        | FieldType::SFixed32
        | FieldType::SFixed64 => {
            let TokenKind::Number(text) = token.kind else {
                return Err(mismatch(field, "integer", &token));
            };
            let value = signed(field, negative, &token, text)?;
            let out_of_range = || {
                token.at.error(ParseErrorKind::OutOfRange {
                    field: field.name,
                    ty: field.ty.name(),
                    value: value.to_string(),
                })
            };
            let value = match field.ty {
                FieldType::Int32 | FieldType::SInt32 | FieldType::SFixed32 => {
                    Value::I32(i32::try_from(value).map_err(|_| out_of_range())?)
                }
                FieldType::Int64 | FieldType::SInt64 | FieldType::SFixed64 => {
                    Value::I64(i64::try_from(value).map_err(|_| out_of_range())?)
                }
                FieldType::UInt32 | FieldType::Fixed32 => {
                    Value::U32(u32::try_from(value).map_err(|_| out_of_range())?)
                }
                _ => Value::U64(u64::try_from(value).map_err(|_| out_of_range())?),
            };
            Ok((value, cursor))
        }
    }
}

/// One or more adjacent quoted literals, concatenated
fn parse_text<'a>(
    field: &'static FieldDescriptor,
    negative: bool,
    token: Token<'a>,
    cursor: Cursor<'a>,
) -> Result<(Value, Cursor<'a>), ParseError> {
    let TokenKind::Str(mut bytes) = token.kind.clone() else {
        return Err(mismatch(field, "string", &token));
    };
    if negative {
        return Err(mismatch(field, "string", &token));
    }

    let mut cursor = cursor;
    while let TokenKind::Str(more) = peek_token(cursor)?.kind {
        bytes.extend_from_slice(&more);
        cursor = next_token(cursor)?.1;
    }

    match field.ty {
        FieldType::String => {
            let s = String::from_utf8(bytes)
                .map_err(|_| token.at.error(ParseErrorKind::InvalidUtf8 { field: field.name }))?;
            Ok((Value::String(s), cursor))
        }
        _ => Ok((Value::Bytes(bytes), cursor)),
    }
}

fn mismatch(
    field: &'static FieldDescriptor,
    expected: &'static str,
    token: &Token<'_>,
) -> ParseError {
    token.at.error(ParseErrorKind::TypeMismatch {
        field: field.name,
        expected,
        found: token.kind.describe(),
    })
}

/// Apply the sign to an integer literal
fn signed(
    field: &'static FieldDescriptor,
    negative: bool,
    token: &Token<'_>,
    text: &str,
) -> Result<i128, ParseError> {
    let magnitude = parse_int_literal(text).ok_or_else(|| {
        token.at.error(ParseErrorKind::InvalidNumber {
            expected: "integer",
            text: text.to_string(),
        })
    })?;
    let magnitude = magnitude.ok_or_else(|| {
        token.at.error(ParseErrorKind::OutOfRange {
            field: field.name,
            ty: field.ty.name(),
            value: format!("{}{}", if negative { "-" } else { "" }, text),
        })
    })?;
    let value = i128::from(magnitude);
    Ok(if negative { -value } else { value })
}

/// Decimal, `0x` hex or leading-zero octal.
///
/// Returns `None` if the text is not an integer literal, `Some(None)` if it
/// is one but does not fit in 64 bits.
pub fn parse_int_literal(text: &str) -> Option<Option<u64>> {
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some(u64::from_str_radix(digits, radix).ok())
}

fn parse_float(
    field: &'static FieldDescriptor,
    negative: bool,
    token: &Token<'_>,
) -> Result<f64, ParseError> {
    let magnitude = match &token.kind {
        // No octal for floats; `010` and `09` are both rejected
        TokenKind::Number(text) if has_octal_prefix(text) => {
            return Err(invalid_float(token, text));
        }
        TokenKind::Number(text) => match parse_int_literal(text) {
            Some(Some(int)) => int as f64,
            Some(None) | None => decimal_float(text).ok_or_else(|| invalid_float(token, text))?,
        },
        TokenKind::Ident(name) => {
            let lower = name.to_ascii_lowercase();
            match lower.as_str() {
                "inf" | "inff" | "infinity" | "infinityf" => f64::INFINITY,
                "nan" | "nanf" => f64::NAN,
                _ => return Err(mismatch(field, "number", token)),
            }
        }
        _ => return Err(mismatch(field, "number", token)),
    };
    Ok(if negative { -magnitude } else { magnitude })
}

/// `0` followed by another digit, as in `010` or `09.5`
fn has_octal_prefix(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('0') && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Decimal float with optional `f` suffix
fn decimal_float(text: &str) -> Option<f64> {
    let body = text
        .strip_suffix('f')
        .or_else(|| text.strip_suffix('F'))
        .unwrap_or(text);
    let valid = !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !valid {
        return None;
    }
    body.parse::<f64>().ok()
}

fn invalid_float(token: &Token<'_>, text: &str) -> ParseError {
    token.at.error(ParseErrorKind::InvalidNumber {
        expected: "floating point",
        text: text.to_string(),
    })
}
