//! Message bodies and fields

use super::cursor::Cursor;
use super::scalar::parse_scalar;
use super::token::{TokenKind, next_token, peek_token};
use crate::error::{ParseError, ParseErrorKind};
use crate::schema::{FieldDescriptor, FieldType, MessageDescriptor};
use crate::types::{FieldValue, Record, Value};

/// Parse fields until `close` (or end of input for the top level)
pub fn parse_body<'a>(
    descriptor: &'static MessageDescriptor,
    cursor: Cursor<'a>,
    close: Option<char>,
) -> Result<(Record, Cursor<'a>), ParseError> {
    let mut record = Record::new(descriptor);
    let mut cursor = cursor;

    loop {
        let (token, next) = next_token(cursor)?;
        match token.kind {
            TokenKind::Eof => {
                return match close {
                    None => Ok((record, next)),
                    Some(_) => Err(token.at.error(ParseErrorKind::UnexpectedEof {
                        expected: closing_name(close),
                    })),
                };
            }
            TokenKind::Punct(c) if Some(c) == close => return Ok((record, next)),
            TokenKind::Ident(name) => {
                let field = descriptor.field_by_name(name).ok_or_else(|| {
                    token.at.error(ParseErrorKind::UnknownField {
                        message: descriptor.name,
                        field: name.to_string(),
                    })
                })?;
                if !field.is_repeated() && record.contains(field.number) {
                    return Err(token.at.error(ParseErrorKind::DuplicateField {
                        message: descriptor.name,
                        field: field.name,
                    }));
                }
                cursor = parse_field(&mut record, field, next)?;

                // Optional separator
                let (sep, after) = next_token(cursor)?;
                if matches!(sep.kind, TokenKind::Punct(',' | ';')) {
                    cursor = after;
                }
            }
            other => {
                return Err(token.at.error(ParseErrorKind::UnexpectedToken {
                    expected: match close {
                        None => "field name",
                        Some(_) => closing_name(close),
                    },
                    found: other.describe(),
                }));
            }
        }
    }
}

fn closing_name(close: Option<char>) -> &'static str {
    match close {
        Some('>') => "field name or \">\"",
        _ => "field name or \"}\"",
    }
}

/// Everything after a field name
fn parse_field<'a>(
    record: &mut Record,
    field: &'static FieldDescriptor,
    cursor: Cursor<'a>,
) -> Result<Cursor<'a>, ParseError> {
    let (token, after) = next_token(cursor)?;
    let has_colon = token.kind == TokenKind::Punct(':');
    let cursor = if has_colon { after } else { cursor };

    // Message lists may drop the colon, scalar lists may not
    let list_allowed = has_colon || matches!(field.ty, FieldType::Message(_));
    let next = peek_token(cursor)?;
    if next.kind == TokenKind::Punct('[') && list_allowed {
        if !field.is_repeated() {
            return Err(next.at.error(ParseErrorKind::NotRepeated { field: field.name }));
        }
        return parse_list(record, field, cursor);
    }

    match field.ty {
        FieldType::Message(_) => {
            let (value, cursor) = parse_nested(field, cursor)?;
            store(record, field, value);
            Ok(cursor)
        }
        _ => {
            if !has_colon {
                return Err(token.at.error(ParseErrorKind::UnexpectedToken {
                    expected: "\":\"",
                    found: token.kind.describe(),
                }));
            }
            let (value, cursor) = parse_scalar(field, cursor)?;
            store(record, field, value);
            Ok(cursor)
        }
    }
}

/// `{ ... }` or `< ... >` for a message-typed field
fn parse_nested<'a>(
    field: &'static FieldDescriptor,
    cursor: Cursor<'a>,
) -> Result<(Value, Cursor<'a>), ParseError> {
    let FieldType::Message(descriptor) = field.ty else {
        return parse_scalar(field, cursor);
    };
    let (open, after) = next_token(cursor)?;
    let close = match open.kind {
        TokenKind::Punct('{') => '}',
        TokenKind::Punct('<') => '>',
        other => {
            return Err(open.at.error(ParseErrorKind::UnexpectedToken {
                expected: "\"{\" or \"<\"",
                found: other.describe(),
            }));
        }
    };
    let (record, cursor) = parse_body(descriptor, after, Some(close))?;
    Ok((Value::Message(record), cursor))
}

/// `[v, v, ...]` for a repeated field; `cursor` is at the opening bracket
fn parse_list<'a>(
    record: &mut Record,
    field: &'static FieldDescriptor,
    cursor: Cursor<'a>,
) -> Result<Cursor<'a>, ParseError> {
    let (_, mut cursor) = next_token(cursor)?;

    if peek_token(cursor)?.kind == TokenKind::Punct(']') {
        return Ok(next_token(cursor)?.1);
    }

    loop {
        let (value, next) = parse_nested(field, cursor)?;
        store(record, field, value);

        let (token, next) = next_token(next)?;
        match token.kind {
            TokenKind::Punct(',') => cursor = next,
            TokenKind::Punct(']') => return Ok(next),
            TokenKind::Eof => {
                return Err(token.at.error(ParseErrorKind::UnexpectedEof {
                    expected: "\",\" or \"]\"",
                }));
            }
            other => {
                return Err(token.at.error(ParseErrorKind::UnexpectedToken {
                    expected: "\",\" or \"]\"",
                    found: other.describe(),
                }));
            }
        }
    }
}

fn store(record: &mut Record, field: &'static FieldDescriptor, value: Value) {
    if field.is_repeated() {
        record.push(field.number, value);
    } else {
        record.insert(field.number, FieldValue::Single(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::job::{JOB_PARAMETERS, MULTI_INDEX};

    fn parse(src: &str) -> Result<Record, ParseError> {
        parse_body(&JOB_PARAMETERS, Cursor::new(src), None).map(|(r, _)| r)
    }

    #[test]
    fn test_empty_body() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  # only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_separators_are_optional() {
        let record = parse("dpi: 300, overwrite: true; start_sheet: 2").unwrap();
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_nested_with_and_without_colon() {
        let record = parse("grayfilter { threshold: 0.5 } deskew: < scan_size: 1500 >").unwrap();
        assert_eq!(record.path("grayfilter.threshold"), Some(&Value::F32(0.5)));
        assert_eq!(record.path("deskew.scan_size"), Some(&Value::U32(1500)));
    }

    #[test]
    fn test_repeated_fields_accumulate() {
        let record = parse(
            "mask_scan_point { x: 1 y: 2 }\n\
             mask_scan_point: [{ x: 3 }, < y: 4 >]",
        )
        .unwrap();
        let points = record
            .get_by_name("mask_scan_point")
            .and_then(FieldValue::as_repeated)
            .unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].as_message().unwrap().path("x"), Some(&Value::I32(3)));
    }

    #[test]
    fn test_message_list_without_colon() {
        let record = parse("mask_scan_point [{ x: 1 }, { x: 2 }]").unwrap();
        let points = record
            .get_by_name("mask_scan_point")
            .and_then(FieldValue::as_repeated)
            .unwrap();
        let xs: Vec<_> = points
            .iter()
            .map(|p| p.as_message().and_then(|m| m.path("x")))
            .collect();
        assert_eq!(xs, vec![Some(&Value::I32(1)), Some(&Value::I32(2))]);
    }

    #[test]
    fn test_scalar_list_requires_colon() {
        let err = parse_body(&MULTI_INDEX, Cursor::new("index [1, 2]"), None).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { expected: "\":\"", .. }));
    }

    #[test]
    fn test_scalar_list() {
        let (record, _) = parse_body(
            &MULTI_INDEX,
            Cursor::new("index: [1, -1, 0x10] index: 7 index: []"),
            None,
        )
        .unwrap();
        assert_eq!(
            record.get(1).and_then(FieldValue::as_repeated).unwrap(),
            &[Value::I32(1), Value::I32(-1), Value::I32(16), Value::I32(7)]
        );
    }

    #[test]
    fn test_empty_list_sets_nothing() {
        let (record, _) = parse_body(&MULTI_INDEX, Cursor::new("index: []"), None).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_unknown_field() {
        let err = parse("dpi: 300\nbogus_field: 1").unwrap_err();
        assert_eq!((err.line, err.column), (2, 1));
        assert_eq!(
            err.kind,
            ParseErrorKind::UnknownField {
                message: "JobParameters",
                field: "bogus_field".into(),
            }
        );
    }

    #[test]
    fn test_unknown_nested_field_names_nested_type() {
        let err = parse("grayfilter { bogus: 1 }").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnknownField { message: "GrayfilterParameters", .. }
        ));
        assert_eq!(err.column, 14);
    }

    #[test]
    fn test_duplicate_singular_field() {
        let err = parse("dpi: 300\ndpi: 600").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::DuplicateField {
                message: "JobParameters",
                field: "dpi",
            }
        );
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_list_on_singular_field() {
        let err = parse("dpi: [300]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NotRepeated { field: "dpi" });
    }

    #[test]
    fn test_scalar_requires_colon() {
        let err = parse("dpi 300").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { expected: "\":\"", .. }));
    }

    #[test]
    fn test_unclosed_message() {
        let err = parse("grayfilter { threshold: 0.5").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn test_mismatched_close() {
        let err = parse("grayfilter { threshold: 0.5 >").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_stray_close_at_top_level() {
        let err = parse("dpi: 1 }").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: "field name",
                found: "\"}\"".into(),
            }
        );
    }

    #[test]
    fn test_unterminated_list() {
        let err = parse_body(&MULTI_INDEX, Cursor::new("index: [1, 2"), None).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));
    }
}
