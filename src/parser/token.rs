//! Tokenizer for the text format

use super::cursor::Cursor;
use crate::error::{ParseError, ParseErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    /// Field names, enum value names, `true`, `inf`, ...
    Ident(&'a str),
    /// Unsigned numeric literal as written (sign is a separate token)
    Number(&'a str),
    /// One quoted literal with escapes resolved
    Str(Vec<u8>),
    Punct(char),
    Eof,
}

impl TokenKind<'_> {
    /// How the token reads in an error message
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) | TokenKind::Number(s) => format!("\"{}\"", s),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Punct(c) => format!("\"{}\"", c),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Where the token starts, for error reporting
    pub at: Cursor<'a>,
}

const PUNCTUATION: &[char] = &[':', '{', '}', '<', '>', '[', ']', ',', ';', '-'];

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Read the next token, skipping leading whitespace and comments
pub fn next_token(cursor: Cursor<'_>) -> Result<(Token<'_>, Cursor<'_>), ParseError> {
    let at = cursor.skip_trivia();
    let Some(c) = at.peek() else {
        return Ok((
            Token {
                kind: TokenKind::Eof,
                at,
            },
            at,
        ));
    };

    if is_ident_start(c) {
        let (ident, next) = at.take_while(is_ident_char);
        return Ok((
            Token {
                kind: TokenKind::Ident(ident),
                at,
            },
            next,
        ));
    }

    let starts_number =
        c.is_ascii_digit() || (c == '.' && at.peek_nth(1).is_some_and(|d| d.is_ascii_digit()));
    if starts_number {
        let (number, next) = lex_number(at);
        return Ok((
            Token {
                kind: TokenKind::Number(number),
                at,
            },
            next,
        ));
    }

    if c == '"' || c == '\'' {
        let (bytes, next) = lex_string(at)?;
        return Ok((
            Token {
                kind: TokenKind::Str(bytes),
                at,
            },
            next,
        ));
    }

    if PUNCTUATION.contains(&c) {
        let (_, next) = at.bump().ok_or_else(|| at.error(ParseErrorKind::UnexpectedChar(c)))?;
        return Ok((
            Token {
                kind: TokenKind::Punct(c),
                at,
            },
            next,
        ));
    }

    Err(at.error(ParseErrorKind::UnexpectedChar(c)))
}

/// Look at the next token without consuming it
pub fn peek_token(cursor: Cursor<'_>) -> Result<Token<'_>, ParseError> {
    next_token(cursor).map(|(token, _)| token)
}

/// Numbers run over alphanumerics, `_` and `.`, plus a sign right after
/// a decimal exponent marker. Validation happens once the field type is known.
fn lex_number(cursor: Cursor<'_>) -> (&str, Cursor<'_>) {
    let hex = cursor.rest().starts_with("0x") || cursor.rest().starts_with("0X");
    let start = cursor;
    let mut cursor = cursor;
    let mut prev = '\0';
    while let Some(c) = cursor.peek() {
        let exponent_sign = !hex && (c == '+' || c == '-') && (prev == 'e' || prev == 'E');
        if !(c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign) {
            break;
        }
        match cursor.bump() {
            Some((_, next)) => cursor = next,
            None => break,
        }
        prev = c;
    }
    let len = start.rest().len() - cursor.rest().len();
    (&start.rest()[..len], cursor)
}

/// Read one quoted literal, resolving escapes to raw bytes
fn lex_string(cursor: Cursor<'_>) -> Result<(Vec<u8>, Cursor<'_>), ParseError> {
    let open = cursor;
    let (quote, mut cursor) = cursor
        .bump()
        .ok_or_else(|| open.error(ParseErrorKind::UnterminatedString))?;
    let mut bytes = Vec::new();

    loop {
        let escape_at = cursor;
        let Some((c, next)) = cursor.bump() else {
            return Err(open.error(ParseErrorKind::UnterminatedString));
        };
        cursor = next;
        match c {
            '\n' => return Err(open.error(ParseErrorKind::UnterminatedString)),
            c if c == quote => return Ok((bytes, cursor)),
            '\\' => {
                cursor = lex_escape(escape_at, cursor, &mut bytes)?;
            }
            c => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
}

/// Resolve the escape following a backslash. `escape_at` points at the backslash.
fn lex_escape<'a>(
    escape_at: Cursor<'a>,
    cursor: Cursor<'a>,
    bytes: &mut Vec<u8>,
) -> Result<Cursor<'a>, ParseError> {
    let invalid = |end: Cursor<'a>| {
        let len = escape_at.rest().len() - end.rest().len();
        escape_at.error(ParseErrorKind::InvalidEscape(
            escape_at.rest()[..len].to_string(),
        ))
    };

    let Some((c, cursor)) = cursor.bump() else {
        return Err(escape_at.error(ParseErrorKind::UnterminatedString));
    };

    let simple = match c {
        'n' => Some(b'\n'),
        'r' => Some(b'\r'),
        't' => Some(b'\t'),
        'a' => Some(0x07),
        'b' => Some(0x08),
        'f' => Some(0x0c),
        'v' => Some(0x0b),
        '\\' => Some(b'\\'),
        '\'' => Some(b'\''),
        '"' => Some(b'"'),
        '?' => Some(b'?'),
        _ => None,
    };
    if let Some(b) = simple {
        bytes.push(b);
        return Ok(cursor);
    }

    match c {
        '0'..='7' => {
            let mut value = c.to_digit(8).unwrap_or(0);
            let mut cursor = cursor;
            for _ in 0..2 {
                match cursor.peek().and_then(|d| d.to_digit(8)) {
                    Some(d) => {
                        value = value * 8 + d;
                        cursor = cursor.bump().map(|(_, n)| n).unwrap_or(cursor);
                    }
                    None => break,
                }
            }
            let byte = u8::try_from(value).map_err(|_| invalid(cursor))?;
            bytes.push(byte);
            Ok(cursor)
        }
        'x' | 'X' => {
            let (digits, cursor) = take_hex(cursor, 2);
            if digits.is_empty() {
                return Err(invalid(cursor));
            }
            let byte = u8::from_str_radix(digits, 16).map_err(|_| invalid(cursor))?;
            bytes.push(byte);
            Ok(cursor)
        }
        'u' | 'U' => {
            let width = if c == 'u' { 4 } else { 8 };
            let (digits, cursor) = take_hex(cursor, width);
            if digits.len() != width {
                return Err(invalid(cursor));
            }
            let ch = u32::from_str_radix(digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| invalid(cursor))?;
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            Ok(cursor)
        }
        _ => Err(invalid(cursor)),
    }
}

/// Up to `max` hex digits
fn take_hex(cursor: Cursor<'_>, max: usize) -> (&str, Cursor<'_>) {
    let start = cursor;
    let mut cursor = cursor;
    for _ in 0..max {
        match cursor.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                cursor = cursor.bump().map(|(_, n)| n).unwrap_or(cursor);
            }
            _ => break,
        }
    }
    let len = start.rest().len() - cursor.rest().len();
    (&start.rest()[..len], cursor)
}
