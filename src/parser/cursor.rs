//! Position-tracking cursor over the input text

use crate::error::{ParseError, ParseErrorKind};

/// An immutable position in the input.
///
/// Parsers take a cursor by value and hand back the cursor past whatever
/// they consumed, so backtracking is just keeping an old copy.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Cursor {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Character `n` positions ahead of the current one
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consume one character
    pub fn bump(self) -> Option<(char, Cursor<'a>)> {
        let c = self.peek()?;
        let mut next = self;
        next.pos += c.len_utf8();
        if c == '\n' {
            next.line += 1;
            next.column = 1;
        } else {
            next.column += 1;
        }
        Some((c, next))
    }

    /// Consume characters while `pred` holds, returning the consumed slice
    pub fn take_while(self, pred: impl Fn(char) -> bool) -> (&'a str, Cursor<'a>) {
        let start = self.pos;
        let mut cursor = self;
        while let Some(c) = cursor.peek() {
            if !pred(c) {
                break;
            }
            if let Some((_, next)) = cursor.bump() {
                cursor = next;
            }
        }
        (&self.src[start..cursor.pos], cursor)
    }

    /// Skip whitespace and `#` comments
    pub fn skip_trivia(self) -> Cursor<'a> {
        let mut cursor = self;
        loop {
            match cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    let (_, next) = cursor.take_while(char::is_whitespace);
                    cursor = next;
                }
                Some('#') => {
                    let (_, next) = cursor.take_while(|c| c != '\n');
                    cursor = next;
                }
                _ => return cursor,
            }
        }
    }

    /// Build an error located at this position
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.line,
            column: self.column,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_tracks_lines() {
        let cursor = Cursor::new("a\nb");
        let (c, cursor) = cursor.bump().unwrap();
        assert_eq!(c, 'a');
        assert_eq!((cursor.line, cursor.column), (1, 2));
        let (_, cursor) = cursor.bump().unwrap();
        assert_eq!((cursor.line, cursor.column), (2, 1));
        let (c, cursor) = cursor.bump().unwrap();
        assert_eq!(c, 'b');
        assert!(cursor.rest().is_empty());
        assert!(cursor.bump().is_none());
    }

    #[test]
    fn test_columns_count_characters() {
        let (_, cursor) = Cursor::new("é=").take_while(|c| c != '=');
        assert_eq!(cursor.column, 2);
        assert_eq!(cursor.peek(), Some('='));
    }

    #[test]
    fn test_skip_trivia() {
        let cursor = Cursor::new("  # comment\n\t  dpi: 300").skip_trivia();
        assert_eq!(cursor.rest(), "dpi: 300");
        assert_eq!((cursor.line, cursor.column), (2, 4));
    }

    #[test]
    fn test_comment_at_end_of_input() {
        let cursor = Cursor::new("# nothing else").skip_trivia();
        assert!(cursor.rest().is_empty());
    }

    #[test]
    fn test_backtracking_keeps_old_position() {
        let start = Cursor::new("abc");
        let (taken, _) = start.take_while(|c| c.is_alphabetic());
        assert_eq!(taken, "abc");
        assert_eq!(start.rest(), "abc");
        assert_eq!(start.peek_nth(2), Some('c'));
    }
}
