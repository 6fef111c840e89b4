//! Bounded byte cursor and wire primitives

use crate::error::{DecodeError, DecodeErrorKind};

/// A read position within `data[..end]`.
///
/// Offsets are absolute so nested messages report positions in the
/// original buffer.
#[derive(Debug, Clone, Copy)]
pub struct Input<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Input<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Input {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    pub fn eos(&self) -> bool {
        self.pos >= self.end
    }

    pub fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError {
            offset: self.pos,
            kind,
        }
    }

    /// Split off the next `len` bytes as their own bounded input
    pub fn take(self, len: u64) -> Result<(Input<'a>, Input<'a>), DecodeError> {
        let remaining = (self.end - self.pos) as u64;
        if len > remaining {
            return Err(self.error(DecodeErrorKind::Truncated));
        }
        let split = self.pos + len as usize;
        let inner = Input {
            data: self.data,
            pos: self.pos,
            end: split,
        };
        let rest = Input {
            data: self.data,
            pos: split,
            end: self.end,
        };
        Ok((inner, rest))
    }

    /// Remaining bytes as a slice
    pub fn bytes(&self) -> &'a [u8] {
        &self.data[self.pos..self.end]
    }

    pub fn varint(self) -> Result<(u64, Input<'a>), DecodeError> {
        let mut value = 0u64;
        let mut cursor = self;
        for i in 0..10 {
            if cursor.eos() {
                return Err(cursor.error(DecodeErrorKind::Truncated));
            }
            let byte = cursor.data[cursor.pos];
            cursor.pos += 1;
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok((value, cursor));
            }
        }
        Err(self.error(DecodeErrorKind::VarintOverflow))
    }

    pub fn fixed32(self) -> Result<([u8; 4], Input<'a>), DecodeError> {
        let (inner, rest) = self.take(4)?;
        let mut out = [0u8; 4];
        out.copy_from_slice(inner.bytes());
        Ok((out, rest))
    }

    pub fn fixed64(self) -> Result<([u8; 8], Input<'a>), DecodeError> {
        let (inner, rest) = self.take(8)?;
        let mut out = [0u8; 8];
        out.copy_from_slice(inner.bytes());
        Ok((out, rest))
    }

    /// Length-prefixed run
    pub fn delimited(self) -> Result<(Input<'a>, Input<'a>), DecodeError> {
        let (len, rest) = self.varint()?;
        rest.take(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint() {
        let data = [0xac, 0x02, 0x01];
        let (value, rest) = Input::new(&data).varint().unwrap();
        assert_eq!(value, 300);
        assert_eq!(rest.pos, 2);
        let (value, rest) = rest.varint().unwrap();
        assert_eq!(value, 1);
        assert!(rest.eos());
    }

    #[test]
    fn test_varint_truncated() {
        let err = Input::new(&[0x80, 0x80]).varint().unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Truncated);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_varint_overflow() {
        let data = [0xff; 11];
        let err = Input::new(&data).varint().unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::VarintOverflow);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_max_varint() {
        let mut data = vec![0xff; 9];
        data.push(0x01);
        let (value, _) = Input::new(&data).varint().unwrap();
        assert_eq!(value, u64::MAX);
    }

    #[test]
    fn test_take_is_bounded() {
        let data = [1, 2, 3, 4, 5];
        let (inner, rest) = Input::new(&data).take(3).unwrap();
        assert_eq!(inner.bytes(), &[1, 2, 3]);
        assert_eq!(rest.bytes(), &[4, 5]);
        // inner cannot read past its end
        assert!(inner.take(4).is_err());
        assert!(rest.take(3).is_err());
    }

    #[test]
    fn test_fixed() {
        let data = 0x3f00_0000u32.to_le_bytes();
        let (bytes, rest) = Input::new(&data).fixed32().unwrap();
        assert_eq!(u32::from_le_bytes(bytes), 0x3f00_0000);
        assert!(rest.eos());
        assert!(Input::new(&data).fixed64().is_err());
    }

    #[test]
    fn test_delimited() {
        let data = [0x02, 0xaa, 0xbb, 0xcc];
        let (inner, rest) = Input::new(&data).delimited().unwrap();
        assert_eq!(inner.bytes(), &[0xaa, 0xbb]);
        assert_eq!(rest.pos, 3);
    }
}
