//! Text-format parser
//!
//! Reads a human-written document such as
//!
//! ```text
//! layout: LAYOUT_SINGLE
//! grayfilter { scan_size { horizontal: 50 vertical: 50 } threshold: 0.5 }
//! sheet_multi_index { index: [1, 2, 5] }
//! ```
//!
//! into a [`Record`], checking every field name and value against the
//! message descriptor as it goes.

mod cursor;
mod message;
mod scalar;
mod token;

use crate::error::ParseError;
use crate::schema::MessageDescriptor;
use crate::types::Record;
use cursor::Cursor;
use log::debug;

/// Parse a text document into a record of the given message type
pub fn parse(text: &str, descriptor: &'static MessageDescriptor) -> Result<Record, ParseError> {
    let (record, _) = message::parse_body(descriptor, Cursor::new(text), None)?;
    debug!(
        "parsed {} with {} top-level fields from {} bytes of text",
        descriptor.name,
        record.len(),
        text.len()
    );
    Ok(record)
}
