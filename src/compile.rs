//! The text → bytes → C source pipeline

use crate::error::{Error, Result};
use crate::schema::job::JOB_PARAMETERS;
use crate::types::Record;
use crate::{parser, reader, render, writer};
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Every stage's output for one document
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub record: Record,
    pub bytes: Vec<u8>,
    pub source: String,
}

/// Compile a `JobParameters` text document into C source.
///
/// The result is checked before it is returned: the array in the rendered
/// source must hold exactly the encoded bytes, and those bytes must decode
/// back to a record that re-encodes identically.
pub fn compile(text: &str) -> Result<Compiled> {
    let record = parser::parse(text, &JOB_PARAMETERS)?;
    let bytes = writer::to_bytes(&record)?;
    let source = render::render(&bytes);

    match render::literal_bytes(&source) {
        Some(literal) if literal == bytes => {}
        Some(literal) => {
            return Err(Error::RoundTrip(format!(
                "rendered array holds {} bytes, encoded {}",
                literal.len(),
                bytes.len()
            )));
        }
        None => {
            return Err(Error::RoundTrip(
                "rendered source has no readable array".into(),
            ));
        }
    }

    let decoded = reader::decode(&bytes, &JOB_PARAMETERS)?;
    if writer::to_bytes(&decoded)? != bytes {
        return Err(Error::RoundTrip(
            "decoded record does not re-encode to the same bytes".into(),
        ));
    }
    debug!("round-trip check passed for {} bytes", bytes.len());

    Ok(Compiled {
        record,
        bytes,
        source,
    })
}

/// Compile `input` and write the C source to `output`.
///
/// `output` is only created once compilation has succeeded, so a bad input
/// leaves any existing file untouched.
pub fn compile_file(input: &Path, output: &Path) -> Result<()> {
    let text = fs::read_to_string(input).map_err(|e| Error::io(input, e))?;
    let compiled = compile(&text)?;

    let file = File::create(output).map_err(|e| Error::io(output, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(compiled.source.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(output, e))?;

    info!(
        "wrote {} bytes of {} to {}",
        compiled.bytes.len(),
        render::SYMBOL,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn test_compile_single_field() {
        let compiled = compile("layout: LAYOUT_DOUBLE\n").unwrap();
        assert_eq!(compiled.bytes, vec![0x08, 0x02]);
        assert_eq!(compiled.record.path("layout"), Some(&Value::Enum(2)));
        assert!(compiled.source.ends_with("= {0x08, 0x02};\n"));
    }

    #[test]
    fn test_compile_empty() {
        let compiled = compile("# nothing set\n").unwrap();
        assert!(compiled.bytes.is_empty());
        assert!(compiled.source.ends_with("= {};\n"));
    }

    #[test]
    fn test_compile_reports_parse_errors() {
        let err = compile("bogus_field: 1").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("bogus_field"));
    }

    #[test]
    fn test_compile_reports_missing_required() {
        let err = compile("wipe { top_left { x: 1 } }").unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert!(err.to_string().contains("wipe[0].bottom_right"));
    }

    #[test]
    fn test_missing_input_file() {
        let dir = std::env::temp_dir();
        let input = dir.join("jobfig-does-not-exist.textproto");
        let output = dir.join("jobfig-does-not-exist.h");
        let err = compile_file(&input, &output).unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path == &input));
        assert!(!output.exists());
    }
}
