//! jobfig - Compile job-parameter text configs into embeddable binary defaults
//!
//! Turns a human-written `JobParameters` document into its canonical binary
//! encoding and renders those bytes as a C array, so a program can ship a
//! compiled-in default configuration without parsing text at startup.
//!
//! # Features
//!
//! - Strict text parser with line/column diagnostics
//! - Deterministic encoding: ascending field numbers, explicit presence
//! - Decoder for checking and inspecting compiled bytes
//! - Fixed-width hex C rendering
//!
//! # Example
//!
//! ```rust
//! use jobfig::{JOB_PARAMETERS, parse, render, writer};
//!
//! let record = parse("layout: LAYOUT_SINGLE\ndpi: 300\n", &JOB_PARAMETERS).unwrap();
//! let bytes = writer::to_bytes(&record).unwrap();
//! assert_eq!(bytes, vec![0x08, 0x01, 0xe0, 0x01, 0xac, 0x02]);
//!
//! let source = render::render(&bytes);
//! assert!(source.ends_with("= {0x08, 0x01, 0xe0, 0x01, 0xac, 0x02};\n"));
//! ```

pub mod compile;
pub mod error;
pub mod parser;
pub mod reader;
pub mod render;
pub mod schema;
pub mod types;
pub mod writer;

// Re-export common types at crate root
pub use compile::{Compiled, compile, compile_file};
pub use error::{Error, Result};
pub use parser::parse;
pub use reader::decode;
pub use schema::job::JOB_PARAMETERS;
pub use types::{FieldValue, Record, Value};
