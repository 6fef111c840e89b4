//! In-memory representation of a parsed configuration

mod record;
mod value;

pub use record::Record;
pub use value::{FieldValue, Value};
