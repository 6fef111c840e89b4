//! Decoded message contents

use super::{FieldValue, Value};
use crate::schema::MessageDescriptor;
use std::collections::BTreeMap;
use std::fmt;

/// The fields set on one message, keyed by field number.
///
/// Only fields that were explicitly set are present. Iteration is always in
/// ascending field-number order, which is the order the writer emits.
#[derive(Clone)]
pub struct Record {
    descriptor: &'static MessageDescriptor,
    fields: BTreeMap<u32, FieldValue>,
}

impl Record {
    pub fn new(descriptor: &'static MessageDescriptor) -> Self {
        Record {
            descriptor,
            fields: BTreeMap::new(),
        }
    }

    pub fn descriptor(&self) -> &'static MessageDescriptor {
        self.descriptor
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields set
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, number: u32) -> bool {
        self.fields.contains_key(&number)
    }

    pub fn get(&self, number: u32) -> Option<&FieldValue> {
        self.fields.get(&number)
    }

    pub fn get_mut(&mut self, number: u32) -> Option<&mut FieldValue> {
        self.fields.get_mut(&number)
    }

    /// Look a field up by its declared name
    pub fn get_by_name(&self, name: &str) -> Option<&FieldValue> {
        let field = self.descriptor.field_by_name(name)?;
        self.fields.get(&field.number)
    }

    /// Get a nested value by dot-separated path (e.g. "grayfilter.threshold").
    ///
    /// Repeated fields are not traversed.
    pub fn path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        let mut keys = path.split('.').peekable();
        while let Some(key) = keys.next() {
            let value = current.get_by_name(key)?.as_single()?;
            if keys.peek().is_none() {
                return Some(value);
            }
            current = value.as_message()?;
        }
        None
    }

    /// Set a field, returning the previous contents
    pub fn insert(&mut self, number: u32, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(number, value)
    }

    /// Set a singular field by name. Returns false if the name is unknown.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> bool {
        match self.descriptor.field_by_name(name) {
            Some(field) => {
                self.fields
                    .insert(field.number, FieldValue::Single(value.into()));
                true
            }
            None => false,
        }
    }

    /// Append to a repeated field, creating it if needed.
    ///
    /// A singular value already stored under `number` is replaced.
    pub fn push(&mut self, number: u32, value: Value) {
        match self.fields.get_mut(&number) {
            Some(FieldValue::Repeated(items)) => items.push(value),
            _ => {
                self.fields.insert(number, FieldValue::Repeated(vec![value]));
            }
        }
    }

    pub fn remove(&mut self, number: u32) -> Option<FieldValue> {
        self.fields.remove(&number)
    }

    /// Set fields in ascending field-number order
    pub fn fields(&self) -> impl Iterator<Item = (u32, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    pub fn into_fields(self) -> impl Iterator<Item = (u32, FieldValue)> {
        self.fields.into_iter()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.descriptor, other.descriptor) && self.fields == other.fields
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (number, value) in &self.fields {
            match self.descriptor.field_by_number(*number) {
                Some(field) => map.entry(&field.name, value),
                None => map.entry(number, value),
            };
        }
        map.finish()?;
        write!(f, " as {}", self.descriptor.name)
    }
}
