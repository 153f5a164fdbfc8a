// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Receiver-side schema bookkeeping.
//!
//! UADP transmits fields positionally, so a subscriber needs to know each
//! writer's field layout out of band. A [`SchemaRegistry`] holds one
//! [`DataSetSchema`] per DataSetWriterId; codecs consult it to name decoded
//! fields and to surface layout changes as schema mismatches.

use std::collections::HashMap;

use super::error::{CodecError, Result};
use super::message::{DataSetClassId, DataSetMessage};
use super::value::TypeTag;

/// Agreed field layout of one DataSetWriter.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetSchema {
    writer_id: u32,
    class_id: Option<DataSetClassId>,
    fields: Vec<(String, TypeTag)>,
}

impl DataSetSchema {
    pub fn new(writer_id: u32, fields: Vec<(String, TypeTag)>) -> Self {
        Self {
            writer_id,
            class_id: None,
            fields,
        }
    }

    #[must_use]
    pub fn with_class_id(mut self, class_id: DataSetClassId) -> Self {
        self.class_id = Some(class_id);
        self
    }

    /// Derive a schema from a message's current layout.
    pub fn from_message(message: &DataSetMessage, class_id: Option<DataSetClassId>) -> Self {
        Self {
            writer_id: message.writer_id(),
            class_id,
            fields: message
                .fields()
                .iter()
                .map(|f| (f.name.clone(), f.value.type_tag()))
                .collect(),
        }
    }

    pub fn writer_id(&self) -> u32 {
        self.writer_id
    }

    pub fn class_id(&self) -> Option<DataSetClassId> {
        self.class_id
    }

    pub fn fields(&self) -> &[(String, TypeTag)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fail unless `count` matches the agreed field count.
    pub fn check_field_count(&self, count: usize) -> Result<()> {
        if count != self.fields.len() {
            return Err(CodecError::schema_mismatch(
                self.writer_id,
                format!("expected {} fields, found {count}", self.fields.len()),
            ));
        }
        Ok(())
    }

    /// Fail if both sides name a class and the names differ.
    pub fn check_class_id(&self, received: Option<DataSetClassId>) -> Result<()> {
        match (self.class_id, received) {
            (Some(expected), Some(found)) if expected != found => {
                Err(CodecError::schema_mismatch(
                    self.writer_id,
                    format!("DataSetClassId {found} does not match agreed {expected}"),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Fail unless the field at `index` has type `tag`.
    pub fn check_field_type(&self, index: usize, tag: TypeTag) -> Result<()> {
        match self.fields.get(index) {
            Some((_, expected)) if *expected == tag => Ok(()),
            Some((name, expected)) => Err(CodecError::schema_mismatch(
                self.writer_id,
                format!("field '{name}' expected {expected}, found {tag}"),
            )),
            None => Err(CodecError::schema_mismatch(
                self.writer_id,
                format!("no field at position {index}"),
            )),
        }
    }
}

/// Schemas keyed by DataSetWriterId.
///
/// Owned by a single codec instance; codec calls run to completion on the
/// caller's thread, so no locking is involved.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<u32, DataSetSchema>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the schema of a writer.
    pub fn register(&mut self, schema: DataSetSchema) {
        self.schemas.insert(schema.writer_id, schema);
    }

    /// Get a writer's schema.
    pub fn get(&self, writer_id: u32) -> Option<&DataSetSchema> {
        self.schemas.get(&writer_id)
    }

    /// Check if a writer has a schema.
    pub fn contains(&self, writer_id: u32) -> bool {
        self.schemas.contains_key(&writer_id)
    }

    /// Remove a writer's schema.
    pub fn remove(&mut self, writer_id: u32) -> bool {
        self.schemas.remove(&writer_id).is_some()
    }

    /// Get the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_schema() -> DataSetSchema {
        DataSetSchema::new(
            1000,
            vec![
                ("Val_F32_A".to_string(), TypeTag::Float),
                ("Val_I32_C".to_string(), TypeTag::Int32),
            ],
        )
    }

    #[test]
    fn test_schema_registry() {
        let mut registry = SchemaRegistry::new();
        registry.register(bench_schema());

        assert!(registry.contains(1000));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(1000).map(|s| s.len()), Some(2));

        assert!(registry.remove(1000));
        assert!(!registry.contains(1000));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_field_count_mismatch() {
        let err = bench_schema().check_field_count(3).unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch { writer_id: 1000, .. }));
        assert!(bench_schema().check_field_count(2).is_ok());
    }

    #[test]
    fn test_field_type_mismatch() {
        let schema = bench_schema();
        assert!(schema.check_field_type(0, TypeTag::Float).is_ok());
        assert!(schema.check_field_type(1, TypeTag::Float).is_err());
        assert!(schema.check_field_type(5, TypeTag::Float).is_err());
    }

    #[test]
    fn test_class_id_mismatch() {
        let a: DataSetClassId = "eae79794-1af7-4f96-8401-4096cd1d8908".parse().unwrap();
        let b: DataSetClassId = "00000000-0000-0000-0000-000000000001".parse().unwrap();
        let schema = bench_schema().with_class_id(a);
        assert!(schema.check_class_id(Some(a)).is_ok());
        assert!(schema.check_class_id(None).is_ok());
        assert!(schema.check_class_id(Some(b)).is_err());
    }
}
