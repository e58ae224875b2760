// src/db/memory.rs
//! In-process registry for tests and throwaway runs

use std::sync::{Mutex, PoisonError};

use crate::db::registry::{ImageRecord, NewImageRecord, RecordRegistry};
use crate::CoreResult as Result;

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    records: Mutex<Vec<ImageRecord>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordRegistry for MemoryRegistry {
    fn insert(&self, record: &NewImageRecord) -> Result<i64> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        // ids start at 1 and are never reused (records are never deleted)
        let id = records.len() as i64 + 1;
        records.push(record.clone().into_record(id));
        Ok(id)
    }

    fn lookup(&self, id: i64) -> Result<Option<ImageRecord>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<ImageRecord>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.clone())
    }
}
