use anyhow::Result;
use parking_lot::RwLock;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::model::{CanonicalPair, CombinationRecord, InsertOutcome};
use crate::store::traits::{CombinationStore, Store};

/// In-process store with the same insert-if-absent semantics as Postgres.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<CanonicalPair, CombinationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = CombinationRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write();
            for record in records {
                map.entry(record.key()).or_insert(record);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait::async_trait]
impl CombinationStore for MemoryStore {
    async fn get_combination(&self, key: &CanonicalPair) -> Result<Option<CombinationRecord>> {
        Ok(self.records.read().get(key).cloned())
    }

    async fn insert_if_absent(&self, record: CombinationRecord) -> Result<InsertOutcome> {
        let mut records = self.records.write();
        match records.entry(record.key()) {
            Entry::Occupied(existing) => Ok(InsertOutcome::AlreadyPresent(existing.get().clone())),
            Entry::Vacant(slot) => Ok(InsertOutcome::Inserted(slot.insert(record).clone())),
        }
    }

    async fn list_combinations(&self, limit: Option<usize>) -> Result<Vec<CombinationRecord>> {
        let records = self.records.read();
        Ok(records
            .values()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count_combinations(&self) -> Result<u64> {
        Ok(self.records.read().len() as u64)
    }
}

impl Store for MemoryStore {}
