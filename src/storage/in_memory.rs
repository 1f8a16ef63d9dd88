//! In-memory implementation of Repository for testing and development

use crate::core::entity::Record;
use crate::core::filter::Predicate;
use crate::core::query::{PageWindow, SortKey};
use crate::core::store::Repository;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};

/// Assigns the key of a new record, given the records already stored
pub type KeyGenerator<R> = Arc<dyn Fn(&mut R, &[R]) + Send + Sync>;

/// In-memory repository implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access
/// and keeps records in insertion order.
pub struct InMemoryRepository<R: Record> {
    records: Arc<RwLock<IndexMap<String, R>>>,
    key_generator: Option<KeyGenerator<R>>,
}

impl<R: Record> InMemoryRepository<R> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
            key_generator: None,
        }
    }

    /// Create a repository holding `records`
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.key().to_string(), r))
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
            key_generator: None,
        }
    }

    /// Generate keys for added records instead of trusting the key they carry
    pub fn with_key_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn(&mut R, &[R]) + Send + Sync + 'static,
    {
        self.key_generator = Some(Arc::new(generator));
        self
    }

    /// Snapshot of every stored record
    pub fn records(&self) -> Result<Vec<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(records.values().cloned().collect())
    }
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Clone for InMemoryRepository<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            key_generator: self.key_generator.clone(),
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for InMemoryRepository<R> {
    async fn count(&self, predicate: &Predicate) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().filter(|r| predicate.matches(*r)).count())
    }

    async fn find_all(
        &self,
        predicate: &Predicate,
        sort: Option<&SortKey>,
        window: Option<PageWindow>,
    ) -> Result<Vec<R>> {
        let mut matching: Vec<R> = {
            let records = self
                .records
                .read()
                .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
            records
                .values()
                .filter(|r| predicate.matches(*r))
                .cloned()
                .collect()
        };

        if let Some(sort) = sort {
            sort.sort(&mut matching);
        }
        Ok(match window {
            Some(window) => window.apply(matching),
            None => matching,
        })
    }

    async fn get(&self, key: &R::Key) -> Result<Option<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(&key.to_string()).cloned())
    }

    async fn add(&self, record: &mut R) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if let Some(generator) = &self.key_generator {
            let existing: Vec<R> = records.values().cloned().collect();
            generator(record, &existing);
        }

        let key = record.key().to_string();
        if records.contains_key(&key) {
            return Err(anyhow!("Record with key {} already exists", key));
        }
        records.insert(key, record.clone());

        Ok(())
    }

    async fn update(&self, record: R) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let slot = records
            .get_mut(&record.key().to_string())
            .ok_or_else(|| anyhow!("Record not found"))?;
        *slot = record;

        Ok(())
    }

    async fn delete(&self, key: &R::Key) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.shift_remove(&key.to_string());

        Ok(())
    }
}
