//! In-memory collection data source

use crate::core::entity::{HasSchema, Record};
use crate::core::filter::Predicate;
use crate::core::query::ListQuery;
use crate::core::store::{DataSource, Listing};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Looks up the record to edit inside the collection
pub type FindFn<R> = Arc<dyn Fn(&[R], &<R as HasSchema>::Key) -> Option<R> + Send + Sync>;

/// Data source over an in-memory sequence of records
///
/// The total record count is taken after the base selector and before the
/// search predicate, so it reflects everything the grid may show rather than
/// what the current search matched. The collection never persists mutations
/// itself; add, edit and delete go through callbacks on the engine.
pub struct CollectionSource<R: Record> {
    items: Arc<RwLock<Vec<R>>>,
    selector: Predicate,
    find: Option<FindFn<R>>,
}

impl<R: Record> CollectionSource<R> {
    pub fn new(items: impl IntoIterator<Item = R>) -> Self {
        Self::shared(Arc::new(RwLock::new(items.into_iter().collect())))
    }

    /// Source over a collection the caller keeps mutating
    pub fn shared(items: Arc<RwLock<Vec<R>>>) -> Self {
        Self {
            items,
            selector: Predicate::Always,
            find: None,
        }
    }

    /// Restrict every listing to records matching `selector`
    pub fn with_selector(mut self, selector: Predicate) -> Self {
        self.selector = selector;
        self
    }

    /// Function finding the record an edit applies to
    pub fn with_find<F>(mut self, find: F) -> Self
    where
        F: Fn(&[R], &R::Key) -> Option<R> + Send + Sync + 'static,
    {
        self.find = Some(Arc::new(find));
        self
    }

    /// Find records by comparing their key
    pub fn with_key_lookup(self) -> Self {
        self.with_find(|items, key| items.iter().find(|r| &r.key() == key).cloned())
    }

    /// The underlying collection
    pub fn items(&self) -> Arc<RwLock<Vec<R>>> {
        Arc::clone(&self.items)
    }
}

impl<R: Record> Clone for CollectionSource<R> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            selector: self.selector.clone(),
            find: self.find.clone(),
        }
    }
}

#[async_trait]
impl<R: Record> DataSource<R> for CollectionSource<R> {
    async fn list(&self, query: &ListQuery) -> Result<Listing<R>> {
        let selected: Vec<R> = {
            let items = self
                .items
                .read()
                .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
            items
                .iter()
                .filter(|r| self.selector.matches(*r))
                .cloned()
                .collect()
        };
        let total = selected.len();

        let mut rows: Vec<R> = selected
            .into_iter()
            .filter(|r| query.predicate.matches(r))
            .collect();

        if let Some(sort) = query.collection_sort(R::schema())? {
            sort.sort(&mut rows);
        }
        if let Some(window) = query.page_window() {
            rows = window.apply(rows);
        }

        tracing::debug!(
            record = R::schema().name(),
            total,
            returned = rows.len(),
            "Listed collection"
        );
        Ok(Listing { items: rows, total })
    }

    fn can_find(&self) -> bool {
        self.find.is_some()
    }

    async fn find(&self, key: &R::Key) -> Result<Option<R>> {
        let find = self
            .find
            .as_ref()
            .ok_or_else(|| anyhow!("No find function configured for {}", R::schema().name()))?;
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(find(&items, key))
    }
}
