//! Data access traits
//!
//! The engine talks to a [`DataSource`]. Two adapters implement it: an
//! in-memory collection and an adapter over any [`Repository`]. They differ
//! in how they count and order records, see the `storage` module.

use crate::core::entity::Record;
use crate::core::filter::Predicate;
use crate::core::outcome::OperationOutcome;
use crate::core::query::{ListQuery, PageWindow, SortKey};
use anyhow::{Result, anyhow};
use async_trait::async_trait;

/// Records of one listing with the total record count
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<R> {
    pub items: Vec<R>,
    pub total: usize,
}

/// Source of records for one grid
#[async_trait]
pub trait DataSource<R: Record>: Send + Sync {
    /// Filter, count, sort and page
    async fn list(&self, query: &ListQuery) -> Result<Listing<R>>;

    /// Whether [`find`](Self::find) can look records up
    fn can_find(&self) -> bool {
        true
    }

    /// Look up a record by key
    async fn find(&self, key: &R::Key) -> Result<Option<R>>;

    /// Whether the source persists add, edit and delete on its own
    fn supports_mutations(&self) -> bool {
        false
    }

    /// Persist a new record; the source may assign its key
    async fn add(&self, _record: &mut R) -> Result<OperationOutcome> {
        Err(anyhow!("Data source does not support adding records"))
    }

    /// Persist changes to an existing record
    async fn update(&self, _record: R) -> Result<OperationOutcome> {
        Err(anyhow!("Data source does not support updating records"))
    }

    /// Remove a record by key
    async fn delete(&self, _key: &R::Key) -> Result<OperationOutcome> {
        Err(anyhow!("Data source does not support deleting records"))
    }
}

/// Abstract persistent repository
///
/// Implementations receive the typed predicate and either evaluate it with
/// [`Predicate::matches`] or translate it into their own query language.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Number of records matching the predicate
    async fn count(&self, predicate: &Predicate) -> Result<usize>;

    /// Matching records, ordered and sliced as requested
    async fn find_all(
        &self,
        predicate: &Predicate,
        sort: Option<&SortKey>,
        window: Option<PageWindow>,
    ) -> Result<Vec<R>>;

    /// Get a record by key
    async fn get(&self, key: &R::Key) -> Result<Option<R>>;

    /// Insert a record, assigning its key when the repository generates keys
    async fn add(&self, record: &mut R) -> Result<()>;

    /// Replace an existing record
    async fn update(&self, record: R) -> Result<()>;

    /// Delete a record
    async fn delete(&self, key: &R::Key) -> Result<()>;
}
