//! Data source over an abstract repository

use crate::core::entity::Record;
use crate::core::filter::Predicate;
use crate::core::outcome::OperationOutcome;
use crate::core::query::ListQuery;
use crate::core::store::{DataSource, Listing, Repository};
use anyhow::Result;
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

/// Adapter exposing a [`Repository`] as a [`DataSource`]
///
/// The base specification is combined with the search predicate and the
/// total record count is taken against that combined predicate. Mutations
/// are delegated to the repository.
pub struct RepositorySource<R: Record, P: Repository<R>> {
    repository: Arc<P>,
    specification: Predicate,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record, P: Repository<R>> RepositorySource<R, P> {
    pub fn new(repository: Arc<P>) -> Self {
        Self {
            repository,
            specification: Predicate::Always,
            _record: PhantomData,
        }
    }

    /// Base specification every listing is restricted to
    pub fn with_specification(mut self, specification: Predicate) -> Self {
        self.specification = specification;
        self
    }

    pub fn repository(&self) -> &Arc<P> {
        &self.repository
    }
}

impl<R: Record, P: Repository<R>> Clone for RepositorySource<R, P> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            specification: self.specification.clone(),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Record, P: Repository<R>> DataSource<R> for RepositorySource<R, P> {
    async fn list(&self, query: &ListQuery) -> Result<Listing<R>> {
        let predicate = self.specification.clone().and(query.predicate.clone());
        let sort = query.repository_sort(R::schema())?;
        let window = query.page_window();

        let items = self
            .repository
            .find_all(&predicate, sort.as_ref(), window)
            .await?;
        let total = self.repository.count(&predicate).await?;

        tracing::debug!(
            record = R::schema().name(),
            total,
            returned = items.len(),
            "Listed repository"
        );
        Ok(Listing { items, total })
    }

    async fn find(&self, key: &R::Key) -> Result<Option<R>> {
        self.repository.get(key).await
    }

    fn supports_mutations(&self) -> bool {
        true
    }

    async fn add(&self, record: &mut R) -> Result<OperationOutcome> {
        self.repository.add(record).await?;
        Ok(OperationOutcome::success())
    }

    async fn update(&self, record: R) -> Result<OperationOutcome> {
        self.repository.update(record).await?;
        Ok(OperationOutcome::success())
    }

    async fn delete(&self, key: &R::Key) -> Result<OperationOutcome> {
        self.repository.delete(key).await?;
        Ok(OperationOutcome::success())
    }
}
