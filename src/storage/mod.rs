//! Data source implementations
//!
//! - [`CollectionSource`]: an in-memory sequence; counts before searching
//! - [`RepositorySource`]: any [`Repository`](crate::core::store::Repository);
//!   counts after searching and persists mutations natively
//! - [`InMemoryRepository`]: a repository for tests and development

pub mod collection;
pub mod in_memory;
pub mod repository;

#[cfg(test)]
pub(crate) mod fixtures;

pub use collection::{CollectionSource, FindFn};
pub use in_memory::{InMemoryRepository, KeyGenerator};
pub use repository::RepositorySource;
