//! Listing queries: predicate, sort key and page window
//!
//! A [`ListQuery`] is what a data source receives for a listing. The two
//! source strategies choose their sort key differently, so the query exposes
//! both choices and leaves the decision to the source.

use crate::config::GridConfig;
use crate::core::entity::Record;
use crate::core::error::{ConfigError, GridError};
use crate::core::field::FieldValue;
use crate::core::filter::Predicate;
use crate::core::request::GridRequest;
use crate::core::schema::Schema;
use crate::core::validation::ValidationState;

/// Field and direction to order by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Physical record field
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    pub fn new(field: impl Into<String>, descending: bool) -> Self {
        Self {
            field: field.into(),
            descending,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, false)
    }

    /// Stable sort; missing values come first in ascending order
    pub fn sort<R: Record>(&self, items: &mut [R]) {
        items.sort_by(|a, b| {
            let left = a.field_value(&self.field).unwrap_or(FieldValue::Null);
            let right = b.field_value(&self.field).unwrap_or(FieldValue::Null);
            let ordering = left.sort_cmp(&right);
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
}

/// Slice of the result to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: usize,
    pub take: usize,
}

impl PageWindow {
    /// Window of `page_size * pages_count` rows starting at page `page_index`
    pub fn new(page_index: usize, page_size: usize, pages_count: usize) -> Self {
        Self {
            skip: page_index.saturating_mul(page_size),
            take: page_size.saturating_mul(pages_count.max(1)),
        }
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.skip).take(self.take).collect()
    }
}

/// Everything a data source needs to answer a listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Search predicate over physical record fields
    pub predicate: Predicate,
    /// Requested sort field, as sent by the client
    pub sort_field: Option<String>,
    pub sort_descending: bool,
    pub page_index: usize,
    pub page_size: Option<usize>,
    pub pages_count: Option<usize>,
    pub paging: bool,
    pub sorting: bool,
}

impl ListQuery {
    pub fn new(request: &GridRequest, predicate: Predicate, config: &GridConfig) -> Self {
        Self {
            predicate,
            sort_field: request.sort_field.clone(),
            sort_descending: request.sort_descending,
            page_index: request.page_index,
            page_size: request.page_size,
            pages_count: request.pages_count,
            paging: config.paging,
            sorting: config.sorting,
        }
    }

    /// Query returning every record unsorted
    pub fn all() -> Self {
        Self {
            predicate: Predicate::Always,
            sort_field: None,
            sort_descending: false,
            page_index: 0,
            page_size: None,
            pages_count: None,
            paging: false,
            sorting: false,
        }
    }

    /// Page window, when paging is enabled and the client sent a page size
    pub fn page_window(&self) -> Option<PageWindow> {
        match (self.paging, self.page_size) {
            (true, Some(size)) => Some(PageWindow::new(
                self.page_index,
                size,
                self.pages_count.unwrap_or(1),
            )),
            _ => None,
        }
    }

    /// Sort key for in-memory collections
    ///
    /// Only applied when sorting is enabled. Without a requested field the
    /// first declared field is used with the requested direction.
    pub fn collection_sort(&self, schema: &Schema) -> Result<Option<SortKey>, GridError> {
        if !self.sorting {
            return Ok(None);
        }
        let field = match &self.sort_field {
            Some(requested) => resolve_sort_field(schema, requested)?,
            None => first_field(schema)?,
        };
        Ok(Some(SortKey::new(field, self.sort_descending)))
    }

    /// Sort key for repositories
    ///
    /// Repositories need a stable order to page, so with paging or sorting
    /// enabled and no requested field the first declared field ascending is
    /// used.
    pub fn repository_sort(&self, schema: &Schema) -> Result<Option<SortKey>, GridError> {
        if !(self.paging || self.sorting) {
            return Ok(None);
        }
        match &self.sort_field {
            Some(requested) => Ok(Some(SortKey::new(
                resolve_sort_field(schema, requested)?,
                self.sort_descending,
            ))),
            None => Ok(Some(SortKey::ascending(first_field(schema)?))),
        }
    }
}

/// Number of pages for a record count
///
/// Without a usable page size everything fits on one page.
pub fn total_pages(records: usize, page_size: Option<usize>) -> usize {
    match page_size {
        Some(size) if size > 0 => records.div_ceil(size),
        _ => usize::from(records > 0),
    }
}

fn resolve_sort_field(schema: &Schema, requested: &str) -> Result<String, GridError> {
    match schema.resolve_field(requested) {
        Some(def) => Ok(def.name().to_string()),
        None => {
            let mut state = ValidationState::new();
            state.add_error(
                requested,
                format!("'{}' is not a sortable field of {}", requested, schema.name()),
            );
            Err(GridError::validation("sort order", state))
        }
    }
}

fn first_field(schema: &Schema) -> Result<String, GridError> {
    schema
        .first_field()
        .map(|def| def.name().to_string())
        .ok_or_else(|| {
            ConfigError::NoAccessibleFields {
                record: schema.name().to_string(),
            }
            .into()
        })
}
