//! # grid-rs
//!
//! A tabular data request engine for jqGrid-style data grids.
//!
//! ## Features
//!
//! - **Search Criteria**: single filters, AND/OR filter groups and implicit per-field matching
//! - **Typed Predicates**: criteria lowered to a predicate tree over declared record fields
//! - **Two Data Access Modes**: in-memory collections and abstract repositories
//! - **CRUD Dispatch**: list, add, edit and delete behind one reply protocol
//! - **Configuration-Based**: parameter names, messages and policies loadable from YAML
//! - **Axum Integration**: request values extractor and `IntoResponse` replies
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use grid::prelude::*;
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Product {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl HasSchema for Product {
//!     type Key = i64;
//!
//!     fn schema() -> &'static Schema {
//!         static SCHEMA: OnceLock<Schema> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::builder("product")
//!                 .identity("id", FieldKind::Integer)
//!                 .field("name", FieldKind::String)
//!                 .build()
//!         })
//!     }
//! }
//!
//! impl Record for Product {
//!     fn key(&self) -> i64 { self.id }
//!
//!     fn field_value(&self, field: &str) -> Option<FieldValue> {
//!         match field {
//!             "id" => Some(self.id.into()),
//!             "name" => Some(self.name.as_str().into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl GridRow for Product {
//!     fn id(&self) -> i64 { self.id }
//! }
//!
//! let engine = GridEngine::<Product, Product, _>::builder(
//!     RepositorySource::new(Arc::new(InMemoryRepository::with_records(products))),
//! )
//! .with_config(GridConfig::default().with_paging().with_sorting())
//! .build();
//!
//! let response = engine.respond(values).await;
//! ```

pub mod config;
pub mod core;
pub mod grid;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{GridKey, GridRow, HasSchema, Record, RowModel},
        field::{FieldKind, FieldValue},
        schema::{FieldDef, Schema},
        store::{DataSource, Listing, Repository},
        validation::{Binder, Bound, SchemaBinder, ValidationState, validators},
    };

    // === Criteria ===
    pub use crate::core::{
        filter::{CompareOp, FilterBuilder, Predicate, TextOp},
        query::{ListQuery, PageWindow, SortKey},
        request::{
            GridRequest, GroupOp, Operation, RequestValues, SearchFilter, SearchFilterGroup,
            SearchOperator,
        },
    };

    // === Errors and Outcomes ===
    pub use crate::core::{
        error::{ConfigError, GridError},
        outcome::OperationOutcome,
    };

    // === Engine ===
    pub use crate::grid::{FormAck, GridEngine, GridReply, GridResponse, GridValues};

    // === Storage ===
    pub use crate::storage::{CollectionSource, InMemoryRepository, RepositorySource};

    // === Config ===
    pub use crate::config::{CellLayout, GetPolicy, GridConfig, OperationConfig, ParameterNames};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::{Arc, OnceLock};
}
