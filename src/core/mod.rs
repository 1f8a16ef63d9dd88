//! Core module containing the criteria model, filter builder and data access traits

pub mod entity;
pub mod error;
pub mod field;
pub mod filter;
pub mod outcome;
pub mod query;
pub mod request;
pub mod schema;
pub mod store;
pub mod validation;

pub use entity::{GridKey, GridRow, HasSchema, Record, RowModel};
pub use error::{ConfigError, ErrorResponse, GridError};
pub use field::{FieldKind, FieldValue};
pub use filter::{CompareOp, FilterBuilder, Predicate, TextOp};
pub use outcome::OperationOutcome;
pub use query::{ListQuery, PageWindow, SortKey, total_pages};
pub use request::{
    GridRequest, GroupOp, Operation, OperationCode, RequestValues, SearchFilter,
    SearchFilterGroup, SearchOperator,
};
pub use schema::{FieldDef, Schema, SchemaBuilder};
pub use store::{DataSource, Listing, Repository};
pub use validation::{Binder, Bound, SchemaBinder, ValidationState};
