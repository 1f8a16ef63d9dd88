//! CRUD dispatcher
//!
//! [`GridEngine`] reads the operation code of a request and runs exactly one
//! of list, add, edit or delete against its data source. Mutations go through
//! the configured callbacks, or through the data source itself when it
//! persists mutations natively.

use super::response::{GridReply, GridResponse};
use crate::config::GridConfig;
use crate::core::entity::{HasSchema, Record, RowModel};
use crate::core::error::GridError;
use crate::core::filter::FilterBuilder;
use crate::core::outcome::OperationOutcome;
use crate::core::query::ListQuery;
use crate::core::request::{GridRequest, Operation, OperationCode, RequestValues};
use crate::core::store::DataSource;
use crate::core::validation::{Binder, Bound, SchemaBinder, ValidationState};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::Instrument;

/// Custom add; may assign the key of the record
pub type AddFn<R> = Arc<dyn Fn(&mut R) -> OperationOutcome + Send + Sync>;

/// Custom edit of a record already updated from the row
pub type EditFn<R> = Arc<dyn Fn(&R) -> OperationOutcome + Send + Sync>;

/// Custom delete by key
pub type DeleteFn<R> = Arc<dyn Fn(&<R as HasSchema>::Key) -> OperationOutcome + Send + Sync>;

/// Identity of a freshly added record
pub type IdentityFn<R> = Arc<dyn Fn(&R) -> <R as HasSchema>::Key + Send + Sync>;

/// Grid request engine over one data source
///
/// `Row` is the row model exchanged with the grid, `R` the record the data
/// source stores.
///
/// # Example
///
/// ```rust,ignore
/// let engine = GridEngine::<ProductRow, Product, _>::builder(
///     RepositorySource::new(Arc::new(InMemoryRepository::with_records(products))),
/// )
/// .with_config(GridConfig::default().with_paging().with_sorting())
/// .build();
///
/// let reply = engine.execute(&values).await?;
/// ```
pub struct GridEngine<Row, R, S, B = SchemaBinder>
where
    R: Record,
{
    config: Arc<GridConfig>,
    source: S,
    binder: B,
    on_add: Option<AddFn<R>>,
    on_edit: Option<EditFn<R>>,
    on_delete: Option<DeleteFn<R>>,
    get_id: Option<IdentityFn<R>>,
    _row: PhantomData<fn() -> Row>,
}

/// Builder for [`GridEngine`]
pub struct GridEngineBuilder<Row, R, S, B = SchemaBinder>
where
    R: Record,
{
    engine: GridEngine<Row, R, S, B>,
}

impl<Row, R, S> GridEngine<Row, R, S, SchemaBinder>
where
    R: Record,
{
    /// Start building an engine over `source` with the default configuration
    pub fn builder(source: S) -> GridEngineBuilder<Row, R, S, SchemaBinder> {
        GridEngineBuilder {
            engine: GridEngine {
                config: Arc::new(GridConfig::default()),
                source,
                binder: SchemaBinder,
                on_add: None,
                on_edit: None,
                on_delete: None,
                get_id: None,
                _row: PhantomData,
            },
        }
    }
}

impl<Row, R, S, B> GridEngineBuilder<Row, R, S, B>
where
    R: Record,
{
    pub fn with_config(mut self, config: GridConfig) -> Self {
        self.engine.config = Arc::new(config);
        self
    }

    /// Share a configuration between several engines
    pub fn with_shared_config(mut self, config: Arc<GridConfig>) -> Self {
        self.engine.config = config;
        self
    }

    /// Replace the binder used for row models and keys
    pub fn with_binder<B2: Binder>(self, binder: B2) -> GridEngineBuilder<Row, R, S, B2> {
        let engine = self.engine;
        GridEngineBuilder {
            engine: GridEngine {
                config: engine.config,
                source: engine.source,
                binder,
                on_add: engine.on_add,
                on_edit: engine.on_edit,
                on_delete: engine.on_delete,
                get_id: engine.get_id,
                _row: PhantomData,
            },
        }
    }

    pub fn on_add<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut R) -> OperationOutcome + Send + Sync + 'static,
    {
        self.engine.on_add = Some(Arc::new(f));
        self
    }

    pub fn on_edit<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> OperationOutcome + Send + Sync + 'static,
    {
        self.engine.on_edit = Some(Arc::new(f));
        self
    }

    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&R::Key) -> OperationOutcome + Send + Sync + 'static,
    {
        self.engine.on_delete = Some(Arc::new(f));
        self
    }

    /// Identity reported after an add, instead of the record key
    pub fn with_identity<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> R::Key + Send + Sync + 'static,
    {
        self.engine.get_id = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> GridEngine<Row, R, S, B> {
        self.engine
    }
}

impl<Row, R, S, B> GridEngine<Row, R, S, B>
where
    Row: RowModel<R> + HasSchema<Key = R::Key>,
    R: Record + Default,
    S: DataSource<R>,
    B: Binder,
{
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one request
    ///
    /// Failed operations and unknown operation codes are replies, not errors.
    pub async fn execute(&self, values: &RequestValues) -> Result<GridReply, GridError> {
        let code = OperationCode::from_values(values, &self.config.parameter_names);
        let span = tracing::debug_span!(
            "grid",
            record = R::schema().name(),
            operation = match &code {
                OperationCode::List => "list",
                OperationCode::Mutation(op) => op.as_str(),
                OperationCode::Unknown(_) => "unknown",
            }
        );

        async move {
            match code {
                OperationCode::List => self.list(values).await.map(GridReply::List),
                OperationCode::Mutation(Operation::Add) => self.add(values).await,
                OperationCode::Mutation(Operation::Edit) => self.edit(values).await,
                OperationCode::Mutation(Operation::Delete) => self.delete(values).await,
                OperationCode::Unknown(code) => {
                    tracing::warn!(code = %code, "Unknown grid operation");
                    Ok(GridReply::unknown_operation())
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Filter, count, sort and page, then map records onto rows
    pub async fn list(&self, values: &RequestValues) -> Result<GridResponse, GridError> {
        let request = GridRequest::bind(values, &self.config)
            .map_err(|state| GridError::validation("grid request", state))?;

        let predicate = FilterBuilder::new(R::schema())
            .build(&request, Row::schema(), values)
            .map_err(|state| GridError::validation("search criteria", state))?;
        tracing::debug!(searching = request.searching, ?predicate, "Built search predicate");

        let query = ListQuery::new(&request, predicate, &self.config);
        let listing = self.source.list(&query).await?;

        let rows: Vec<Row> = listing
            .items
            .iter()
            .map(|record| {
                let mut row = Row::default();
                row.copy_from(record);
                row
            })
            .collect();

        GridResponse::compose(
            &rows,
            listing.total,
            request.page_index,
            request.page_size,
            self.config.cell_layout,
        )
    }

    async fn add(&self, values: &RequestValues) -> Result<GridReply, GridError> {
        if self.on_add.is_none() && !self.source.supports_mutations() {
            return Err(GridError::missing_operation(Operation::Add.as_str()));
        }

        let Bound { model, state } = self.binder.bind::<Row>(values);
        let valid = match Row::schema().identity() {
            Some(identity) => state.is_valid_except(identity),
            None => state.is_valid(),
        };
        if !valid {
            return Err(GridError::validation("row model", state));
        }

        let mut record = R::default();
        model.apply_to(&mut record);

        let outcome = match &self.on_add {
            Some(add) => add(&mut record),
            None => self.source.add(&mut record).await?,
        };

        if outcome.is_success() {
            let rowid = match &self.get_id {
                Some(get_id) => get_id(&record),
                None => record.key(),
            };
            tracing::debug!(rowid = %rowid, "Added row");
            Ok(GridReply::added(rowid.to_string()))
        } else {
            Ok(self.failure(Operation::Add, &outcome))
        }
    }

    async fn edit(&self, values: &RequestValues) -> Result<GridReply, GridError> {
        if self.on_edit.is_none() && !self.source.supports_mutations() {
            return Err(GridError::missing_operation(Operation::Edit.as_str()));
        }
        if !self.source.can_find() {
            return Err(GridError::missing_operation("find"));
        }

        let Bound { model, state } = self.binder.bind::<Row>(values);
        if !state.is_valid() {
            return Err(GridError::validation("row model", state));
        }

        let key = model.id();
        let Some(mut record) = self.source.find(&key).await? else {
            tracing::debug!(key = %key, "Row to edit not found");
            return Ok(self.failure(Operation::Edit, &OperationOutcome::failed()));
        };
        model.apply_to(&mut record);

        let outcome = match &self.on_edit {
            Some(edit) => edit(&record),
            None => self.source.update(record).await?,
        };

        if outcome.is_success() {
            tracing::debug!(key = %key, "Edited row");
            Ok(GridReply::succeeded(self.config.edit.json_response))
        } else {
            Ok(self.failure(Operation::Edit, &outcome))
        }
    }

    async fn delete(&self, values: &RequestValues) -> Result<GridReply, GridError> {
        if self.on_delete.is_none() && !self.source.supports_mutations() {
            return Err(GridError::missing_operation(Operation::Delete.as_str()));
        }

        let key: R::Key = self
            .binder
            .bind_key(values, &self.config.parameter_names.id)
            .map_err(|state: ValidationState| GridError::validation("row identity", state))?;

        let outcome = match &self.on_delete {
            Some(delete) => delete(&key),
            None => self.source.delete(&key).await?,
        };

        if outcome.is_success() {
            tracing::debug!(key = %key, "Deleted row");
            Ok(GridReply::succeeded(self.config.delete.json_response))
        } else {
            Ok(self.failure(Operation::Delete, &outcome))
        }
    }

    fn failure(&self, operation: Operation, outcome: &OperationOutcome) -> GridReply {
        let (fallback, json_response) = match operation {
            Operation::Add => (self.config.add_error_message(), self.config.add.json_response),
            Operation::Edit => (self.config.edit_error_message(), self.config.edit.json_response),
            Operation::Delete => (
                self.config.delete_error_message(),
                self.config.delete.json_response,
            ),
        };
        let message = outcome.message_or(fallback);
        tracing::warn!(operation = %operation, reason = message, "Grid operation failed");
        GridReply::failed(operation, json_response, message)
    }
}
