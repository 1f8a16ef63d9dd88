//! Shared fixtures for the grid integration tests
//!
//! Provides a `Product` record with an adapting `ProductRow` view model, a
//! simple `Tag` record that is its own row, and helpers for building
//! request values and reading response bodies.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod grid_harness;
//! use grid_harness::*;
//! ```

#![allow(dead_code)]

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use grid::core::validation::validators::{max_value, not_blank, positive, required, string_length};
use grid::prelude::*;
use serde_json::Value;
use std::sync::Once;

// ---------------------------------------------------------------------------
// Product: persisted record, listed through ProductRow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category_id: Option<i64>,
    pub discontinued: bool,
    pub listed_at: Option<DateTime<Utc>>,
}

impl HasSchema for Product {
    type Key = i64;

    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder("product")
                .identity("id", FieldKind::Integer)
                .field("name", FieldKind::String)
                .field("price", FieldKind::Float)
                .field("category_id", FieldKind::Integer)
                .field("discontinued", FieldKind::Boolean)
                .field("listed_at", FieldKind::DateTime)
                .alias("category", "category_id")
                .build()
        })
    }
}

impl Record for Product {
    fn key(&self) -> i64 {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "price" => Some(self.price.into()),
            "category_id" => Some(self.category_id.into()),
            "discontinued" => Some(self.discontinued.into()),
            "listed_at" => Some(self.listed_at.into()),
            _ => None,
        }
    }
}

/// View model of a product as the grid shows it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: Option<i64>,
}

impl HasSchema for ProductRow {
    type Key = i64;

    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder("product_row")
                .identity("id", FieldKind::Integer)
                .def(
                    FieldDef::new("name", FieldKind::String)
                        .validate(required())
                        .validate(not_blank())
                        .validate(string_length(1, 40)),
                )
                .def(
                    FieldDef::new("price", FieldKind::Float)
                        .validate(positive())
                        .validate(max_value(10_000.0)),
                )
                .def(FieldDef::new("category", FieldKind::Integer).not_searchable())
                .build()
        })
    }
}

impl GridRow for ProductRow {
    fn id(&self) -> i64 {
        self.id
    }
}

impl RowModel<Product> for ProductRow {
    fn copy_from(&mut self, source: &Product) {
        self.id = source.id;
        self.name = source.name.clone();
        self.price = source.price;
        self.category = source.category_id;
    }

    fn apply_to(&self, dest: &mut Product) {
        dest.id = self.id;
        dest.name = self.name.clone();
        dest.price = self.price;
        dest.category_id = self.category;
    }
}

pub fn product(id: i64, name: &str, price: f64, category_id: Option<i64>) -> Product {
    Product {
        id,
        name: name.to_string(),
        price,
        category_id,
        discontinued: false,
        listed_at: Utc.with_ymd_and_hms(2024, 3, id as u32 % 28 + 1, 9, 0, 0).single(),
    }
}

/// Eight products over three categories, one without a category
pub fn products() -> Vec<Product> {
    vec![
        product(1, "Anvil", 120.0, Some(1)),
        product(2, "Bucket", 8.5, Some(2)),
        product(3, "Chisel", 14.0, Some(1)),
        product(4, "Drill", 89.9, None),
        product(5, "Easel", 45.0, Some(3)),
        product(6, "Funnel", 3.2, Some(2)),
        product(7, "Gauge", 19.0, Some(1)),
        product(8, "Hammer", 25.0, Some(1)),
    ]
}

pub type ProductRepository = InMemoryRepository<Product>;
pub type ProductRepoGrid = GridEngine<ProductRow, Product, RepositorySource<Product, ProductRepository>>;
pub type ProductCollectionGrid = GridEngine<ProductRow, Product, CollectionSource<Product>>;

/// Repository that numbers added products after the highest key
pub fn product_repository(records: Vec<Product>) -> ProductRepository {
    InMemoryRepository::with_records(records).with_key_generator(|p: &mut Product, existing: &[Product]| {
        p.id = existing.iter().map(|e| e.id).max().unwrap_or(0) + 1;
    })
}

pub fn repo_grid(config: GridConfig) -> ProductRepoGrid {
    GridEngine::<ProductRow, Product, _>::builder(RepositorySource::new(Arc::new(
        product_repository(products()),
    )))
    .with_config(config)
    .build()
}

// ---------------------------------------------------------------------------
// Tag: a simple row that is its own record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub id: u32,
    pub label: String,
}

impl HasSchema for Tag {
    type Key = u32;

    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder("tag")
                .identity("id", FieldKind::Integer)
                .def(FieldDef::new("label", FieldKind::String).validate(required()))
                .build()
        })
    }
}

impl Record for Tag {
    fn key(&self) -> u32 {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "label" => Some(self.label.as_str().into()),
            _ => None,
        }
    }
}

impl GridRow for Tag {
    fn id(&self) -> u32 {
        self.id
    }
}

pub fn tag(id: u32, label: &str) -> Tag {
    Tag {
        id,
        label: label.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

static TRACING: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Request values from name/value pairs
pub fn values(pairs: &[(&str, &str)]) -> RequestValues {
    pairs.iter().copied().collect()
}

/// Unwrap a list reply
pub fn expect_list(reply: GridReply) -> GridResponse {
    match reply {
        GridReply::List(response) => response,
        other => panic!("expected a list reply, got {:?}", other),
    }
}

/// Row ids of a list reply
pub fn row_ids(response: &GridResponse) -> Vec<&str> {
    response.rows.iter().map(|r| r.id.as_str()).collect()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body")
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}
