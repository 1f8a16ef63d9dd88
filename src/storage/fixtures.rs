//! Records shared by the storage unit tests

use crate::core::entity::{GridRow, HasSchema, Record};
use crate::core::field::{FieldKind, FieldValue};
use crate::core::schema::Schema;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category_id: Option<i64>,
}

impl Product {
    pub fn new(id: i64, name: &str, price: f64, category_id: Option<i64>) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            category_id,
        }
    }
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
            _ => None,
        }
    }
}

impl GridRow for Product {
    fn id(&self) -> i64 {
        self.id
    }
}

pub fn catalog() -> Vec<Product> {
    vec![
        Product::new(1, "Anvil", 120.0, Some(1)),
        Product::new(2, "Bucket", 8.5, Some(2)),
        Product::new(3, "Chisel", 14.0, Some(1)),
        Product::new(4, "Drill", 89.9, None),
        Product::new(5, "Easel", 45.0, Some(2)),
        Product::new(6, "Funnel", 3.2, Some(2)),
    ]
}
