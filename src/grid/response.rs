//! Result composer: list envelopes and mutation acknowledgments

use crate::config::CellLayout;
use crate::core::entity::GridRow;
use crate::core::error::GridError;
use crate::core::query::total_pages;
use crate::core::request::Operation;
use anyhow::anyhow;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// One listed row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRecord {
    pub id: String,
    pub cell: Value,
}

/// List envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridResponse {
    /// Number of pages
    pub total: usize,
    /// Current zero-based page index
    pub page: usize,
    /// Number of records
    pub records: usize,
    pub rows: Vec<GridRecord>,
}

impl GridResponse {
    /// Compose the envelope for one page of row models
    pub fn compose<Row: GridRow>(
        rows: &[Row],
        records: usize,
        page_index: usize,
        page_size: Option<usize>,
        layout: CellLayout,
    ) -> Result<Self, GridError> {
        let rows = rows
            .iter()
            .map(|row| {
                Ok(GridRecord {
                    id: row.id().to_string(),
                    cell: cell(row, layout)?,
                })
            })
            .collect::<Result<Vec<_>, GridError>>()?;

        Ok(Self {
            total: total_pages(records, page_size),
            page: page_index,
            records,
            rows,
        })
    }
}

fn cell<Row: GridRow>(row: &Row, layout: CellLayout) -> Result<Value, GridError> {
    let value = serde_json::to_value(row)
        .map_err(|e| anyhow!("Failed to serialize {} row: {}", Row::schema().name(), e))?;
    match (layout, value) {
        (CellLayout::Array, Value::Object(mut object)) => Ok(Value::Array(
            Row::schema()
                .fields()
                .iter()
                .map(|def| object.remove(def.name()).unwrap_or(Value::Null))
                .collect(),
        )),
        (_, value) => Ok(value),
    }
}

/// Mutation acknowledgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormAck {
    pub success: bool,
    pub message: Option<String>,
    pub rowid: Option<String>,
}

impl FormAck {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            rowid: None,
        }
    }

    pub fn with_rowid(rowid: impl Into<String>) -> Self {
        Self {
            rowid: Some(rowid.into()),
            ..Self::success()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            rowid: None,
        }
    }
}

/// Transport-neutral reply of the engine
#[derive(Debug, Clone, PartialEq)]
pub enum GridReply {
    /// List envelope, always 200
    List(GridResponse),
    /// JSON acknowledgment of a mutation
    Ack { status: StatusCode, ack: FormAck },
    /// Plain status with an optional text body
    Status { status: StatusCode, body: String },
}

impl GridReply {
    /// Successful add; always acknowledged with the new row id
    pub fn added(rowid: impl Into<String>) -> Self {
        GridReply::Ack {
            status: StatusCode::OK,
            ack: FormAck::with_rowid(rowid),
        }
    }

    /// Successful edit or delete
    pub fn succeeded(json_response: bool) -> Self {
        if json_response {
            GridReply::Ack {
                status: StatusCode::OK,
                ack: FormAck::success(),
            }
        } else {
            GridReply::Status {
                status: StatusCode::OK,
                body: String::new(),
            }
        }
    }

    /// Failed mutation
    ///
    /// JSON acknowledgments of a failed edit carry status 400; add and delete
    /// answer 200 and let the client read `success`. Without JSON the message
    /// is sent as a 400 text body on a single line.
    pub fn failed(operation: Operation, json_response: bool, message: &str) -> Self {
        if json_response {
            let status = match operation {
                Operation::Edit => StatusCode::BAD_REQUEST,
                Operation::Add | Operation::Delete => StatusCode::OK,
            };
            GridReply::Ack {
                status,
                ack: FormAck::failure(message),
            }
        } else {
            GridReply::Status {
                status: StatusCode::BAD_REQUEST,
                body: single_line(message),
            }
        }
    }

    /// Operation code outside the configured vocabulary
    pub fn unknown_operation() -> Self {
        GridReply::Status {
            status: StatusCode::BAD_REQUEST,
            body: String::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GridReply::List(_) => StatusCode::OK,
            GridReply::Ack { status, .. } | GridReply::Status { status, .. } => *status,
        }
    }
}

fn single_line(message: &str) -> String {
    message.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}
