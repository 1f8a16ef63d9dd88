//! The grid engine: dispatch, result composition and the axum adapter

pub mod engine;
pub mod http;
pub mod response;

pub use engine::{AddFn, DeleteFn, EditFn, GridEngine, GridEngineBuilder, IdentityFn};
pub use http::GridValues;
pub use response::{FormAck, GridRecord, GridReply, GridResponse};
