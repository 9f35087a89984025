pub mod handler;
pub mod model;

pub use model::{Answer, BaseRequest, Document, RouteResponseItem, StatRequest};

use thiserror::Error;

use crate::snapshot;

/// Fatal input-phase errors. Everything here aborts the run with no partial
/// output; per-query "not found" is data inside [`Answer`], never an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed request document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required settings section: {0}")]
    MissingSection(&'static str),
    #[error("invalid request document: {0}")]
    Invalid(String),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] snapshot::Error),
}
