/// LazyTable Data Loader Contract
///
/// A `DataLoader` fetches one bounded window of rows from a remote source and
/// reports the dataset's total size as of that fetch. Virtual tables use it
/// to fill cache misses; the text filter uses it to delegate filtering to the
/// server when the dataset is not fully resident.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::column::DataValue;
use crate::error::{Result, TableError};

/// Fetch window size used when a table is not configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// One filter criterion carried by a chunk request. A `field` of `None`
/// means the criterion applies across all searchable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub value: String,
}

impl FilterSpec {
    /// A field-agnostic criterion.
    pub fn any_field(value: impl Into<String>) -> Self {
        FilterSpec {
            field: None,
            value: value.into(),
        }
    }

    pub fn on_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterSpec {
            field: Some(field.into()),
            value: value.into(),
        }
    }
}

/// Sort order for a chunk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub descending: bool,
}

/// A chunk request: the absolute window plus optional filter and sort
/// criteria. `source` scopes the request to a logical collection on the
/// server side (the filter context token).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkQuery {
    pub offset: usize,
    pub limit: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ChunkQuery {
    /// A plain window request with no criteria.
    pub fn window(offset: usize, limit: usize) -> Self {
        ChunkQuery {
            offset,
            limit,
            ..ChunkQuery::default()
        }
    }
}

/// A chunk response: row values for the requested window, in column order,
/// plus the dataset's total size at time of fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub rows: Vec<Vec<DataValue>>,
    pub total: usize,
}

impl Chunk {
    /// Decodes the `{ "rows": [[...], ...], "total": N }` payload shape
    /// servers respond with.
    pub fn from_json(payload: serde_json::Value) -> Result<Self> {
        serde_json::from_value(payload)
            .map_err(|err| TableError::Validation(format!("malformed chunk payload: {}", err)))
    }
}

/// Fetches chunks of a logical dataset.
///
/// Implementations typically wrap an HTTP client or an in-process store. A
/// failed request must be surfaced as an error; callers never cache partial
/// results from a failed fetch.
#[async_trait]
pub trait DataLoader: Send + Sync {
    async fn load_chunk(&self, query: &ChunkQuery) -> Result<Chunk>;
}
