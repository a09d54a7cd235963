/// LazyTable Virtual Table
///
/// A `DataTable` models a logical dataset that may be larger than what is
/// held in memory. It owns a column list, a cache of rows indexed by
/// absolute logical position, the authoritative total record count, and
/// optionally a `DataLoader` used to fetch uncached windows in chunks.
///
/// Three numbers stay consistent at all times: the cached row count, the
/// requested chunk window, and the reported total. `is_fully_loaded` (cached
/// count equals total) is the single predicate filters use to decide between
/// an in-memory scan and server-side delegation.
///
/// Filtering and similar transforms never mutate a source table; they build
/// a new one. The cache itself is only mutated by `add_row` and chunk
/// merging, and a merge is all-or-nothing: a failed fetch caches nothing.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::column::{ColumnList, DataValue};
use crate::error::{Result, TableError};
use crate::loader::{Chunk, ChunkQuery, DataLoader, DEFAULT_CHUNK_SIZE};
use crate::row::DataRow;

struct TableState {
    /// Cached rows keyed by absolute position. A prefix or an arbitrary
    /// subset of the logical dataset.
    rows: BTreeMap<usize, DataRow>,
    /// Authoritative logical size. Tracks the cache size until pinned.
    total: usize,
    /// Set once `set_total` or a chunk response reported the true size.
    total_pinned: bool,
}

pub struct DataTable {
    columns: Arc<ColumnList>,
    loader: Option<Arc<dyn DataLoader>>,
    chunk_size: usize,
    state: RwLock<TableState>,
}

impl DataTable {
    /// Base constructor over an already-shared column list.
    pub fn from_shared(columns: Arc<ColumnList>, loader: Option<Arc<dyn DataLoader>>) -> Self {
        DataTable {
            columns,
            loader,
            chunk_size: DEFAULT_CHUNK_SIZE,
            state: RwLock::new(TableState {
                rows: BTreeMap::new(),
                total: 0,
                total_pinned: false,
            }),
        }
    }

    /// An empty, fully in-memory table.
    pub fn new(columns: ColumnList) -> Self {
        Self::from_shared(Arc::new(columns), None)
    }

    /// A fully loaded in-memory table; the total equals the row count.
    pub fn from_rows(columns: ColumnList, rows: Vec<Vec<DataValue>>) -> Self {
        let table = Self::new(columns);
        for values in rows {
            table.add_row(values);
        }
        table
    }

    /// A table that starts empty and is populated on demand through the
    /// given loader.
    pub fn with_loader(columns: ColumnList, loader: Arc<dyn DataLoader>) -> Self {
        Self::from_shared(Arc::new(columns), Some(loader))
    }

    pub fn columns(&self) -> &Arc<ColumnList> {
        &self.columns
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Sets the fetch window size used for cache misses.
    pub fn set_chunk_size(&mut self, chunk_size: usize) -> Result<()> {
        if chunk_size == 0 {
            return Err(TableError::Validation("chunk size must be positive".to_string()));
        }
        self.chunk_size = chunk_size;
        Ok(())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, TableState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, TableState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends a row at the next absolute position.
    ///
    /// The total tracks the cache size until `set_total` pins it; a pinned
    /// total only moves when the cache outgrows it, so `cached_count() <=
    /// total()` holds at all times.
    pub fn add_row(&self, values: Vec<DataValue>) {
        let row = DataRow::new(Arc::clone(&self.columns), values);
        let mut state = self.write_state();
        let position = state.rows.last_key_value().map(|(key, _)| key + 1).unwrap_or(0);
        state.rows.insert(position, row);
        if !state.total_pinned || state.rows.len() > state.total {
            state.total = state.rows.len().max(state.total);
        }
    }

    /// Pins the authoritative size of the logical dataset. Required whenever
    /// the table is populated incrementally from a partial source.
    pub fn set_total(&self, total: usize) -> Result<()> {
        let mut state = self.write_state();
        if total < state.rows.len() {
            return Err(TableError::Validation(format!(
                "total {} is below the cached row count {}",
                total,
                state.rows.len()
            )));
        }
        state.total = total;
        state.total_pinned = true;
        Ok(())
    }

    /// Authoritative logical size of the dataset.
    pub fn total(&self) -> usize {
        self.read_state().total
    }

    /// Number of rows physically held.
    pub fn cached_count(&self) -> usize {
        self.read_state().rows.len()
    }

    /// True iff the whole logical dataset is cached.
    pub fn is_fully_loaded(&self) -> bool {
        let state = self.read_state();
        state.rows.len() == state.total
    }

    /// Snapshot of the cached rows in absolute-position order.
    pub fn cached_rows(&self) -> Vec<DataRow> {
        self.read_state().rows.values().cloned().collect()
    }

    /// Drops all cached rows and resets the counters.
    pub fn clear(&self) {
        let mut state = self.write_state();
        state.rows.clear();
        state.total = 0;
        state.total_pinned = false;
    }

    /// Resolves a single row by absolute logical position.
    ///
    /// A cached index returns without suspension. An uncached index with a
    /// loader attached fetches the chunk-aligned window covering it, merges
    /// the response into the cache and retries; with no loader, or when the
    /// loader has no row at that offset, the result is `None`.
    pub async fn get_row(&self, index: usize) -> Result<Option<DataRow>> {
        {
            let state = self.read_state();
            if let Some(row) = state.rows.get(&index) {
                return Ok(Some(row.clone()));
            }
        }

        let Some(loader) = self.loader.as_ref() else {
            return Ok(None);
        };

        let offset = index - index % self.chunk_size;
        debug!(index, offset, limit = self.chunk_size, "row cache miss, fetching chunk");
        let chunk = loader.load_chunk(&ChunkQuery::window(offset, self.chunk_size)).await?;
        self.merge_chunk(offset, chunk)?;

        Ok(self.read_state().rows.get(&index).cloned())
    }

    /// Resolves a range of rows, fetching only the windows with uncached
    /// positions. The range is clamped to the dataset's total.
    pub async fn get_rows(&self, range: Range<usize>) -> Result<Vec<DataRow>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(loader) = self.loader.as_ref() {
            let mut offset = range.start - range.start % self.chunk_size;
            while offset < range.end {
                if self.window_has_gap(offset, &range) {
                    debug!(offset, limit = self.chunk_size, "range gap, fetching chunk");
                    let chunk = loader.load_chunk(&ChunkQuery::window(offset, self.chunk_size)).await?;
                    self.merge_chunk(offset, chunk)?;
                }
                offset += self.chunk_size;
            }
        }

        let state = self.read_state();
        let end = range.end.min(state.total);
        Ok((range.start..end)
            .filter_map(|index| state.rows.get(&index).cloned())
            .collect())
    }

    /// True when the chunk window at `offset` intersects `range` at an
    /// uncached position that is (as far as currently known) inside the
    /// dataset.
    fn window_has_gap(&self, offset: usize, range: &Range<usize>) -> bool {
        let state = self.read_state();
        let start = offset.max(range.start);
        let mut end = (offset + self.chunk_size).min(range.end);
        if state.total_pinned {
            end = end.min(state.total);
        }
        (start..end).any(|index| !state.rows.contains_key(&index))
    }

    /// Merges a fetched chunk into the cache at the given absolute offset.
    ///
    /// All-or-nothing: the invariant check happens before any row lands, and
    /// a later fetch overwrites a cached row at the same offset (last write
    /// wins, whole rows only). The response total is authoritative.
    pub(crate) fn merge_chunk(&self, offset: usize, chunk: Chunk) -> Result<()> {
        let mut state = self.write_state();

        let fresh = chunk
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| !state.rows.contains_key(&(offset + i)))
            .count();
        let prospective = state.rows.len() + fresh;
        if chunk.total < prospective {
            return Err(TableError::Validation(format!(
                "chunk total {} is below the {} rows that would be cached",
                chunk.total, prospective
            )));
        }

        for (i, values) in chunk.rows.into_iter().enumerate() {
            let row = DataRow::new(Arc::clone(&self.columns), values);
            state.rows.insert(offset + i, row);
        }
        state.total = chunk.total;
        state.total_pinned = true;

        debug!(offset, cached = state.rows.len(), total = state.total, "merged chunk into cache");
        Ok(())
    }
}

impl std::fmt::Debug for DataTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        write!(
            f,
            "DataTable {{ columns: {}, cached: {}, total: {} }}",
            self.columns.size(),
            state.rows.len(),
            state.total
        )
    }
}
