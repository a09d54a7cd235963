/// LazyTable Filter Engine
///
/// Filters take a source table and produce a table restricted to matching
/// rows, without ever mutating the source. The concrete `TextFilter` picks
/// its strategy from the source's `is_fully_loaded` state: scan the cached
/// rows when the whole dataset is resident, otherwise delegate the criteria
/// to the data loader so the server filters instead of downloading the
/// remote dataset just to scan it locally.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::loader::{ChunkQuery, DataLoader, FilterSpec};
use crate::row::DataRow;
use crate::table::DataTable;

/// Base contract for filters over a virtual table.
#[async_trait]
pub trait DataFilter: Send {
    /// Current filter criteria. Empty means "no filter".
    fn value(&self) -> &str;

    /// Sets the criteria and returns a table restricted to matching rows.
    /// The neutral (empty) criteria returns the original source table
    /// unchanged, as the same instance.
    async fn apply(&mut self, criteria: &str) -> Result<Arc<DataTable>>;

    /// Equivalent to applying the neutral value.
    async fn clear(&mut self) -> Result<Arc<DataTable>>;
}

/// Case-insensitive substring search across all row values.
///
/// Criteria may combine independent search terms with `||`; a row matches
/// when any term occurs in the textual form of any of its values. When the
/// filter has to delegate, the criteria string is forwarded un-split as a
/// single field-agnostic criterion, scoped by the filter's context token.
pub struct TextFilter {
    loader: Arc<dyn DataLoader>,
    source: Arc<DataTable>,
    context: String,
    value: String,
    last_result: Option<Arc<DataTable>>,
}

impl TextFilter {
    /// `context` identifies the logical collection the filter is scoped to
    /// on the server side (e.g. an entity name).
    pub fn new(loader: Arc<dyn DataLoader>, source: Arc<DataTable>, context: impl Into<String>) -> Self {
        TextFilter {
            loader,
            source,
            context: context.into(),
            value: String::new(),
            last_result: None,
        }
    }

    /// The table the filter was created over.
    pub fn source(&self) -> &Arc<DataTable> {
        &self.source
    }

    /// The table produced by the most recent `apply`, if any.
    pub fn result(&self) -> Option<&Arc<DataTable>> {
        self.last_result.as_ref()
    }

    /// In-memory strategy: scan the cached rows against the `||`-separated
    /// terms. The result shares the source's column list and is fully
    /// loaded by construction.
    fn scan(&self, criteria: &str) -> Arc<DataTable> {
        let terms: Vec<String> = criteria
            .split("||")
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();

        let result = DataTable::from_shared(Arc::clone(self.source.columns()), None);
        for row in self.source.cached_rows() {
            if row_matches(&row, &terms) {
                result.add_row(row.to_vec());
            }
        }
        Arc::new(result)
    }

    /// Server-side strategy: forward the criteria to the loader and wrap
    /// its response. No local scanning.
    async fn delegate(&self, criteria: &str) -> Result<Arc<DataTable>> {
        let query = ChunkQuery {
            offset: 0,
            limit: self.source.chunk_size(),
            filters: vec![FilterSpec::any_field(criteria)],
            sort: None,
            source: Some(self.context.clone()),
        };
        let chunk = self.loader.load_chunk(&query).await?;

        let result = DataTable::from_shared(Arc::clone(self.source.columns()), Some(Arc::clone(&self.loader)));
        result.merge_chunk(0, chunk)?;
        Ok(Arc::new(result))
    }
}

fn row_matches(row: &DataRow, terms: &[String]) -> bool {
    row.iter().any(|value| {
        if value.is_null() {
            return false;
        }
        let text = value.to_string().to_lowercase();
        terms.iter().any(|term| text.contains(term.as_str()))
    })
}

#[async_trait]
impl DataFilter for TextFilter {
    fn value(&self) -> &str {
        &self.value
    }

    async fn apply(&mut self, criteria: &str) -> Result<Arc<DataTable>> {
        self.value = criteria.to_string();

        if criteria.is_empty() {
            self.last_result = None;
            return Ok(Arc::clone(&self.source));
        }

        let result = if self.source.is_fully_loaded() {
            debug!(criteria, "dataset fully cached, filtering in memory");
            self.scan(criteria)
        } else {
            debug!(criteria, context = %self.context, "dataset partially cached, delegating filter to loader");
            self.delegate(criteria).await?
        };

        self.last_result = Some(Arc::clone(&result));
        Ok(result)
    }

    async fn clear(&mut self) -> Result<Arc<DataTable>> {
        self.apply("").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnDescriptor, ColumnList, DataType, DataValue};
    use crate::error::TableError;
    use crate::loader::Chunk;
    use std::sync::Mutex;

    fn fruit_columns() -> ColumnList {
        ColumnList::from_descriptors(vec![
            ColumnDescriptor::with_type("id", "ID", DataType::Int32),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("description", "Description"),
            ColumnDescriptor::with_type("price", "Price", DataType::Currency),
        ])
        .unwrap()
    }

    fn fruit_rows() -> Vec<Vec<DataValue>> {
        vec![
            vec![1.into(), "Apple".into(), "Fresh red apple".into(), 1.99.into()],
            vec![2.into(), "Banana".into(), "Yellow fruit".into(), 0.99.into()],
            vec![3.into(), "Orange".into(), "Juicy citrus".into(), 1.49.into()],
            vec![4.into(), "Pineapple".into(), "Tropical fruit".into(), 3.99.into()],
            vec![5.into(), "Watermelon".into(), "Summer favorite".into(), 5.99.into()],
        ]
    }

    /// Emulates server-side filtering over the full dataset, recording
    /// every query it receives.
    struct ServerLoader {
        data: Vec<Vec<DataValue>>,
        calls: Mutex<Vec<ChunkQuery>>,
    }

    impl ServerLoader {
        fn new() -> Arc<Self> {
            Arc::new(ServerLoader {
                data: fruit_rows(),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl DataLoader for ServerLoader {
        async fn load_chunk(&self, query: &ChunkQuery) -> Result<Chunk> {
            self.calls.lock().unwrap().push(query.clone());
            let rows: Vec<Vec<DataValue>> = match query.filters.first() {
                Some(filter) => {
                    let needle = filter.value.to_lowercase();
                    self.data
                        .iter()
                        .filter(|row| {
                            row.iter().any(|cell| {
                                !cell.is_null() && cell.to_string().to_lowercase().contains(&needle)
                            })
                        })
                        .cloned()
                        .collect()
                }
                None => self.data.clone(),
            };
            let total = rows.len();
            Ok(Chunk { rows, total })
        }
    }

    fn in_memory_filter() -> TextFilter {
        let source = Arc::new(DataTable::from_rows(fruit_columns(), fruit_rows()));
        TextFilter::new(ServerLoader::new(), source, "products")
    }

    fn names(table: &DataTable) -> Vec<String> {
        table
            .cached_rows()
            .iter()
            .map(|row| row.get_value("name").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_value_is_empty_after_creation() {
        let filter = in_memory_filter();
        assert_eq!(filter.value(), "");
        assert!(filter.result().is_none());
    }

    #[tokio::test]
    async fn test_apply_sets_value() {
        let mut filter = in_memory_filter();
        filter.apply("apple").await.unwrap();
        assert_eq!(filter.value(), "apple");
    }

    #[tokio::test]
    async fn test_empty_criteria_returns_source_instance() {
        let mut filter = in_memory_filter();
        let result = filter.apply("").await.unwrap();
        assert!(Arc::ptr_eq(&result, filter.source()));
    }

    #[tokio::test]
    async fn test_clear_returns_source_and_resets_value() {
        let mut filter = in_memory_filter();
        filter.apply("apple").await.unwrap();
        let result = filter.clear().await.unwrap();
        assert!(Arc::ptr_eq(&result, filter.source()));
        assert_eq!(filter.value(), "");
    }

    #[tokio::test]
    async fn test_in_memory_scan_when_fully_loaded() {
        let mut filter = in_memory_filter();
        let result = filter.apply("apple").await.unwrap();

        assert!(!Arc::ptr_eq(&result, filter.source()));
        assert_eq!(result.cached_count(), 2);
        assert_eq!(names(&result), vec!["Apple", "Pineapple"]);
        assert!(result.is_fully_loaded());
        // The result shares the source's column list.
        assert!(Arc::ptr_eq(result.columns(), filter.source().columns()));
        // The loader never saw the request.
        assert_eq!(filter.source().cached_count(), 5);
    }

    #[tokio::test]
    async fn test_multiple_terms_via_separator() {
        let mut filter = in_memory_filter();
        let result = filter.apply("apple || melon").await.unwrap();
        assert_eq!(names(&result), vec!["Apple", "Pineapple", "Watermelon"]);
    }

    #[tokio::test]
    async fn test_matches_across_columns() {
        let mut filter = in_memory_filter();
        let result = filter.apply("fruit").await.unwrap();
        // Matched through the description column.
        assert_eq!(names(&result), vec!["Banana", "Pineapple"]);
    }

    #[tokio::test]
    async fn test_case_insensitive_matching() {
        let mut filter = in_memory_filter();
        let result = filter.apply("APPLE").await.unwrap();
        assert_eq!(names(&result), vec!["Apple", "Pineapple"]);
    }

    #[tokio::test]
    async fn test_no_matches_yields_empty_table() {
        let mut filter = in_memory_filter();
        let result = filter.apply("nonexistent").await.unwrap();
        assert_eq!(result.cached_count(), 0);
        assert!(result.cached_rows().is_empty());
    }

    #[tokio::test]
    async fn test_numeric_values_match_textual_form() {
        let mut filter = in_memory_filter();
        let result = filter.apply("1.99").await.unwrap();
        assert_eq!(names(&result), vec!["Apple"]);
        assert_eq!(
            result.cached_rows()[0].get_value("price").unwrap(),
            DataValue::from(1.99)
        );
    }

    #[tokio::test]
    async fn test_partial_table_delegates_to_loader() {
        let loader = ServerLoader::new();
        let partial = Arc::new(DataTable::from_shared(
            Arc::new(fruit_columns()),
            Some(loader.clone() as Arc<dyn DataLoader>),
        ));
        let rows = fruit_rows();
        partial.add_row(rows[0].clone());
        partial.add_row(rows[1].clone());
        partial.set_total(rows.len()).unwrap();
        assert!(!partial.is_fully_loaded());

        let mut filter = TextFilter::new(loader.clone(), partial, "products");
        let result = filter.apply("orange").await.unwrap();

        let calls = loader.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].filters, vec![FilterSpec::any_field("orange")]);
        assert_eq!(calls[0].source.as_deref(), Some("products"));
        drop(calls);

        assert_eq!(result.cached_count(), 1);
        assert_eq!(names(&result), vec!["Orange"]);
        assert_eq!(result.total(), 1);
        assert!(result.is_fully_loaded());
    }

    #[tokio::test]
    async fn test_delegation_failure_propagates() {
        struct FailingLoader;

        #[async_trait]
        impl DataLoader for FailingLoader {
            async fn load_chunk(&self, _query: &ChunkQuery) -> Result<Chunk> {
                Err(TableError::Loader("service unavailable".to_string()))
            }
        }

        let loader: Arc<dyn DataLoader> = Arc::new(FailingLoader);
        let partial = Arc::new(DataTable::from_shared(Arc::new(fruit_columns()), Some(loader.clone())));
        partial.add_row(fruit_rows()[0].clone());
        partial.set_total(5).unwrap();

        let mut filter = TextFilter::new(loader, partial, "products");
        let err = filter.apply("orange").await.unwrap_err();
        assert!(matches!(err, TableError::Loader(_)));
        assert_eq!(filter.source().cached_count(), 1);
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let mut filter: Box<dyn DataFilter> = Box::new(in_memory_filter());
        let result = filter.apply("melon").await.unwrap();
        assert_eq!(result.cached_count(), 1);
        assert_eq!(filter.value(), "melon");
    }
}
