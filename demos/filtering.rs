/// Dual-Mode Filtering Example
///
/// This example demonstrates:
/// - In-memory text search on a fully loaded table
/// - Server-side delegation when the table is partially cached
/// - Combining search terms with `||`

use std::sync::Arc;

use async_trait::async_trait;
use lazytable::{
    Chunk, ChunkQuery, ColumnDescriptor, ColumnList, DataFilter, DataLoader, DataTable, DataType,
    DataValue, Result, TextFilter,
};

fn fruit_columns() -> Result<ColumnList> {
    ColumnList::from_descriptors(vec![
        ColumnDescriptor::with_type("id", "ID", DataType::Int32),
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("description", "Description"),
        ColumnDescriptor::with_type("price", "Price", DataType::Currency),
    ])
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

/// Filters the catalog server-side, like a real endpoint would.
struct CatalogService;

#[async_trait]
impl DataLoader for CatalogService {
    async fn load_chunk(&self, query: &ChunkQuery) -> Result<Chunk> {
        println!(
            "   [server] search source={:?} filter={:?}",
            query.source,
            query.filters.first().map(|f| f.value.as_str())
        );
        let rows: Vec<Vec<DataValue>> = match query.filters.first() {
            Some(filter) => {
                let needle = filter.value.to_lowercase();
                fruit_rows()
                    .into_iter()
                    .filter(|row| {
                        row.iter().any(|cell| {
                            !cell.is_null() && cell.to_string().to_lowercase().contains(&needle)
                        })
                    })
                    .collect()
            }
            None => fruit_rows(),
        };
        let total = rows.len();
        Ok(Chunk { rows, total })
    }
}

fn print_table(label: &str, table: &DataTable) -> Result<()> {
    println!("   {} ({} rows):", label, table.cached_count());
    for row in table.cached_rows() {
        println!("     {} - {}", row.get_value("name")?, row.get_value("price")?);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    println!("=== LazyTable Filtering Example ===\n");

    let loader = Arc::new(CatalogService);

    // 1. Fully loaded table: filtering scans in memory.
    println!("1. In-memory filtering...");
    let source = Arc::new(DataTable::from_rows(fruit_columns()?, fruit_rows()));
    let mut filter = TextFilter::new(loader.clone(), source, "products");

    let result = filter.apply("apple").await?;
    print_table("apple", &result)?;

    let result = filter.apply("apple || melon").await?;
    print_table("apple || melon", &result)?;

    let cleared = filter.clear().await?;
    println!("   cleared, back to {} rows\n", cleared.cached_count());

    // 2. Partially cached table: the same filter goes to the server.
    println!("2. Server-side filtering...");
    let partial = Arc::new(DataTable::with_loader(fruit_columns()?, loader.clone()));
    partial.add_row(fruit_rows()[0].clone());
    partial.set_total(5)?;
    println!("   cached {} of {} rows", partial.cached_count(), partial.total());

    let mut filter = TextFilter::new(loader, partial, "products");
    let result = filter.apply("orange").await?;
    print_table("orange", &result)?;

    Ok(())
}
