/// Chunked Loading Example
///
/// This example demonstrates:
/// - A table backed by a data loader
/// - Lazy, chunk-aligned fetching on row access
/// - Cache vs total accounting

use std::sync::Arc;

use async_trait::async_trait;
use lazytable::{
    Chunk, ChunkQuery, ColumnDescriptor, ColumnList, DataLoader, DataTable, DataType, DataValue,
    Result,
};

/// Plays the part of a paginated server endpoint.
struct OrderService {
    orders: Vec<Vec<DataValue>>,
}

impl OrderService {
    fn new() -> Self {
        let orders = (1..=250)
            .map(|i| {
                vec![
                    DataValue::from(i),
                    DataValue::from(format!("ORD-{:04}", i)),
                    DataValue::from(f64::from(i) * 12.5),
                ]
            })
            .collect();
        OrderService { orders }
    }
}

#[async_trait]
impl DataLoader for OrderService {
    async fn load_chunk(&self, query: &ChunkQuery) -> Result<Chunk> {
        println!("   [server] GET orders offset={} limit={}", query.offset, query.limit);
        let start = query.offset.min(self.orders.len());
        let end = (query.offset + query.limit).min(self.orders.len());
        Ok(Chunk {
            rows: self.orders[start..end].to_vec(),
            total: self.orders.len(),
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    println!("=== LazyTable Chunked Loading Example ===\n");

    let columns = ColumnList::from_descriptors(vec![
        ColumnDescriptor::with_type("id", "ID", DataType::Int32),
        ColumnDescriptor::new("number", "Order Number"),
        ColumnDescriptor::with_type("amount", "Amount", DataType::Currency),
    ])?;

    let mut table = DataTable::with_loader(columns, Arc::new(OrderService::new()));
    table.set_chunk_size(50)?;

    println!("1. Fresh table: cached {} / total {}\n", table.cached_count(), table.total());

    println!("2. First screenful...");
    let rows = table.get_rows(0..20).await?;
    println!("   got {} rows, cached {} / total {}\n", rows.len(), table.cached_count(), table.total());

    println!("3. Jump to row 137 (fetches the window covering it)...");
    if let Some(row) = table.get_row(137).await? {
        println!("   row 137: {} for {}", row.get_value("number")?, row.get_value("amount")?);
    }
    println!("   cached {} / total {}\n", table.cached_count(), table.total());

    println!("4. Re-reading a cached row is instant...");
    let row = table.get_row(137).await?.expect("row is cached now");
    println!("   row 137 again: {}", row.get_value("number")?);
    println!("   fully loaded: {}", table.is_fully_loaded());

    Ok(())
}
