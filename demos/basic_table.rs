/// Basic Virtual Table Example
///
/// This example demonstrates:
/// - Building a column list
/// - Creating a fully in-memory table
/// - Reading values by index and by column id

use lazytable::{ColumnDescriptor, ColumnList, DataTable, DataType, DataValue};

fn main() -> lazytable::Result<()> {
    println!("=== LazyTable Basic Table Example ===\n");

    // 1. Build the column list
    println!("1. Building columns...");
    let columns = ColumnList::from_descriptors(vec![
        ColumnDescriptor::with_type("id", "ID", DataType::Int32),
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("email", "Email"),
        ColumnDescriptor::with_type("age", "Age", DataType::Int32),
    ])?;
    println!("   {} columns\n", columns.size());

    // 2. Create a fully loaded in-memory table
    println!("2. Creating table...");
    let table = DataTable::from_rows(
        columns,
        vec![
            vec![1.into(), "Alice".into(), "alice@example.com".into(), 30.into()],
            vec![2.into(), "Bob".into(), "bob@example.com".into(), DataValue::Null],
            vec![3.into(), "Charlie".into(), "charlie@example.com".into(), 25.into()],
        ],
    );
    println!("   cached {} of {} rows, fully loaded: {}\n", table.cached_count(), table.total(), table.is_fully_loaded());

    // 3. Read rows
    println!("3. Reading rows...");
    for (i, row) in table.cached_rows().iter().enumerate() {
        let age = row.get_value("age")?;
        println!(
            "   Row {}: {} - {} (age: {})",
            i,
            row.get_value("name")?,
            row.get_value("email")?,
            if age.is_null() { "N/A".to_string() } else { age.to_string() }
        );
    }
    println!();

    // 4. Address a cell by position or by id
    println!("4. Cell access...");
    let rows = table.cached_rows();
    let first = &rows[0];
    println!("   by index 1: {}", first.get_value(1)?);
    println!("   by id 'name': {}", first.get_value("name")?);

    // 5. Copies are detached from the row
    let mut values = first.to_vec();
    values[1] = "Eve".into();
    println!("   copy edited to {}, row still {}", values[1], first.get_value("name")?);

    Ok(())
}
