/// LazyTable - Virtual Tabular Data Layer
///
/// A client-side data layer for CRUD/admin UIs: large, possibly
/// server-paginated datasets are modeled as virtual tables that cache rows
/// locally and fetch missing windows in chunks through an injected loader.
/// Text filtering transparently switches between an in-memory scan and
/// server-side delegation depending on how much of the dataset is resident.

pub mod column;
pub mod error;
pub mod filter;
pub mod loader;
pub mod row;
pub mod table;

pub use column::{ColumnDescriptor, ColumnList, DataType, DataValue};
pub use error::{Result, TableError};
pub use filter::{DataFilter, TextFilter};
pub use loader::{Chunk, ChunkQuery, DataLoader, FilterSpec, SortSpec, DEFAULT_CHUNK_SIZE};
pub use row::{DataRow, RowKey};
pub use table::DataTable;
