/// LazyTable Column Model
///
/// Columns describe the shape of a table: an ordered, uniquely-keyed list of
/// descriptors, each carrying an identifier, a display label and a semantic
/// data type. Insertion order is the canonical column order used everywhere:
/// row value order, chunk payload order, rendering order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Semantic data types a column can declare.
///
/// The type is advisory: cell values are dynamically typed `DataValue`s and
/// the table never coerces them. Consumers (grids, editors, exporters) use
/// the declared type to pick renderers and input widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataType {
    Unknown,
    #[default]
    String,
    Bool,
    Int32,
    Int64,
    Float64,
    Currency,
    Date,
    DateTime,
    Time,
    Blob,
}

/// Cell value enum to support multiple types.
///
/// Serialized untagged, so chunk payloads read and write as plain JSON
/// scalars (`null`, `true`, `42`, `1.99`, `"Apple"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    String(String),
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            DataValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Int32(v) => Some(*v as i64),
            DataValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Int32(v) => Some(*v as f64),
            DataValue::Int64(v) => Some(*v as f64),
            DataValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(v) => Some(v),
            _ => None,
        }
    }
}

/// Textual form of a value, used by text search. `Null` renders empty and
/// never matches a search term.
impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Null => Ok(()),
            DataValue::Bool(v) => write!(f, "{}", v),
            DataValue::Int32(v) => write!(f, "{}", v),
            DataValue::Int64(v) => write!(f, "{}", v),
            DataValue::Float64(v) => write!(f, "{}", v),
            DataValue::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Bool(v)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::Int32(v)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int64(v)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Float64(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::String(v.to_string())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::String(v)
    }
}

/// A single column definition. Immutable once added to a `ColumnList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub data_type: DataType,
}

impl ColumnDescriptor {
    /// Creates a descriptor with the default `String` type.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_type(id, label, DataType::String)
    }

    pub fn with_type(id: impl Into<String>, label: impl Into<String>, data_type: DataType) -> Self {
        ColumnDescriptor {
            id: id.into(),
            label: label.into(),
            data_type,
        }
    }
}

/// Ordered, uniquely-keyed collection of column descriptors.
///
/// Built once per table (append-only during construction) and shared between
/// tables derived from the same source. Id lookups go through a side index,
/// so `index_of` is O(1).
#[derive(Debug, Clone, Default)]
pub struct ColumnList {
    columns: Vec<ColumnDescriptor>,
    index: HashMap<String, usize>,
}

impl ColumnList {
    pub fn new() -> Self {
        ColumnList::default()
    }

    /// Builds a list from descriptors, failing on a duplicate id.
    pub fn from_descriptors(descriptors: Vec<ColumnDescriptor>) -> Result<Self> {
        let mut list = ColumnList::new();
        for descriptor in descriptors {
            list.add(descriptor)?;
        }
        Ok(list)
    }

    /// Appends a descriptor. Fails when the identifier already exists.
    pub fn add(&mut self, descriptor: ColumnDescriptor) -> Result<()> {
        if self.index.contains_key(&descriptor.id) {
            return Err(TableError::Validation(format!(
                "duplicate column id '{}'",
                descriptor.id
            )));
        }
        self.index.insert(descriptor.id.clone(), self.columns.len());
        self.columns.push(descriptor);
        Ok(())
    }

    pub fn get_by_index(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    pub fn get_by_id(&self, id: &str) -> Result<&ColumnDescriptor> {
        self.index_of(id).map(|index| &self.columns[index])
    }

    /// Positional index for an id. This is the primitive row views use to
    /// resolve id-based access.
    pub fn index_of(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| TableError::ColumnNotFound(id.to_string()))
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.columns.iter()
    }
}
