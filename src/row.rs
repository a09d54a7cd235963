/// LazyTable Row View
///
/// A `DataRow` is a fixed-arity, columnar-addressable view over one record's
/// values, bound to the owning `ColumnList` for id-to-index resolution. A row
/// may legitimately hold fewer values than the list has columns (placeholder
/// rows); access past the stored values fails instead of fabricating data.

use std::sync::Arc;

use crate::column::{ColumnList, DataValue};
use crate::error::{Result, TableError};

/// Key for addressing a cell: a zero-based position or a column id.
///
/// Both forms resolve to a plain numeric index once, at the row boundary,
/// before any value access.
#[derive(Debug, Clone, Copy)]
pub enum RowKey<'a> {
    Index(usize),
    Id(&'a str),
}

impl<'a> From<usize> for RowKey<'a> {
    fn from(index: usize) -> Self {
        RowKey::Index(index)
    }
}

impl<'a> From<&'a str> for RowKey<'a> {
    fn from(id: &'a str) -> Self {
        RowKey::Id(id)
    }
}

impl<'a> From<&'a String> for RowKey<'a> {
    fn from(id: &'a String) -> Self {
        RowKey::Id(id)
    }
}

/// One record's values, in column order.
#[derive(Debug, Clone)]
pub struct DataRow {
    columns: Arc<ColumnList>,
    values: Vec<DataValue>,
}

impl DataRow {
    pub fn new(columns: Arc<ColumnList>, values: Vec<DataValue>) -> Self {
        DataRow { columns, values }
    }

    /// Number of stored values. Not necessarily the number of columns.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The column list this row resolves ids against.
    pub fn columns(&self) -> &Arc<ColumnList> {
        &self.columns
    }

    /// Returns a fresh copy of the value sequence. Mutating the returned
    /// vector never touches the row.
    pub fn to_vec(&self) -> Vec<DataValue> {
        self.values.clone()
    }

    /// Iterates the stored values in column order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataValue> {
        self.values.iter()
    }

    /// Resolves a key to a position within the stored values.
    fn resolve(&self, key: RowKey<'_>) -> Result<usize> {
        let index = match key {
            RowKey::Index(index) => index,
            RowKey::Id(id) => self.columns.index_of(id)?,
        };
        if index >= self.values.len() {
            return Err(TableError::OutOfRange(index));
        }
        Ok(index)
    }

    pub fn get_value<'a>(&self, key: impl Into<RowKey<'a>>) -> Result<DataValue> {
        let index = self.resolve(key.into())?;
        Ok(self.values[index].clone())
    }

    /// Replaces the value at the resolved position in place. The only
    /// mutator; rows are otherwise immutable in shape.
    pub fn set_value<'a>(&mut self, key: impl Into<RowKey<'a>>, value: impl Into<DataValue>) -> Result<()> {
        let index = self.resolve(key.into())?;
        self.values[index] = value.into();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDescriptor;

    fn sample_columns() -> Arc<ColumnList> {
        Arc::new(
            ColumnList::from_descriptors(vec![
                ColumnDescriptor::new("id", "ID"),
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("age", "Age"),
                ColumnDescriptor::new("active", "Active"),
            ])
            .unwrap(),
        )
    }

    fn sample_row() -> DataRow {
        DataRow::new(
            sample_columns(),
            vec![
                DataValue::from(1),
                DataValue::from("John"),
                DataValue::from(30),
                DataValue::from(true),
            ],
        )
    }

    #[test]
    fn test_size_and_copy() {
        let row = sample_row();
        assert_eq!(row.size(), 4);

        let mut copy = row.to_vec();
        assert_eq!(copy, row.to_vec());
        copy[0] = DataValue::from(99);
        assert_eq!(row.get_value(0).unwrap(), DataValue::from(1));
    }

    #[test]
    fn test_get_value_by_index_and_id() {
        let row = sample_row();
        assert_eq!(row.get_value(1).unwrap(), DataValue::from("John"));
        assert_eq!(row.get_value("name").unwrap(), DataValue::from("John"));
        assert_eq!(row.get_value("active").unwrap(), DataValue::from(true));
    }

    #[test]
    fn test_set_value_round_trip() {
        let mut row = sample_row();
        for (index, value) in [
            (0, DataValue::from(2)),
            (1, DataValue::from("Jane")),
            (2, DataValue::from(25)),
            (3, DataValue::from(false)),
        ] {
            row.set_value(index, value.clone()).unwrap();
            assert_eq!(row.get_value(index).unwrap(), value);
        }

        row.set_value("name", "Joan").unwrap();
        assert_eq!(row.get_value("name").unwrap(), DataValue::from("Joan"));
    }

    #[test]
    fn test_unknown_id_fails_with_lookup_error() {
        let mut row = sample_row();
        let err = row.get_value("nonExistentId").unwrap_err();
        assert_eq!(err.to_string(), "No column with id 'nonExistentId'");
        let err = row.set_value("nonExistentId", "value").unwrap_err();
        assert_eq!(err.to_string(), "No column with id 'nonExistentId'");
    }

    #[test]
    fn test_index_out_of_range() {
        let mut row = sample_row();
        let err = row.get_value(4).unwrap_err();
        assert_eq!(err.to_string(), "Out of range: 4");
        let err = row.set_value(4, "value").unwrap_err();
        assert_eq!(err.to_string(), "Out of range: 4");
    }

    #[test]
    fn test_empty_row() {
        let row = DataRow::new(sample_columns(), Vec::new());
        assert_eq!(row.size(), 0);
        assert!(row.to_vec().is_empty());
        assert!(matches!(row.get_value(0).unwrap_err(), TableError::OutOfRange(0)));
    }

    #[test]
    fn test_short_row_id_access_out_of_range() {
        // Row with fewer values than columns: the id resolves, but the
        // position is outside the stored values.
        let row = DataRow::new(sample_columns(), vec![DataValue::from(1), DataValue::from("John")]);
        let err = row.get_value("active").unwrap_err();
        assert_eq!(err.to_string(), "Out of range: 3");
    }
}
