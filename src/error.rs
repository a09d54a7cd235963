/// LazyTable Error Taxonomy
///
/// Every fallible operation in the crate surfaces one of these variants.
/// Registry and row access fail synchronously; table and filter operations
/// carry the same type through their async result channel.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    /// A column id that was never registered.
    #[error("No column with id '{0}'")]
    ColumnNotFound(String),

    /// An index outside the valid bound of a row's stored values.
    #[error("Out of range: {0}")]
    OutOfRange(usize),

    /// A structural invariant violated at construction or mutation time.
    #[error("{0}")]
    Validation(String),

    /// A failure surfaced by the data loader, propagated untouched.
    #[error("{0}")]
    Loader(String),
}

pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TableError::ColumnNotFound("price".to_string()).to_string(),
            "No column with id 'price'"
        );
        assert_eq!(TableError::OutOfRange(4).to_string(), "Out of range: 4");
    }
}
