use thiserror::Error;

/// Errors that can occur while loading or assembling the recommendation state.
///
/// Query-time conditions are not errors: an unknown title is reported as
/// [`RecommendOutcome::NotFound`](crate::types::RecommendOutcome::NotFound).
#[derive(Debug, Error)]
pub enum ReelmatchError {
    /// Reading an artifact file failed.
    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact bundle is not valid JSON or does not match the expected shape.
    #[error("malformed artifact bundle: {0}")]
    Json(#[from] serde_json::Error),

    /// An embedding row has a different dimensionality than the first row.
    #[error("embedding row {row} has {found} dimensions, expected {expected}")]
    RaggedEmbeddings {
        /// Offending row.
        row: usize,
        /// Dimensionality of row 0.
        expected: usize,
        /// Dimensionality of the offending row.
        found: usize,
    },

    /// Catalog records and embedding rows are not aligned one-to-one.
    #[error("catalog has {records} records but the embedding table has {embeddings} rows")]
    MisalignedCatalog {
        /// Number of catalog records.
        records: usize,
        /// Number of embedding rows.
        embeddings: usize,
    },

    /// A title index entry points outside the embedding table.
    #[error("title {title:?} maps to row {row}, but the table has {rows} rows")]
    RowOutOfBounds {
        /// Normalized title.
        title: String,
        /// Row the entry points at.
        row: usize,
        /// Number of rows in the table.
        rows: usize,
    },

    /// Two entries of an explicit title map normalize to the same key.
    #[error("duplicate title key {0:?} in title index")]
    DuplicateTitle(String),
}

/// Result type alias for reelmatch core operations.
pub type Result<T> = std::result::Result<T, ReelmatchError>;
