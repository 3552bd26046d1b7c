use crate::error::{ReelmatchError, Result};
use crate::similarity::cosine::l2_norm;

/// Immutable row-major embedding matrix with precomputed row norms.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    data: Vec<f32>,
    norms: Vec<f64>,
    dim: usize,
}

impl EmbeddingTable {
    /// Builds a table from per-item vectors.
    ///
    /// # Errors
    ///
    /// Returns `ReelmatchError::RaggedEmbeddings` if any row's length differs
    /// from the first row's.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * dim);
        let mut norms = Vec::with_capacity(rows.len());

        for (row, vector) in rows.into_iter().enumerate() {
            if vector.len() != dim {
                return Err(ReelmatchError::RaggedEmbeddings {
                    row,
                    expected: dim,
                    found: vector.len(),
                });
            }
            norms.push(l2_norm(&vector));
            data.extend(vector);
        }

        Ok(Self { data, norms, dim })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.norms.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.norms.is_empty()
    }

    /// Dimensionality of every row.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the embedding at `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f32] {
        assert!(
            row < self.len(),
            "row {row} out of bounds for embedding table with {} rows",
            self.len()
        );
        &self.data[row * self.dim..(row + 1) * self.dim]
    }

    /// Returns the L2 norm of the embedding at `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn norm(&self, row: usize) -> f64 {
        self.norms[row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_and_norms() {
        let table = EmbeddingTable::from_rows(vec![vec![3.0, 4.0], vec![0.0, 0.0]]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dim(), 2);
        assert_eq!(table.row(0), &[3.0, 4.0]);
        assert_eq!(table.row(1), &[0.0, 0.0]);
        assert!((table.norm(0) - 5.0).abs() < 1e-12);
        assert_eq!(table.norm(1), 0.0);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = EmbeddingTable::from_rows(vec![vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            ReelmatchError::RaggedEmbeddings {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn empty_table() {
        let table = EmbeddingTable::from_rows(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.dim(), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn row_out_of_bounds_panics() {
        let table = EmbeddingTable::from_rows(vec![vec![1.0]]).unwrap();
        let _ = table.row(1);
    }
}
