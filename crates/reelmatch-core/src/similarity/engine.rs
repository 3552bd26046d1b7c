//! # Similarity Engine
//!
//! Exact brute-force nearest neighbours over an in-memory embedding table.
//! Every query scores all rows, so cost is `O(rows × dim)`; large tables are
//! scanned in parallel with rayon, which changes neither scores nor order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::similarity::cosine::cosine_similarity_with_norms;
use crate::similarity::table::EmbeddingTable;
use crate::types::ScoredRow;

/// Default row count at which the scan goes parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 16_384;

/// Configuration for the similarity engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tables with at least this many rows are scored in parallel.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row count at which scoring runs in parallel.
    pub fn with_parallel_threshold(mut self, rows: usize) -> Self {
        self.parallel_threshold = rows;
        self
    }
}

/// Ranks rows of an embedding table by cosine similarity to a query row.
#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    table: EmbeddingTable,
    config: EngineConfig,
}

impl SimilarityEngine {
    /// Create an engine over `table`.
    pub fn new(table: EmbeddingTable, config: EngineConfig) -> Self {
        Self { table, config }
    }

    /// The underlying embedding table.
    pub fn table(&self) -> &EmbeddingTable {
        &self.table
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Similarity of `row` to every row, itself included, in table order.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn scores(&self, row: usize) -> Vec<f64> {
        let table = &self.table;
        let query = table.row(row);
        let query_norm = table.norm(row);
        let score = |i: usize| cosine_similarity_with_norms(query, table.row(i), query_norm, table.norm(i));

        if table.len() >= self.config.parallel_threshold {
            (0..table.len()).into_par_iter().map(score).collect()
        } else {
            (0..table.len()).map(score).collect()
        }
    }

    /// Returns the `top_n` rows most similar to `row`, best first.
    ///
    /// The query row itself is never returned, even when other rows tie with
    /// it. Equal scores keep table order.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds. Rows must come from the title index,
    /// which is validated against the table at load.
    ///
    /// # Examples
    /// ```
    /// use reelmatch_core::similarity::{EmbeddingTable, EngineConfig, SimilarityEngine};
    ///
    /// let table = EmbeddingTable::from_rows(vec![
    ///     vec![1.0, 0.0],
    ///     vec![0.0, 1.0],
    ///     vec![1.0, 0.0],
    ///     vec![0.7, 0.7],
    /// ]).unwrap();
    /// let engine = SimilarityEngine::new(table, EngineConfig::default());
    ///
    /// let ranked = engine.recommend(0, 2);
    /// assert_eq!(ranked.iter().map(|r| r.row).collect::<Vec<_>>(), vec![2, 3]);
    /// ```
    #[must_use]
    pub fn recommend(&self, row: usize, top_n: usize) -> Vec<ScoredRow> {
        let scores = self.scores(row);
        if top_n == 0 {
            return Vec::new();
        }

        let mut order: Vec<usize> = (0..scores.len()).filter(|&i| i != row).collect();

        // Descending score, then ascending row: a total order, so partial
        // selection gives the same prefix as a full stable sort.
        let by_rank = |a: &usize, b: &usize| scores[*b].total_cmp(&scores[*a]).then(a.cmp(b));
        if top_n < order.len() {
            order.select_nth_unstable_by(top_n - 1, by_rank);
            order.truncate(top_n);
        }
        order.sort_by(by_rank);

        trace!(row, top_n, returned = order.len(), "ranked similar rows");
        order
            .into_iter()
            .map(|i| ScoredRow {
                row: i,
                score: scores[i],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(rows: Vec<Vec<f32>>) -> SimilarityEngine {
        SimilarityEngine::new(
            EmbeddingTable::from_rows(rows).unwrap(),
            EngineConfig::default(),
        )
    }

    fn sample() -> SimilarityEngine {
        engine(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.7, 0.7],
        ])
    }

    fn random_rows(seed: u64, rows: usize, dim: usize) -> Vec<Vec<f32>> {
        let mut rng = oorandom::Rand32::new(seed);
        (0..rows)
            .map(|_| {
                (0..dim)
                    // Coarse values so that exact ties actually occur.
                    .map(|_| rng.rand_range(0..5) as f32 - 2.0)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn four_row_scenario() {
        let ranked = sample().recommend(0, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].row, 2);
        assert!((ranked[0].score - 1.0).abs() < 1e-9);
        assert_eq!(ranked[1].row, 3);
        assert!((ranked[1].score - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn query_row_excluded_even_when_tied() {
        // Row 2 duplicates row 0; querying row 2 must drop row 2, not row 0.
        let ranked = sample().recommend(2, 3);
        let rows: Vec<usize> = ranked.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![0, 3, 1]);
    }

    #[test]
    fn top_n_larger_than_table() {
        let ranked = sample().recommend(1, 50);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.row != 1));
    }

    #[test]
    fn top_n_zero_is_empty() {
        assert!(sample().recommend(0, 0).is_empty());
    }

    #[test]
    fn single_row_table_has_no_neighbours() {
        assert!(engine(vec![vec![1.0, 2.0]]).recommend(0, 5).is_empty());
    }

    #[test]
    fn zero_norm_rows_score_zero() {
        let e = engine(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]]);
        let ranked = e.recommend(0, 2);
        assert_eq!(ranked.iter().map(|r| r.row).collect::<Vec<_>>(), vec![1, 2]);
        assert!(ranked.iter().all(|r| r.score == 0.0));

        let ranked = e.recommend(1, 2);
        assert_eq!(ranked[0].row, 0);
        assert_eq!(ranked[0].score, 0.0);
    }

    #[test]
    fn ranking_properties_hold_on_random_tables() {
        for seed in 0..20 {
            let e = engine(random_rows(seed, 40, 3));
            for row in [0, 7, 39] {
                for top_n in [1, 5, 39, 100] {
                    let ranked = e.recommend(row, top_n);
                    assert!(ranked.len() <= top_n);
                    assert_eq!(ranked.len(), top_n.min(39));
                    assert!(ranked.iter().all(|r| r.row != row));
                    assert!(ranked.iter().all(|r| (-1.0..=1.0).contains(&r.score)));
                    for pair in ranked.windows(2) {
                        assert!(pair[0].score >= pair[1].score);
                        if pair[0].score == pair[1].score {
                            assert!(pair[0].row < pair[1].row, "tie out of table order");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn partial_selection_matches_full_sort() {
        let e = engine(random_rows(7, 200, 4));
        let full = e.recommend(13, 199);
        for top_n in [1, 3, 10, 57] {
            assert_eq!(e.recommend(13, top_n), full[..top_n].to_vec());
        }
    }

    #[test]
    fn parallel_scan_matches_sequential() {
        let rows = random_rows(42, 300, 8);
        let sequential = engine(rows.clone());
        let parallel = SimilarityEngine::new(
            EmbeddingTable::from_rows(rows).unwrap(),
            EngineConfig::new().with_parallel_threshold(1),
        );
        assert_eq!(sequential.scores(5), parallel.scores(5));
        assert_eq!(sequential.recommend(5, 25), parallel.recommend(5, 25));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_bounds_row_panics() {
        let _ = sample().recommend(4, 1);
    }
}
