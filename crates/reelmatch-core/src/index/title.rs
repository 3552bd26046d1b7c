//! # Title Index
//!
//! Exact-match lookup from normalized titles to embedding table rows.
//! Normalization is deliberately minimal: lowercase plus outer whitespace
//! trimming. Punctuation and diacritics are preserved, so "Amélie" and
//! "Amelie" are different keys.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::{ReelmatchError, Result};

/// Normalizes a raw title into an index key.
///
/// # Examples
/// ```
/// use reelmatch_core::index::normalize;
///
/// assert_eq!(normalize("  The Irishman "), "the irishman");
/// assert_eq!(normalize(&normalize("  The Irishman ")), "the irishman");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

/// Read-only mapping from normalized title to row position.
///
/// Keys are kept in corpus order so that fuzzy matching can break score
/// ties deterministically.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    keys: Vec<String>,
    rows: HashMap<String, usize>,
}

impl TitleIndex {
    /// Builds the index from catalog titles, where the i-th title maps to row i.
    ///
    /// The first occurrence of a key wins; later duplicates and titles that
    /// normalize to the empty string are skipped.
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        let mut skipped = 0usize;

        for (row, title) in titles.into_iter().enumerate() {
            let key = normalize(title.as_ref());
            if key.is_empty() {
                skipped += 1;
                continue;
            }
            if let Some(&first) = index.rows.get(&key) {
                warn!(title = %key, first_row = first, duplicate_row = row, "skipping duplicate title");
                skipped += 1;
                continue;
            }
            index.rows.insert(key.clone(), row);
            index.keys.push(key);
        }

        info!(titles = index.len(), skipped, "built title index");
        index
    }

    /// Builds the index from an explicit title-to-row map.
    ///
    /// Keys are re-normalized and those that normalize to the empty string
    /// are skipped, as in [`from_titles`](Self::from_titles). Corpus order
    /// follows row position.
    ///
    /// # Errors
    ///
    /// Returns `ReelmatchError::RowOutOfBounds` if any entry points at or past
    /// `row_count`, and `ReelmatchError::DuplicateTitle` if two keys collapse
    /// to the same normalized key.
    pub fn from_entries<I, S>(entries: I, row_count: usize) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        let mut pairs: Vec<(String, usize)> = Vec::new();
        let mut rows = HashMap::new();

        let mut skipped = 0usize;

        for (title, row) in entries {
            let key = normalize(title.as_ref());
            if key.is_empty() {
                skipped += 1;
                continue;
            }
            if row >= row_count {
                return Err(ReelmatchError::RowOutOfBounds {
                    title: key,
                    row,
                    rows: row_count,
                });
            }
            if rows.insert(key.clone(), row).is_some() {
                return Err(ReelmatchError::DuplicateTitle(key));
            }
            pairs.push((key, row));
        }

        pairs.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        let keys = pairs.into_iter().map(|(key, _)| key).collect();

        debug!(titles = rows.len(), skipped, "loaded explicit title index");
        Ok(Self { keys, rows })
    }

    /// Returns the row for an already-normalized key.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<usize> {
        self.rows.get(key).copied()
    }

    /// Normalizes `raw` and resolves it.
    #[must_use]
    pub fn lookup(&self, raw: &str) -> Option<usize> {
        self.resolve(&normalize(raw))
    }

    /// Returns `true` if the normalized key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    /// All keys in corpus order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Iterates over `(key, row)` pairs in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.keys
            .iter()
            .map(move |key| (key.as_str(), self.rows[key]))
    }

    /// Largest row position referenced by the index, if any.
    #[must_use]
    pub fn max_row(&self) -> Option<usize> {
        self.rows.values().copied().max()
    }

    /// Number of indexed titles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no titles are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
