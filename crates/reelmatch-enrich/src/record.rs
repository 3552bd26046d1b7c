use serde::{Deserialize, Serialize};

/// Display metadata for one title, normalized across provider categories.
///
/// Every field is optional: upstream data is incomplete and a failed lookup
/// is represented by [`EnrichmentRecord::empty`] rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    /// Absolute poster image URL.
    pub poster_url: Option<String>,
    /// Average user rating rounded to one decimal.
    pub vote_average: Option<f64>,
    /// Runtime formatted as `"<minutes> min"`.
    pub runtime: Option<String>,
    /// Synopsis as returned upstream.
    pub overview: Option<String>,
    /// First five credited cast names, comma-joined.
    pub cast: Option<String>,
    /// Genre names, comma-joined. Only series lookups fill this.
    pub genres: Option<String>,
}

impl EnrichmentRecord {
    /// The sentinel stored for titles with no metadata or a failed lookup.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}
