use std::fmt;

use serde::{Deserialize, Serialize};

/// Descriptive fields for one catalog item, aligned by row with the
/// embedding table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Display title as it appears in the catalog.
    pub title: String,

    /// Comma-separated category tags (e.g., "Dramas, International Movies").
    #[serde(default)]
    pub listed_in: Option<String>,

    /// Content rating (e.g., "TV-MA", "PG-13").
    #[serde(default)]
    pub rating: Option<String>,
}

impl CatalogRecord {
    /// Creates a record carrying only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            listed_in: None,
            rating: None,
        }
    }

    /// Sets the category tags.
    #[must_use]
    pub fn with_listed_in(mut self, listed_in: impl Into<String>) -> Self {
        self.listed_in = Some(listed_in.into());
        self
    }

    /// Sets the content rating.
    #[must_use]
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    /// Iterates over the individual category tags.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.listed_in
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}

impl fmt::Display for CatalogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(ref rating) = self.rating {
            write!(f, " [{rating}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_split_and_trimmed() {
        let record = CatalogRecord::new("Narcos").with_listed_in("Crime TV Shows,  TV Dramas ,");
        let tags: Vec<&str> = record.categories().collect();
        assert_eq!(tags, vec!["Crime TV Shows", "TV Dramas"]);
    }

    #[test]
    fn categories_empty_without_tags() {
        let record = CatalogRecord::new("Narcos");
        assert_eq!(record.categories().count(), 0);
    }

    #[test]
    fn missing_optional_fields_deserialize_as_none() {
        let record: CatalogRecord = serde_json::from_str(r#"{"title": "Dark"}"#).unwrap();
        assert_eq!(record, CatalogRecord::new("Dark"));
    }

    #[test]
    fn display_includes_rating() {
        let record = CatalogRecord::new("Dark").with_rating("TV-MA");
        assert_eq!(record.to_string(), "Dark [TV-MA]");
    }
}
