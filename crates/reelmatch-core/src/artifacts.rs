//! # Artifact Bundle
//!
//! The precomputed state a recommender starts from: catalog records, the
//! embedding matrix aligned with them, and optionally an explicit
//! title-to-row map. Stored as JSON, optionally gzip-compressed (`.gz`).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::types::CatalogRecord;

/// Everything needed to build a [`Recommender`](crate::Recommender).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    /// Catalog records, row-aligned with `embeddings`.
    pub catalog: Vec<CatalogRecord>,

    /// One embedding per catalog record.
    pub embeddings: Vec<Vec<f32>>,

    /// Explicit title-to-row map. Built from catalog titles when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_to_index: Option<HashMap<String, usize>>,
}

impl Artifacts {
    /// Reads a bundle from `path`, gunzipping when the extension is `.gz`.
    ///
    /// # Errors
    ///
    /// Returns `ReelmatchError::Io` if the file cannot be read and
    /// `ReelmatchError::Json` if it is not a valid bundle.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = BufReader::new(File::open(path)?);

        let artifacts = if is_gzip(path) {
            Self::from_reader(GzDecoder::new(file))?
        } else {
            Self::from_reader(file)?
        };

        info!(
            path = %path.display(),
            records = artifacts.catalog.len(),
            dim = artifacts.embeddings.first().map_or(0, Vec::len),
            "loaded artifacts"
        );
        Ok(artifacts)
    }

    /// Reads a bundle from any JSON reader.
    ///
    /// # Errors
    ///
    /// Returns `ReelmatchError::Json` if the input is not a valid bundle.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Writes the bundle to `path`, gzip-compressed when the extension is `.gz`.
    ///
    /// # Errors
    ///
    /// Returns `ReelmatchError::Io` or `ReelmatchError::Json` on write failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = BufWriter::new(File::create(path)?);

        if is_gzip(path) {
            let mut encoder = GzEncoder::new(file, Compression::default());
            serde_json::to_writer(&mut encoder, self)?;
            encoder.finish()?.flush()?;
        } else {
            let mut file = file;
            serde_json::to_writer(&mut file, self)?;
            file.flush()?;
        }
        Ok(())
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Artifacts {
        Artifacts {
            catalog: vec![
                CatalogRecord::new("Dark").with_rating("TV-MA"),
                CatalogRecord::new("Ozark").with_listed_in("Crime TV Shows"),
            ],
            embeddings: vec![vec![0.5, 0.25], vec![-1.0, 2.0]],
            title_to_index: None,
        }
    }

    #[test]
    fn parses_minimal_bundle() {
        let json = r#"{
            "catalog": [{"title": "Dark"}, {"title": "Ozark", "rating": "TV-MA"}],
            "embeddings": [[1.0, 0.0], [0.0, 1.0]],
            "title_to_index": {"dark": 0, "ozark": 1}
        }"#;
        let artifacts = Artifacts::from_reader(json.as_bytes()).unwrap();
        assert_eq!(artifacts.catalog.len(), 2);
        assert_eq!(artifacts.catalog[1].rating.as_deref(), Some("TV-MA"));
        assert_eq!(artifacts.title_to_index.unwrap()["ozark"], 1);
    }

    #[test]
    fn malformed_bundle_is_json_error() {
        let err = Artifacts::from_reader(r#"{"catalog": 3}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, crate::ReelmatchError::Json(_)));
    }

    #[test]
    fn gzip_bundle_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts.json.gz");
        sample().save(&path).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b], "not gzip-compressed");
        assert_eq!(Artifacts::load(&path).unwrap(), sample());
    }

    #[test]
    fn plain_bundle_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts.json");
        sample().save(&path).unwrap();
        assert_eq!(Artifacts::load(&path).unwrap(), sample());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Artifacts::load("/nonexistent/reelmatch/artifacts.json").unwrap_err();
        assert!(matches!(err, crate::ReelmatchError::Io(_)));
    }
}
