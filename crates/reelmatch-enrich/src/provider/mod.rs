//! # Metadata Providers
//!
//! A provider answers two questions: which ids match a title within a
//! category, and what the detail record for one id looks like. Responses
//! are decoded into typed per-category shapes here and mapped into a single
//! [`EnrichmentRecord`] by [`Detail::into_record`].

pub mod tmdb;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::EnrichmentRecord;

pub use tmdb::{TmdbConfig, TmdbProvider};

/// Number of cast members included in the cast summary.
pub const CAST_SUMMARY_LEN: usize = 5;

/// Provider endpoint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Feature films.
    Movie,
    /// Episodic series.
    Tv,
}

impl Category {
    /// Categories in lookup order; the first with a search hit wins.
    pub const CHAIN: [Category; 2] = [Category::Movie, Category::Tv];

    /// Path segment used by the provider API.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// An external metadata source.
pub trait MetadataProvider: Send + Sync {
    /// Ids of items in `category` matching `title`, best match first.
    fn search(&self, category: Category, title: &str) -> Result<Vec<u64>>;

    /// Detail record, with credits, for one id.
    fn detail(&self, category: Category, id: u64) -> Result<Detail>;

    /// Turns a provider-relative poster path into an absolute URL.
    fn poster_url(&self, poster_path: &str) -> String {
        poster_path.to_string()
    }
}

/// One credited person.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub name: String,
}

/// One genre tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub name: String,
}

/// Credits sub-resource embedded in a detail response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Option<Vec<CastMember>>,
}

/// Detail shape of a feature film.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

/// Detail shape of an episodic series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesDetail {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Typical episode runtimes in minutes.
    #[serde(default)]
    pub episode_run_time: Option<Vec<u32>>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
}

/// Detail record of either category.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Movie(MovieDetail),
    Series(SeriesDetail),
}

impl Detail {
    /// Maps the category-specific shape into a normalized record.
    ///
    /// `poster_url` resolves a relative poster path into an absolute URL.
    #[must_use]
    pub fn into_record(self, poster_url: impl Fn(&str) -> String) -> EnrichmentRecord {
        match self {
            Self::Movie(movie) => EnrichmentRecord {
                poster_url: resolve_poster(movie.poster_path.as_deref(), &poster_url),
                vote_average: round_rating(movie.vote_average),
                runtime: format_runtime(movie.runtime),
                overview: movie.overview,
                cast: Some(cast_summary(movie.credits.as_ref())),
                genres: None,
            },
            Self::Series(series) => EnrichmentRecord {
                poster_url: resolve_poster(series.poster_path.as_deref(), &poster_url),
                vote_average: round_rating(series.vote_average),
                runtime: format_runtime(
                    series
                        .episode_run_time
                        .as_deref()
                        .and_then(|times| times.first().copied()),
                ),
                overview: series.overview,
                cast: Some(cast_summary(series.credits.as_ref())),
                genres: Some(join_names(
                    series.genres.iter().flatten().map(|g| g.name.as_str()),
                )),
            },
        }
    }
}

fn resolve_poster(path: Option<&str>, poster_url: impl Fn(&str) -> String) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(poster_url)
}

/// Rounds to one decimal; zero and missing ratings are absent.
///
/// Rounds the exact binary value, so 7.35 (stored as 7.3499...) becomes 7.3.
fn round_rating(rating: Option<f64>) -> Option<f64> {
    rating
        .filter(|r| *r != 0.0 && r.is_finite())
        .and_then(|r| format!("{r:.1}").parse().ok())
}

/// Zero and missing runtimes are absent.
fn format_runtime(minutes: Option<u32>) -> Option<String> {
    minutes.filter(|m| *m > 0).map(|m| format!("{m} min"))
}

fn cast_summary(credits: Option<&Credits>) -> String {
    join_names(
        credits
            .and_then(|c| c.cast.as_deref())
            .unwrap_or_default()
            .iter()
            .take(CAST_SUMMARY_LEN)
            .map(|member| member.name.as_str()),
    )
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn absolute(path: &str) -> String {
        format!("https://img.example{path}")
    }

    #[test]
    fn movie_detail_maps_all_fields() {
        let movie: MovieDetail = serde_json::from_str(
            r#"{
                "id": 238,
                "poster_path": "/3bhkrj58Vtu7enYsRolD1fZdja1.jpg",
                "vote_average": 8.687,
                "runtime": 175,
                "overview": "Spanning the years 1945 to 1955...",
                "credits": {"cast": [
                    {"name": "Marlon Brando"}, {"name": "Al Pacino"}, {"name": "James Caan"},
                    {"name": "Robert Duvall"}, {"name": "Richard S. Castellano"}, {"name": "Diane Keaton"}
                ]}
            }"#,
        )
        .unwrap();

        let record = Detail::Movie(movie).into_record(absolute);
        assert_eq!(
            record.poster_url.as_deref(),
            Some("https://img.example/3bhkrj58Vtu7enYsRolD1fZdja1.jpg")
        );
        assert_eq!(record.vote_average, Some(8.7));
        assert_eq!(record.runtime.as_deref(), Some("175 min"));
        assert_eq!(
            record.overview.as_deref(),
            Some("Spanning the years 1945 to 1955...")
        );
        assert_eq!(
            record.cast.as_deref(),
            Some("Marlon Brando, Al Pacino, James Caan, Robert Duvall, Richard S. Castellano")
        );
        assert_eq!(record.genres, None);
    }

    #[test]
    fn movie_detail_nulls_map_to_absent() {
        let movie: MovieDetail = serde_json::from_str(
            r#"{"poster_path": null, "vote_average": 0, "runtime": null, "overview": null}"#,
        )
        .unwrap();

        let record = Detail::Movie(movie).into_record(absolute);
        assert_eq!(record.poster_url, None);
        assert_eq!(record.vote_average, None);
        assert_eq!(record.runtime, None);
        assert_eq!(record.overview, None);
        assert_eq!(record.cast.as_deref(), Some(""));
    }

    #[test]
    fn series_detail_uses_first_episode_runtime_and_genres() {
        let series: SeriesDetail = serde_json::from_str(
            r#"{
                "poster_path": "/dark.jpg",
                "vote_average": 8.4,
                "episode_run_time": [53, 60],
                "overview": "A missing child sets four families on a frantic hunt.",
                "genres": [{"id": 80, "name": "Crime"}, {"id": 18, "name": "Drama"}],
                "credits": {"cast": [{"name": "Louis Hofmann"}, {"name": "Lisa Vicari"}]}
            }"#,
        )
        .unwrap();

        let record = Detail::Series(series).into_record(absolute);
        assert_eq!(record.poster_url.as_deref(), Some("https://img.example/dark.jpg"));
        assert_eq!(record.vote_average, Some(8.4));
        assert_eq!(record.runtime.as_deref(), Some("53 min"));
        assert_eq!(record.genres.as_deref(), Some("Crime, Drama"));
        assert_eq!(record.cast.as_deref(), Some("Louis Hofmann, Lisa Vicari"));
    }

    #[test]
    fn series_without_runtimes_or_genres() {
        let series: SeriesDetail =
            serde_json::from_str(r#"{"episode_run_time": [], "genres": null, "credits": {"cast": null}}"#)
                .unwrap();

        let record = Detail::Series(series).into_record(absolute);
        assert_eq!(record.runtime, None);
        assert_eq!(record.genres.as_deref(), Some(""));
        assert_eq!(record.cast.as_deref(), Some(""));
    }

    #[test]
    fn rating_rounds_half_to_even() {
        assert_eq!(round_rating(Some(7.25)), Some(7.2));
        assert_eq!(round_rating(Some(6.96)), Some(7.0));
        assert_eq!(round_rating(Some(f64::NAN)), None);
    }

    #[test]
    fn rating_rounds_stored_value_not_decimal_literal() {
        assert_eq!(round_rating(Some(7.35)), Some(7.3));
        assert_eq!(round_rating(Some(0.15)), Some(0.1));
        assert_eq!(round_rating(Some(6.65)), Some(6.7));
        assert_eq!(round_rating(Some(5.55)), Some(5.5));
        assert_eq!(round_rating(Some(8.687)), Some(8.7));
        assert_eq!(round_rating(Some(0.0)), None);
    }

    #[test]
    fn category_paths() {
        assert_eq!(Category::Movie.to_string(), "movie");
        assert_eq!(Category::CHAIN, [Category::Movie, Category::Tv]);
    }
}
