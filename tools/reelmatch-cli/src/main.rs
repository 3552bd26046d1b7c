//! Reelmatch command-line front end
//!
//! Loads an artifact bundle and answers recommendation, suggestion and
//! metadata queries. Results go to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reelmatch::{
    CacheConfig, EnrichmentClient, EnrichmentRecord, Recommender, RecommenderConfig, Reelmatch,
    TmdbConfig, TmdbProvider, DEFAULT_TOP_N,
};
use reelmatch_core::matching::fuzzy::{DEFAULT_CUTOFF, DEFAULT_LIMIT};
use reelmatch_enrich::provider::tmdb::{DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL};
use reelmatch_enrich::DEFAULT_CACHE_CAPACITY;

/// Default artifact bundle location
fn default_artifacts_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reelmatch")
        .join("artifacts.json")
}

/// CLI arguments
#[derive(Parser)]
#[command(name = "reelmatch")]
#[command(about = "Similar-title recommendations with fuzzy fallback and TMDB metadata")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Artifact bundle (JSON, optionally gzip-compressed)
    #[arg(short, long, env = "REELMATCH_ARTIFACTS", global = true)]
    artifacts: Option<PathBuf>,

    /// TMDB API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true, global = true)]
    tmdb_api_key: Option<String>,

    /// TMDB REST API base
    #[arg(long, env = "TMDB_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    tmdb_base_url: String,

    /// Poster image base
    #[arg(long, env = "TMDB_IMAGE_BASE_URL", default_value = DEFAULT_IMAGE_BASE_URL, global = true)]
    tmdb_image_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// Maximum number of cached metadata records
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY, global = true)]
    cache_capacity: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank titles similar to TITLE
    Recommend {
        title: String,
        /// Number of results
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
        /// Attach TMDB metadata to each result
        #[arg(short, long)]
        enrich: bool,
    },
    /// Closest catalog titles to TITLE
    Suggest {
        title: String,
        /// Maximum number of suggestions
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
        /// Minimum similarity in [0, 1]
        #[arg(short, long, default_value_t = DEFAULT_CUTOFF)]
        cutoff: f64,
    },
    /// TMDB metadata for TITLE
    Details { title: String },
    /// Recommend for every title read from stdin, one JSON line each
    Batch {
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
        #[arg(short, long)]
        enrich: bool,
    },
}

#[derive(Serialize)]
struct TitleDetails {
    title: String,
    #[serde(flatten)]
    details: EnrichmentRecord,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Recommend {
            title,
            top_n,
            enrich,
        } => {
            let service = build_service(&cli)?;
            if *enrich {
                emit(&mut out, &service.recommend_enriched(title, *top_n))?;
            } else {
                emit(&mut out, &service.recommend(title, *top_n))?;
            }
        }
        Commands::Suggest {
            title,
            limit,
            cutoff,
        } => {
            let recommender = load_recommender(&cli)?;
            emit(&mut out, &recommender.suggest_with(title, *limit, *cutoff))?;
        }
        Commands::Details { title } => {
            let client = build_enrichment(&cli)?;
            let details = TitleDetails {
                title: title.trim().to_string(),
                details: client.lookup(title),
            };
            emit(&mut out, &details)?;
        }
        Commands::Batch { top_n, enrich } => {
            let service = build_service(&cli)?;
            let mut processed = 0usize;
            for line in io::stdin().lock().lines() {
                let line = line.context("Failed to read title from stdin")?;
                if line.trim().is_empty() {
                    continue;
                }
                if *enrich {
                    emit(&mut out, &service.recommend_enriched(&line, *top_n))?;
                } else {
                    emit(&mut out, &service.recommend(&line, *top_n))?;
                }
                processed += 1;
            }
            let stats = service.enrichment().stats();
            info!(
                processed,
                cache_hits = stats.hits,
                cache_misses = stats.misses,
                "Batch complete"
            );
        }
    }

    Ok(())
}

fn load_recommender(cli: &Cli) -> Result<Recommender> {
    let path = cli.artifacts.clone().unwrap_or_else(default_artifacts_path);
    Recommender::load(&path, RecommenderConfig::default())
        .with_context(|| format!("Failed to load artifacts from {}", path.display()))
}

fn tmdb_config(cli: &Cli) -> TmdbConfig {
    let mut config = TmdbConfig::new()
        .with_base_url(cli.tmdb_base_url.as_str())
        .with_image_base_url(cli.tmdb_image_base_url.as_str())
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    if let Some(key) = cli.tmdb_api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        config = config.with_api_key(key);
    }
    config
}

fn build_enrichment(cli: &Cli) -> Result<EnrichmentClient<TmdbProvider>> {
    let provider =
        TmdbProvider::new(tmdb_config(cli)).context("Failed to build TMDB HTTP client")?;
    if !provider.has_api_key() {
        warn!("TMDB_API_KEY not set; metadata lookups will return empty records");
    }
    Ok(EnrichmentClient::new(
        provider,
        CacheConfig::new().with_capacity(cli.cache_capacity),
    ))
}

fn build_service(cli: &Cli) -> Result<Reelmatch<TmdbProvider>> {
    let recommender = load_recommender(cli)?;
    info!(titles = recommender.len(), "Catalog loaded");
    Ok(Reelmatch::new(Arc::new(recommender), build_enrichment(cli)?))
}

fn emit<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value).context("Failed to serialize result")?;
    writeln!(out).context("Failed to write to stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_default_artifacts_path() {
        let path = default_artifacts_path();
        assert!(path.to_string_lossy().contains("reelmatch"));
        assert!(path.ends_with("artifacts.json"));
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_recommend_defaults() {
        let cli = Cli::try_parse_from(["reelmatch", "recommend", "Heat"]).unwrap();
        match cli.command {
            Commands::Recommend {
                title,
                top_n,
                enrich,
            } => {
                assert_eq!(title, "Heat");
                assert_eq!(top_n, 12);
                assert!(!enrich);
            }
            _ => panic!("expected recommend"),
        }
        assert_eq!(cli.timeout_secs, 10);
        assert_eq!(cli.cache_capacity, 500);
    }

    #[test]
    fn test_suggest_flags() {
        let cli = Cli::try_parse_from([
            "reelmatch", "suggest", "godfater", "--limit", "3", "--cutoff", "0.8",
        ])
        .unwrap();
        match cli.command {
            Commands::Suggest {
                title,
                limit,
                cutoff,
            } => {
                assert_eq!(title, "godfater");
                assert_eq!(limit, 3);
                assert!((cutoff - 0.8).abs() < f64::EPSILON);
            }
            _ => panic!("expected suggest"),
        }
    }

    #[test]
    fn test_tmdb_config_from_flags() {
        let cli = Cli::try_parse_from([
            "reelmatch",
            "details",
            "Heat",
            "--tmdb-api-key",
            "secret",
            "--tmdb-base-url",
            "http://localhost:9/3/",
            "--timeout-secs",
            "2",
        ])
        .unwrap();
        let config = tmdb_config(&cli);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url, "http://localhost:9/3");
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_emit_writes_json_lines() {
        let mut buf = Vec::new();
        emit(&mut buf, &TitleDetails {
            title: "Heat".into(),
            details: EnrichmentRecord::empty(),
        })
        .unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.ends_with('\n'));
        let json: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(json["title"], "Heat");
    }
}
