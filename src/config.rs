use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use dotenvy::dotenv;

const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_MOVIE_ENDPOINT: &str = "/movie/";
const DEFAULT_DATA_FILE: &str = "data.json";

/// Endpoints and credential for the movie metadata provider.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_url: String,
    pub movie_endpoint: String,
    pub api_key: String,
}

/// Runtime configuration, read once at startup and threaded through the job
/// framework. A `.env` file is honoured when present.
#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub webhook_url: String,
    pub watchlist: Vec<String>,
    pub data_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();
        Ok(Config {
            tmdb: TmdbConfig {
                api_url: env::var("TMDB_API_URL")
                    .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
                movie_endpoint: env::var("TMDB_MOVIE_ENDPOINT")
                    .unwrap_or_else(|_| DEFAULT_MOVIE_ENDPOINT.to_string()),
                api_key: env::var("TMDB_API_KEY").context("TMDB_API_KEY must be set")?,
            },
            webhook_url: env::var("DISCORD_WEBHOOK_URL")
                .context("DISCORD_WEBHOOK_URL must be set")?,
            watchlist: parse_watchlist(&env::var("WATCHLIST").context("WATCHLIST must be set")?),
            data_file: env::var("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE)),
        })
    }
}

/// Watchlist ids are comma separated; blanks are dropped so stray or trailing
/// commas are harmless. Order is kept as given.
pub fn parse_watchlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
