use serde::Deserialize;

use super::util::{Client, JsonDecodeError};
use crate::config::TmdbConfig;

/// Movie detail payload from the metadata provider.
///
/// Only the fields the release check and the announcement need are modelled;
/// the provider sends plenty more and serde ignores it.
#[derive(Deserialize, Debug, Clone)]
pub struct MovieDetails {
    pub title: String,
    pub overview: String,
    pub poster_path: String,
    pub imdb_id: String,
    pub release_date: String,
    pub status: String,
    pub popularity: f64,
}

/// Authenticated client for the provider's movie-detail endpoint.
pub struct TmdbClient {
    client: Client,
    api_url: String,
    movie_endpoint: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Self {
        TmdbClient {
            client: Client::new().with_bearer(&config.api_key),
            api_url: config.api_url.clone(),
            movie_endpoint: config.movie_endpoint.clone(),
        }
    }

    /// GET `{api_url}{movie_endpoint}{movie_id}`.
    pub async fn fetch_movie(&self, movie_id: &str) -> Result<MovieDetails, JsonDecodeError> {
        self.client
            .get_json(format!(
                "{}{}{}",
                self.api_url, self.movie_endpoint, movie_id
            ))
            .await
    }
}
