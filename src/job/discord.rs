use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};
use thiserror::Error;

use super::tmdb::MovieDetails;
use super::util::{Client, RequestError};

const USERNAME: &str = "MovieRSS";
const IMDB_TITLE_URL: &str = "https://imdb.com/title/";
const POSTER_URL: &str = "https://image.tmdb.org/t/p/original";
const FOOTER_TEXT: &str = "Data provided by The Movie DB";
const FOOTER_ICON_URL: &str = "https://i.imgur.com/Jh68ukS.png";

// The webhook caps embed descriptions at 2048 characters; leave room for the
// trailing ellipsis.
const OVERVIEW_LIMIT: usize = 2045;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("webhook rejected announcement: {0}")]
    Rejected(String),
    #[error("network error delivering announcement: {0}")]
    Network(#[from] reqwest::Error),
}

/// Posts release announcements to a Discord-compatible webhook.
pub struct Notifier {
    client: Client,
    webhook_url: String,
}

impl Notifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Notifier {
            client: Client::new(),
            webhook_url: webhook_url.into(),
        }
    }

    /// Deliver the release announcement for `movie`. Succeeds silently; a
    /// non-2xx reply fails with the response body text.
    pub async fn notify(&self, movie: &MovieDetails) -> Result<(), NotifyError> {
        let payload = announcement(movie, Utc::now());
        tracing::debug!("sending announcement: {payload}");
        match self.client.post(&self.webhook_url, payload).await {
            Ok(_) => Ok(()),
            Err(RequestError::Status { body, .. }) => Err(NotifyError::Rejected(body)),
            Err(RequestError::Network(err)) => Err(NotifyError::Network(err)),
        }
    }
}

/// Build the webhook announcement: one embed with title, truncated overview,
/// IMDB link, poster thumbnail and the release/status/popularity fields.
fn announcement(movie: &MovieDetails, sent_at: DateTime<Utc>) -> Value {
    let overview: String = movie.overview.chars().take(OVERVIEW_LIMIT).collect();
    json!({
        "username": USERNAME,
        "embeds": [{
            "title": format!("🎥 | {} has released!", movie.title),
            "description": format!("{overview}..."),
            "url": format!("{IMDB_TITLE_URL}{}", movie.imdb_id),
            "timestamp": sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "footer": {
                "text": FOOTER_TEXT,
                "icon_url": FOOTER_ICON_URL,
            },
            "thumbnail": {
                "url": format!("{POSTER_URL}{}", movie.poster_path),
            },
            "fields": [
                { "name": "Release Date", "value": &movie.release_date, "inline": true },
                { "name": "Status", "value": &movie.status, "inline": true },
                { "name": "Popularity", "value": movie.popularity.to_string(), "inline": true },
            ],
        }],
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::announcement;
    use crate::job::tmdb::MovieDetails;

    fn movie() -> MovieDetails {
        MovieDetails {
            title: "Dune: Part Two".to_string(),
            overview: "Paul Atreides unites with the Fremen.".to_string(),
            poster_path: "/poster.jpg".to_string(),
            imdb_id: "tt15239678".to_string(),
            release_date: "2024-03-01".to_string(),
            status: "Released".to_string(),
            popularity: 123.45,
        }
    }

    #[test]
    fn fills_every_announcement_field() {
        let sent_at = Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 5).unwrap();
        let payload = announcement(&movie(), sent_at);

        assert_eq!(payload["username"], "MovieRSS");
        let embed = &payload["embeds"][0];
        assert_eq!(embed["title"], "🎥 | Dune: Part Two has released!");
        assert_eq!(
            embed["description"],
            "Paul Atreides unites with the Fremen...."
        );
        assert_eq!(embed["url"], "https://imdb.com/title/tt15239678");
        assert_eq!(embed["timestamp"], "2024-03-02T09:30:05.000Z");
        assert_eq!(
            embed["thumbnail"]["url"],
            "https://image.tmdb.org/t/p/original/poster.jpg"
        );
        assert_eq!(embed["footer"]["text"], "Data provided by The Movie DB");
        assert_eq!(embed["fields"][0]["value"], "2024-03-01");
        assert_eq!(embed["fields"][1]["value"], "Released");
        assert_eq!(embed["fields"][2]["value"], "123.45");
        assert_eq!(embed["fields"][2]["inline"], true);
    }

    #[test]
    fn truncates_long_overviews_to_the_description_cap() {
        let mut long = movie();
        long.overview = "x".repeat(4000);
        let payload = announcement(&long, Utc::now());

        let description = payload["embeds"][0]["description"].as_str().unwrap();
        assert_eq!(description.len(), 2048);
        assert!(description.ends_with("..."));
    }
}
