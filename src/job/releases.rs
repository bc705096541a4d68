use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use super::Runnable;
use super::discord::Notifier;
use super::tmdb::{MovieDetails, TmdbClient};
use crate::config::Config;
use crate::store::{MovieStatus, StatusStore};

static TMDB_DATE_FORMAT: &str = "%Y-%m-%d";

/// Hourly watchlist sweep: fetch metadata for every movie that is not yet
/// settled, announce fresh releases once, and persist the outcome per movie.
pub struct ReleaseFetcher {
    watchlist: Vec<String>,
    tmdb: TmdbClient,
    notifier: Notifier,
    store: StatusStore,
}

impl ReleaseFetcher {
    /// Loading the store happens here, once at startup; a data file that
    /// does not parse aborts the process before any cycle runs.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(ReleaseFetcher {
            watchlist: config.watchlist.clone(),
            tmdb: TmdbClient::new(&config.tmdb),
            notifier: Notifier::new(&config.webhook_url),
            store: StatusStore::load(&config.data_file)?,
        })
    }

    /// One check cycle over the whole watchlist, in configured order. A
    /// failure for one movie is logged and never blocks the remaining
    /// entries, so the cycle itself always succeeds.
    pub async fn run_cycle(&mut self) -> Result<()> {
        for movie_id in &self.watchlist {
            match process_movie(&mut self.store, &self.tmdb, &self.notifier, movie_id).await {
                Ok(()) => tracing::debug!("finished processing movie {movie_id}"),
                Err(err) => tracing::error!("{err:#}"),
            }
        }
        Ok(())
    }
}

impl Runnable for ReleaseFetcher {
    async fn run(&mut self) -> Result<()> {
        self.run_cycle().await
    }
}

/// Release check for a single movie.
///
/// Settled movies are skipped without a fetch or a write. Otherwise the
/// current metadata decides the record: released movies are announced and
/// marked, unreleased ones just recorded. Every persisted state survives a
/// crash, so a failed announcement is retried on the next cycle while a
/// delivered one never repeats.
async fn process_movie(
    store: &mut StatusStore,
    tmdb: &TmdbClient,
    notifier: &Notifier,
    movie_id: &str,
) -> Result<()> {
    if store.is_settled(movie_id) {
        return Ok(());
    }

    // On fetch failure nothing is written; the movie is retried next cycle.
    let movie = tmdb
        .fetch_movie(movie_id)
        .await
        .with_context(|| format!("error fetching data for movie {movie_id}"))?;

    let today = Local::now().date_naive();
    if is_released(&movie.release_date, today) {
        tracing::debug!("{} has been released", movie.title);
        announce(store, notifier, movie_id, &movie).await
    } else {
        tracing::debug!("{} has not been released yet", movie.title);
        store.update(
            movie_id,
            MovieStatus {
                released: false,
                notified: false,
            },
        )?;
        Ok(())
    }
}

/// Send the announcement and persist the outcome. The release flag is kept
/// either way; only a delivered announcement also sets `notified`, so a
/// failure here means the next cycle retries just the notification.
async fn announce(
    store: &mut StatusStore,
    notifier: &Notifier,
    movie_id: &str,
    movie: &MovieDetails,
) -> Result<()> {
    match notifier.notify(movie).await {
        Ok(()) => {
            store.update(
                movie_id,
                MovieStatus {
                    released: true,
                    notified: true,
                },
            )?;
            Ok(())
        }
        Err(err) => {
            store.update(
                movie_id,
                MovieStatus {
                    released: true,
                    notified: false,
                },
            )?;
            Err(err).with_context(|| format!("error notifying release of {}", movie.title))
        }
    }
}

/// A movie counts as released once its release date is on or before `today`,
/// both taken as plain calendar dates. Dates that fail to parse are treated
/// as unreleased and checked again next cycle.
fn is_released(release_date: &str, today: NaiveDate) -> bool {
    match NaiveDate::parse_from_str(release_date, TMDB_DATE_FORMAT) {
        Ok(date) => date <= today,
        Err(err) => {
            tracing::warn!("ignoring unparseable release date {release_date:?}: {err}");
            false
        }
    }
}
