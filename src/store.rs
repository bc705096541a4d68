use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

/// Release-check flags for one watched movie.
///
/// A missing record and a default record mean the same thing: not released,
/// not notified. Both fields are required in the data file and no other
/// fields are accepted, so a file of any other shape fails to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MovieStatus {
    pub released: bool,
    pub notified: bool,
}

impl MovieStatus {
    /// Both flags set: the announcement went out, nothing left to do.
    pub fn settled(&self) -> bool {
        self.released && self.notified
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("error reading data file: {0}")]
    Read(#[source] io::Error),
    #[error("error parsing data file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("error writing data file: {0}")]
    Write(#[source] io::Error),
}

/// Map from movie id to check status, mirrored to a JSON file.
///
/// Loaded once at startup; the in-memory map is the source of truth for the
/// process lifetime and every mutation rewrites the whole file before
/// returning. Not safe to share between processes.
pub struct StatusStore {
    path: PathBuf,
    records: BTreeMap<String, MovieStatus>,
}

impl StatusStore {
    /// Open the store, creating an empty data file when none exists yet.
    ///
    /// A file that exists but does not parse is a hard error rather than a
    /// reset: replacing possibly-correct flags with an empty map could
    /// re-announce movies that were already notified.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            let store = StatusStore {
                path,
                records: BTreeMap::new(),
            };
            store.save()?;
            tracing::debug!("data file created");
            return Ok(store);
        }
        let raw = fs::read_to_string(&path).map_err(StoreError::Read)?;
        let records = serde_json::from_str(&raw)?;
        Ok(StatusStore { path, records })
    }

    /// Current record for `movie_id`; ids never seen before report the
    /// default (unreleased, unnotified) status.
    pub fn status(&self, movie_id: &str) -> MovieStatus {
        self.records.get(movie_id).copied().unwrap_or_default()
    }

    pub fn is_settled(&self, movie_id: &str) -> bool {
        self.status(movie_id).settled()
    }

    /// Upsert one record and flush the full map to disk.
    pub fn update(&mut self, movie_id: &str, status: MovieStatus) -> Result<(), StoreError> {
        self.records.insert(movie_id.to_string(), status);
        self.save()
    }

    fn save(&self) -> Result<(), StoreError> {
        // The data file format is 3-space indented JSON.
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"   "));
        self.records.serialize(&mut ser)?;
        fs::write(&self.path, buf).map_err(StoreError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::MovieStatus;

    #[test]
    fn only_fully_flagged_records_are_settled() {
        assert!(!MovieStatus::default().settled());
        assert!(
            !MovieStatus {
                released: true,
                notified: false
            }
            .settled()
        );
        assert!(
            MovieStatus {
                released: true,
                notified: true
            }
            .settled()
        );
    }
}
