//! Persistence port: a key-value storage trait and the tournament load/save built on it.
//!
//! Values are stored as the same JSON the browser app kept under `cta_teams`, `cta_matches`
//! and `cta_playoffs`, so existing saved state can be read back unchanged.

use crate::models::{Match, PlayoffState, Team, Tournament, TournamentId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const STORAGE_TEAMS: &str = "cta_teams";
pub const STORAGE_MATCHES: &str = "cta_matches";
pub const STORAGE_PLAYOFFS: &str = "cta_playoffs";

/// Errors from reading or writing stored state.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "storage I/O error: {}", e),
            StoreError::Json(e) => write!(f, "stored data is not valid JSON: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// String key-value storage (the shape of browser local storage).
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Write several keys as one save. Backends that can stage writes should not leave a mix
    /// of old and new values behind when one of them fails.
    fn set_items(&mut self, items: &[(&str, String)]) -> Result<(), StoreError> {
        for (key, value) in items {
            self.set_item(key, value)?;
        }
        Ok(())
    }
}

/// Storage held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage in a directory, one `<key>.json` file per key.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn staging_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.staging_path(key), value)?;
        std::fs::rename(self.staging_path(key), self.path(key))?;
        Ok(())
    }

    /// Every value is written to a staging file first; the live files are only replaced
    /// (by rename) once all of them were written.
    fn set_items(&mut self, items: &[(&str, String)]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        for (key, value) in items {
            if let Err(e) = std::fs::write(self.staging_path(key), value) {
                for (key, _) in items {
                    let _ = std::fs::remove_file(self.staging_path(key));
                }
                return Err(e.into());
            }
        }
        for (key, _) in items {
            std::fs::rename(self.staging_path(key), self.path(key))?;
        }
        Ok(())
    }
}

/// Loads and saves tournament state through a [`Storage`].
#[derive(Clone, Debug, Default)]
pub struct TournamentStore<S: Storage> {
    storage: S,
}

impl<S: Storage> TournamentStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Missing key loads as no teams.
    pub fn load_teams(&self) -> Result<Vec<Team>, StoreError> {
        self.load_list(STORAGE_TEAMS)
    }

    pub fn save_teams(&mut self, teams: &[Team]) -> Result<(), StoreError> {
        self.storage
            .set_item(STORAGE_TEAMS, &serde_json::to_string(teams)?)
    }

    /// Missing key loads as no matches.
    ///
    /// Older saves may hold scores that are not non-negative integers (`-5`, `12.5`). Such a
    /// match keeps its fixture but loses its result; a row that still does not read is dropped.
    /// Both cases are logged.
    pub fn load_matches(&self) -> Result<Vec<Match>, StoreError> {
        let rows: Vec<serde_json::Value> = self.load_list(STORAGE_MATCHES)?;
        let mut matches = Vec::with_capacity(rows.len());
        for (i, mut row) in rows.into_iter().enumerate() {
            match serde_json::from_value::<Match>(row.clone()) {
                Ok(m) => matches.push(m),
                Err(e) => {
                    if let Some(fields) = row.as_object_mut() {
                        fields.insert("aScore".into(), serde_json::Value::Null);
                        fields.insert("bScore".into(), serde_json::Value::Null);
                        fields.insert("done".into(), serde_json::Value::Bool(false));
                    }
                    match serde_json::from_value::<Match>(row) {
                        Ok(m) => {
                            log::warn!("Cleared unreadable result of stored match {}: {}", i, e);
                            matches.push(m);
                        }
                        Err(e) => log::warn!("Skipping unreadable stored match {}: {}", i, e),
                    }
                }
            }
        }
        Ok(matches)
    }

    pub fn save_matches(&mut self, matches: &[Match]) -> Result<(), StoreError> {
        self.storage
            .set_item(STORAGE_MATCHES, &serde_json::to_string(matches)?)
    }

    /// Missing or unreadable playoff state loads as no playoffs.
    pub fn load_playoffs(&self) -> Result<Option<PlayoffState>, StoreError> {
        let Some(raw) = self.storage.get_item(STORAGE_PLAYOFFS)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                log::warn!("Ignoring unreadable playoff state: {}", e);
                Ok(None)
            }
        }
    }

    /// `None` is stored as JSON `null`.
    pub fn save_playoffs(&mut self, playoffs: Option<&PlayoffState>) -> Result<(), StoreError> {
        self.storage
            .set_item(STORAGE_PLAYOFFS, &serde_json::to_string(&playoffs)?)
    }

    pub fn load_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        Ok(Tournament {
            id,
            teams: self.load_teams()?,
            matches: self.load_matches()?,
            playoffs: self.load_playoffs()?,
        })
    }

    /// All three values are serialized before anything is written.
    pub fn save_tournament(&mut self, tournament: &Tournament) -> Result<(), StoreError> {
        let items = [
            (STORAGE_TEAMS, serde_json::to_string(&tournament.teams)?),
            (STORAGE_MATCHES, serde_json::to_string(&tournament.matches)?),
            (STORAGE_PLAYOFFS, serde_json::to_string(&tournament.playoffs)?),
        ];
        self.storage.set_items(&items)
    }

    fn load_list<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.storage.get_item(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}
