//! File-backed study set library and score persistence.
//!
//! Sets live as one JSON file per topic inside the data directory.
//! Malformed files are skipped with a warning on load; a bad file never
//! aborts the rest of a batch.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use flashdeck_core::{persist, KeyValueStore, SetError, StudySet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Set(#[from] SetError),

    #[error("a set named {0:?} already exists")]
    DuplicateTopic(String),
}

/// In-memory set library with write-through JSON persistence.
pub struct Library {
    dir: PathBuf,
    sets: BTreeMap<String, StudySet>,
}

impl Library {
    /// Open a library over a data directory, creating it if needed and
    /// loading every readable set file. Files are visited in name order
    /// so that duplicate topics resolve first-loaded-wins.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut library = Self {
            dir: dir.clone(),
            sets: BTreeMap::new(),
        };

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            if let Err(reason) = library.load_file(&path) {
                tracing::warn!("skipping set file {}: {}", path.display(), reason);
            }
        }

        tracing::info!("loaded {} study sets from {}", library.sets.len(), dir.display());
        Ok(library)
    }

    fn load_file(&mut self, path: &Path) -> Result<(), String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let set = persist::from_json(&content).map_err(|e| e.to_string())?;
        if self.sets.contains_key(&set.topic) {
            return Err(format!("duplicate topic {:?}", set.topic));
        }
        self.sets.insert(set.topic.clone(), set);
        Ok(())
    }

    pub fn list(&self) -> impl Iterator<Item = &StudySet> {
        self.sets.values()
    }

    pub fn get(&self, topic: &str) -> Option<&StudySet> {
        self.sets.get(topic)
    }

    /// Add a validated set and persist it. Fails on duplicate topics.
    pub fn create(&mut self, set: StudySet) -> Result<(), LibraryError> {
        set.validate()?;
        if self.sets.contains_key(&set.topic) {
            return Err(LibraryError::DuplicateTopic(set.topic));
        }
        self.save(&set)?;
        self.sets.insert(set.topic.clone(), set);
        Ok(())
    }

    /// Import one exported file. Duplicate topics are dropped,
    /// first-loaded wins.
    pub fn import(&mut self, content: &str) -> Result<String, LibraryError> {
        let set = persist::from_json(content)?;
        if self.sets.contains_key(&set.topic) {
            return Err(LibraryError::DuplicateTopic(set.topic));
        }
        let topic = set.topic.clone();
        self.save(&set)?;
        self.sets.insert(topic.clone(), set);
        Ok(topic)
    }

    /// Serialized export of a set with its derived filename.
    pub fn export(&self, topic: &str) -> Option<Result<(String, String), LibraryError>> {
        let set = self.sets.get(topic)?;
        Some(
            persist::to_json(set)
                .map(|json| (persist::export_filename(topic), json))
                .map_err(LibraryError::from),
        )
    }

    /// Flip a card's star flag and persist the set. `None` when the
    /// topic or card id is unknown.
    pub fn toggle_star(&mut self, topic: &str, card_id: &str) -> Result<Option<bool>, LibraryError> {
        let Some(set) = self.sets.get_mut(topic) else {
            return Ok(None);
        };
        let Some(starred) = set.toggle_star(card_id) else {
            return Ok(None);
        };
        let snapshot = set.clone();
        self.save(&snapshot)?;
        Ok(Some(starred))
    }

    fn save(&self, set: &StudySet) -> Result<(), LibraryError> {
        let path = self.dir.join(persist::export_filename(&set.topic));
        fs::write(path, persist::to_json(set)?)?;
        Ok(())
    }
}

/// Best-time persistence: a single JSON map file in the data directory,
/// injected into the match minigame as a key-value capability.
pub struct ScoreStore {
    path: PathBuf,
    values: HashMap<String, u64>,
}

impl ScoreStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("resetting unreadable score file {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }
}

impl KeyValueStore for ScoreStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_string(), value);
        match serde_json::to_string_pretty(&self.values) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    tracing::warn!("failed to persist scores: {}", e);
                }
            }
            Err(e) => tracing::warn!("failed to serialize scores: {}", e),
        }
    }
}
