//! High score leaderboard
//!
//! Top five `(name, score)` entries, best first. Storage sits behind
//! [`LeaderboardStore`]: LocalStorage in the browser, a JSON file natively,
//! memory in tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<HighScoreEntry>,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("player name is empty")]
    EmptyName,
    #[error("leaderboard storage unavailable: {0}")]
    Unavailable(String),
    #[error("leaderboard io: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard data malformed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a score if it qualifies. Returns the rank achieved.
    /// Ties keep the earlier entry ahead.
    pub fn add_score(&mut self, name: &str, score: u64) -> Result<Option<usize>, LeaderboardError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(LeaderboardError::EmptyName);
        }
        if !self.qualifies(score) {
            return Ok(None);
        }

        let entry = HighScoreEntry { name, score };
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        Ok(Some(rank))
    }

    /// Restore ordering and size after loading untrusted data
    fn normalize(mut self) -> Self {
        self.entries.retain(|e| !e.name.trim().is_empty());
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        Ok(serde_json::from_str::<Self>(json)?.normalize())
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Where the leaderboard lives between sessions
pub trait LeaderboardStore {
    /// Read the saved board. A missing board is `Ok` and empty.
    fn load(&mut self) -> Result<Leaderboard, LeaderboardError>;
    fn save(&mut self, board: &Leaderboard) -> Result<(), LeaderboardError>;

    /// Load, treating unreadable or malformed data as an empty board
    fn load_or_default(&mut self) -> Leaderboard {
        match self.load() {
            Ok(board) => board,
            Err(e) => {
                log::warn!("Starting with an empty leaderboard: {}", e);
                Leaderboard::new()
            }
        }
    }

    /// Add a score and persist the result. Returns the rank if it placed.
    fn submit(&mut self, name: &str, score: u64) -> Result<Option<usize>, LeaderboardError> {
        let mut board = self.load_or_default();
        let rank = board.add_score(name, score)?;
        if rank.is_some() {
            self.save(&board)?;
        }
        Ok(rank)
    }
}

/// Keeps the board as serialized JSON in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub json: Option<String>,
}

impl LeaderboardStore for MemoryStore {
    fn load(&mut self) -> Result<Leaderboard, LeaderboardError> {
        match &self.json {
            Some(json) => Leaderboard::from_json(json),
            None => Ok(Leaderboard::new()),
        }
    }

    fn save(&mut self, board: &Leaderboard) -> Result<(), LeaderboardError> {
        self.json = Some(board.to_json()?);
        Ok(())
    }
}

/// JSON file on disk (native builds)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    pub path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LeaderboardStore for JsonFileStore {
    fn load(&mut self) -> Result<Leaderboard, LeaderboardError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Leaderboard::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Leaderboard::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, board: &Leaderboard) -> Result<(), LeaderboardError> {
        std::fs::write(&self.path, board.to_json()?)?;
        log::info!(
            "High scores saved to {} ({} entries)",
            self.path.display(),
            board.entries.len()
        );
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "electric_rush_leaderboard";

    fn storage() -> Result<web_sys::Storage, LeaderboardError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| LeaderboardError::Unavailable("no localStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl LeaderboardStore for LocalStorageStore {
    fn load(&mut self) -> Result<Leaderboard, LeaderboardError> {
        let item = Self::storage()?
            .get_item(Self::STORAGE_KEY)
            .map_err(|e| LeaderboardError::Unavailable(format!("{:?}", e)))?;
        match item {
            Some(json) => {
                let board = Leaderboard::from_json(&json)?;
                log::info!("Loaded {} high scores", board.entries.len());
                Ok(board)
            }
            None => Ok(Leaderboard::new()),
        }
    }

    fn save(&mut self, board: &Leaderboard) -> Result<(), LeaderboardError> {
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &board.to_json()?)
            .map_err(|e| LeaderboardError::Unavailable(format!("{:?}", e)))?;
        log::info!("High scores saved ({} entries)", board.entries.len());
        Ok(())
    }
}
