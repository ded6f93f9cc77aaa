use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const DIR_NAME: &str = ".astro_shooter";
const FILE_NAME: &str = "highscore.txt";

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("could not locate a home directory")]
    NoHomeDir,
    #[error("failed to write high score to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the best score survives between runs.
pub trait HighScoreStore {
    /// The stored score, or 0 when nothing usable is stored.
    fn load(&self) -> u32;

    fn save(&mut self, score: u32) -> Result<(), HighScoreError>;
}

/// A decimal integer in a text file.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileHighScoreStore { path: path.into() }
    }

    /// `~/.astro_shooter/highscore.txt`
    pub fn default_location() -> Result<Self, HighScoreError> {
        let home = dirs::home_dir().ok_or(HighScoreError::NoHomeDir)?;
        Ok(Self::new(home.join(DIR_NAME).join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored high score");
                return 0;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read high score");
                return 0;
            }
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return 0;
        }
        match trimmed.parse() {
            Ok(score) => score,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "malformed high score file");
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<(), HighScoreError> {
        let write_err = |source| HighScoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, score.to_string()).map_err(write_err)
    }
}

/// Keeps the score in memory. Counts saves so callers can tell when one
/// happened.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    score: u32,
    saves: usize,
}

impl MemoryHighScoreStore {
    pub fn new(score: u32) -> Self {
        MemoryHighScoreStore { score, saves: 0 }
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.score
    }

    fn save(&mut self, score: u32) -> Result<(), HighScoreError> {
        self.score = score;
        self.saves += 1;
        Ok(())
    }
}
