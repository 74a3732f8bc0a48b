//! Final-score recording

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::ScoreStoreError;
use crate::game::{GameKind, HandMode};

/// One finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub session_id: Uuid,
    pub game: GameKind,
    pub mode: HandMode,
    pub final_score: u64,
    pub level: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Acknowledgement for a recorded score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreAck {
    /// Best score for this game after recording
    pub best: u64,
    pub new_best: bool,
}

/// Destination for final scores
pub trait ScoreRecorder: Send {
    fn record_score(&mut self, record: &ScoreRecord) -> Result<ScoreAck, ScoreStoreError>;
}

/// Best score per game kind
#[derive(Debug, Clone, Copy, Default)]
struct Bests {
    shooter: u64,
    flight: u64,
}

impl Bests {
    fn slot(&mut self, game: GameKind) -> &mut u64 {
        match game {
            GameKind::Shooter => &mut self.shooter,
            GameKind::Flight => &mut self.flight,
        }
    }

    fn offer(&mut self, game: GameKind, score: u64) -> ScoreAck {
        let best = self.slot(game);
        let new_best = score > *best;
        if new_best {
            *best = score;
        }
        ScoreAck {
            best: *best,
            new_best,
        }
    }
}

/// Records scores in the log only
#[derive(Debug, Default)]
pub struct LogOnlyRecorder {
    bests: Bests,
}

impl LogOnlyRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreRecorder for LogOnlyRecorder {
    fn record_score(&mut self, record: &ScoreRecord) -> Result<ScoreAck, ScoreStoreError> {
        let ack = self.bests.offer(record.game, record.final_score);
        info!(
            session_id = %record.session_id,
            game = record.game.as_str(),
            score = record.final_score,
            level = record.level,
            new_best = ack.new_best,
            "Final score"
        );
        Ok(ack)
    }
}

/// Appends one JSON object per game to a file
#[derive(Debug)]
pub struct JsonlScoreLog {
    path: PathBuf,
    file: File,
    bests: Bests,
}

impl JsonlScoreLog {
    /// Open or create the log. Existing records seed the best scores;
    /// unreadable lines are skipped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScoreStoreError> {
        let path = path.as_ref().to_path_buf();
        let mut bests = Bests::default();

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            for (line_no, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<ScoreRecord>(&line) {
                    Ok(record) => {
                        bests.offer(record.game, record.final_score);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), line = line_no + 1, error = %e, "Skipping bad score record");
                    }
                }
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!(path = %path.display(), "Score log opened");
        Ok(Self { path, file, bests })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreRecorder for JsonlScoreLog {
    fn record_score(&mut self, record: &ScoreRecord) -> Result<ScoreAck, ScoreStoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;

        let ack = self.bests.offer(record.game, record.final_score);
        info!(
            session_id = %record.session_id,
            score = record.final_score,
            new_best = ack.new_best,
            "Score recorded"
        );
        Ok(ack)
    }
}
