use serde::{Deserialize, Serialize};

use fruitquest_core::score::{LevelId, UserId};

/// Default cap on stored score rows.
const DEFAULT_MAX_RECORDS: usize = 10_000;

/// One persisted score row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: u64,
    pub user_id: UserId,
    pub level_id: LevelId,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(ScoreRecord),
    /// A row for this (user, level) already exists; the caller must patch it.
    Duplicate { existing_id: u64 },
    Full,
}

/// In-memory score table with one row per (user, level).
pub struct ScoreStore {
    records: Vec<ScoreRecord>,
    next_id: u64,
    max_records: usize,
}

impl Default for ScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_RECORDS)
    }

    pub fn with_capacity(max_records: usize) -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            max_records,
        }
    }

    pub fn insert(&mut self, user_id: UserId, level_id: LevelId, score: u32) -> InsertOutcome {
        if let Some(existing) = self
            .records
            .iter()
            .find(|r| r.user_id == user_id && r.level_id == level_id)
        {
            return InsertOutcome::Duplicate {
                existing_id: existing.id,
            };
        }
        if self.records.len() >= self.max_records {
            return InsertOutcome::Full;
        }
        let record = ScoreRecord {
            id: self.next_id,
            user_id,
            level_id,
            score,
        };
        self.next_id += 1;
        self.records.push(record.clone());
        InsertOutcome::Created(record)
    }

    pub fn list(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// Overwrite a row's score. Returns the updated row, or `None` if unknown.
    pub fn update(&mut self, id: u64, score: u32) -> Option<ScoreRecord> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        record.score = score;
        Some(record.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
