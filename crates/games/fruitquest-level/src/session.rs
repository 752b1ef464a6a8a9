use std::fmt;

use serde::{Deserialize, Serialize};

use fruitquest_core::score::{LevelId, ScoreSubmission, UserId};

use crate::collectibles::Collectible;

/// Default countdown length in seconds.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 30;

/// Lifecycle of one play-through. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Closed,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Counting { seconds_remaining: u32 },
    /// The clock just reached zero. Emitted exactly once per session.
    Expired { final_score: u32 },
    /// Tick arrived after the session closed.
    Ignored,
}

/// Result of the player touching a collectible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collect {
    Collected { score: u32 },
    AlreadyConsumed,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    StillActive { seconds_remaining: u32 },
    AlreadySubmitted,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::StillActive { seconds_remaining } => {
                write!(f, "session still active ({seconds_remaining}s left)")
            },
            SessionError::AlreadySubmitted => write!(f, "score already submitted"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Score and countdown for one level attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSession {
    level_id: LevelId,
    seconds_remaining: u32,
    score: u32,
    state: SessionState,
    submitted: bool,
}

impl LevelSession {
    /// Start a session. A zero countdown is raised to one second so the
    /// session always has a closing transition.
    pub fn new(level_id: LevelId, countdown_secs: u32) -> Self {
        Self {
            level_id,
            seconds_remaining: countdown_secs.max(1),
            score: 0,
            state: SessionState::Active,
            submitted: false,
        }
    }

    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn on_tick(&mut self) -> Tick {
        if !self.is_active() {
            return Tick::Ignored;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.state = SessionState::Closed;
            Tick::Expired {
                final_score: self.score,
            }
        } else {
            Tick::Counting {
                seconds_remaining: self.seconds_remaining,
            }
        }
    }

    pub fn on_overlap(&mut self, collectible: &mut Collectible) -> Collect {
        if self.seconds_remaining == 0 {
            return Collect::Inactive;
        }
        if !collectible.consume() {
            return Collect::AlreadyConsumed;
        }
        self.score += 1;
        Collect::Collected { score: self.score }
    }

    /// Build the one submission for this session.
    pub fn take_submission(&mut self, user_id: &UserId) -> Result<ScoreSubmission, SessionError> {
        if self.is_active() {
            return Err(SessionError::StillActive {
                seconds_remaining: self.seconds_remaining,
            });
        }
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        self.submitted = true;
        Ok(ScoreSubmission {
            score: self.score,
            user_id: user_id.clone(),
            level_id: self.level_id,
        })
    }
}
