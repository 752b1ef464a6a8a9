use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed per-level identifier used by the Score Service.
pub type LevelId = u32;

/// Opaque player identifier issued by the Score Service's user records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final result of one session, as posted to the Score Service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub score: u32,
    pub user_id: UserId,
    pub level_id: LevelId,
}

/// Destination for finished sessions.
///
/// `submit` must return without waiting on the network. Implementations own
/// any retry or logging policy; the level never learns the outcome.
pub trait ScoreSink: Send + Sync {
    fn submit(&self, submission: ScoreSubmission);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_wire_shape() {
        let sub = ScoreSubmission {
            score: 5,
            user_id: UserId::new("42"),
            level_id: 5,
        };
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "score": 5, "user_id": "42", "level_id": 5 })
        );
    }

    #[test]
    fn user_id_displays_raw() {
        let id = UserId::new("42");
        assert_eq!(id.to_string(), "42");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""42""#);
    }
}
