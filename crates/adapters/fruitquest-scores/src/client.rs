use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fruitquest_core::score::{LevelId, ScoreSubmission, UserId};

use crate::config::ScoreServiceConfig;

/// Which request of the submission chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    Post,
    Fetch,
    Patch,
}

impl fmt::Display for SubmitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubmitStage::Post => "post",
            SubmitStage::Fetch => "fetch",
            SubmitStage::Patch => "patch",
        })
    }
}

#[derive(Debug)]
pub enum ScoreError {
    /// The HTTP client could not be constructed.
    Client(reqwest::Error),
    /// The request never got a response.
    Transport {
        stage: SubmitStage,
        source: reqwest::Error,
    },
    /// The response body was not the JSON we expected.
    Decode {
        stage: SubmitStage,
        source: reqwest::Error,
    },
    /// The service asked for a patch but lists no matching record.
    RecordNotFound { user_id: UserId, level_id: LevelId },
}

impl ScoreError {
    pub fn stage(&self) -> SubmitStage {
        match self {
            ScoreError::Client(_) => SubmitStage::Post,
            ScoreError::Transport { stage, .. } | ScoreError::Decode { stage, .. } => *stage,
            ScoreError::RecordNotFound { .. } => SubmitStage::Fetch,
        }
    }
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::Client(e) => write!(f, "failed to build HTTP client: {e}"),
            ScoreError::Transport { stage, source } => write!(f, "score {stage} failed: {source}"),
            ScoreError::Decode { stage, source } => {
                write!(f, "score {stage} returned an unreadable body: {source}")
            },
            ScoreError::RecordNotFound { user_id, level_id } => {
                write!(f, "no score record for user {user_id} on level {level_id}")
            },
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScoreError::Client(e)
            | ScoreError::Transport { source: e, .. }
            | ScoreError::Decode { source: e, .. } => Some(e),
            ScoreError::RecordNotFound { .. } => None,
        }
    }
}

/// How a submission ended up stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated { record_id: String },
}

/// One row of `GET /scores`. Fields are kept loose because the service has
/// returned ids both as numbers and as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRecord {
    pub id: Value,
    pub user_id: Value,
    pub level_id: Value,
    #[serde(default)]
    pub score: Value,
}

impl ScoreRecord {
    pub fn matches(&self, user_id: &UserId, level_id: LevelId) -> bool {
        loose_eq(&self.user_id, user_id.as_str()) && loose_eq(&self.level_id, &level_id.to_string())
    }

    /// Id as it appears in `/scores/{id}`.
    pub fn path_id(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// String/number comparison that treats `7` and `"7"` as equal.
fn loose_eq(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Number(n) => n.to_string() == expected,
        _ => false,
    }
}

/// Whether a POST response carries a truthy `requirePatch` flag.
pub fn requires_patch(body: &Value) -> bool {
    match body.get("requirePatch") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// First record belonging to this user and level.
pub fn find_record<'a>(
    records: &'a [ScoreRecord],
    user_id: &UserId,
    level_id: LevelId,
) -> Option<&'a ScoreRecord> {
    records.iter().find(|r| r.matches(user_id, level_id))
}

#[derive(Serialize)]
struct PatchBody {
    score: u32,
}

/// HTTP client for the Score Service.
pub struct ScoreClient {
    config: ScoreServiceConfig,
    client: reqwest::Client,
}

impl ScoreClient {
    pub fn new(config: ScoreServiceConfig) -> Result<Self, ScoreError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ScoreError::Client)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ScoreServiceConfig {
        &self.config
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
    }

    /// `POST /scores`. Returns the decoded response body whatever the status.
    pub async fn post_score(&self, submission: &ScoreSubmission) -> Result<Value, ScoreError> {
        let stage = SubmitStage::Post;
        let resp = self
            .request(reqwest::Method::POST, &self.config.scores_url())
            .json(submission)
            .send()
            .await
            .map_err(|source| ScoreError::Transport { stage, source })?;
        tracing::debug!(status = %resp.status(), "Score post answered");
        resp.json()
            .await
            .map_err(|source| ScoreError::Decode { stage, source })
    }

    /// `GET /scores`.
    pub async fn list_scores(&self) -> Result<Vec<ScoreRecord>, ScoreError> {
        let stage = SubmitStage::Fetch;
        let resp = self
            .request(reqwest::Method::GET, &self.config.scores_url())
            .send()
            .await
            .map_err(|source| ScoreError::Transport { stage, source })?;
        resp.json()
            .await
            .map_err(|source| ScoreError::Decode { stage, source })
    }

    /// `PATCH /scores/{id}`. The response body is not inspected.
    pub async fn patch_score(&self, record_id: &str, score: u32) -> Result<(), ScoreError> {
        let url = format!("{}/{record_id}", self.config.scores_url());
        let resp = self
            .request(reqwest::Method::PATCH, &url)
            .json(&PatchBody { score })
            .send()
            .await
            .map_err(|source| ScoreError::Transport {
                stage: SubmitStage::Patch,
                source,
            })?;
        tracing::debug!(status = %resp.status(), record_id, "Score patch answered");
        Ok(())
    }

    /// Post the score; if the service reports an existing record, look it up
    /// and patch it instead. No step is retried.
    pub async fn submit(&self, submission: &ScoreSubmission) -> Result<SubmitOutcome, ScoreError> {
        let body = self.post_score(submission).await?;
        if !requires_patch(&body) {
            return Ok(SubmitOutcome::Created);
        }

        let records = self.list_scores().await?;
        let record = find_record(&records, &submission.user_id, submission.level_id).ok_or_else(
            || ScoreError::RecordNotFound {
                user_id: submission.user_id.clone(),
                level_id: submission.level_id,
            },
        )?;
        let record_id = record.path_id();
        self.patch_score(&record_id, submission.score).await?;
        Ok(SubmitOutcome::Updated { record_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(v: Value) -> Vec<ScoreRecord> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn require_patch_truthiness() {
        assert!(requires_patch(&json!({ "requirePatch": true })));
        assert!(requires_patch(&json!({ "requirePatch": 1 })));
        assert!(requires_patch(&json!({ "requirePatch": "yes" })));
        assert!(requires_patch(&json!({ "requirePatch": {} })));
        assert!(!requires_patch(&json!({ "requirePatch": false })));
        assert!(!requires_patch(&json!({ "requirePatch": 0 })));
        assert!(!requires_patch(&json!({ "requirePatch": "" })));
        assert!(!requires_patch(&json!({ "requirePatch": null })));
        assert!(!requires_patch(&json!({ "id": 3, "score": 4 })));
        assert!(!requires_patch(&json!([1, 2])));
    }

    #[test]
    fn find_matches_loosely() {
        let rows = records(json!([
            { "id": 1, "user_id": 17, "level_id": 6, "score": 2 },
            { "id": 2, "user_id": "17", "level_id": "5", "score": 3 },
            { "id": 3, "user_id": 17, "level_id": 5, "score": 9 },
        ]));
        let user = UserId::new("17");
        assert_eq!(find_record(&rows, &user, 5).unwrap().path_id(), "2");
        assert_eq!(find_record(&rows, &user, 6).unwrap().path_id(), "1");
        assert!(find_record(&rows, &user, 7).is_none());
        assert!(find_record(&rows, &UserId::new("18"), 5).is_none());
    }

    #[test]
    fn string_ids_are_not_quoted_in_paths() {
        let rows = records(json!([{ "id": "abc", "user_id": "u", "level_id": 5 }]));
        assert_eq!(rows[0].path_id(), "abc");
        assert_eq!(rows[0].score, Value::Null);
    }

    #[test]
    fn record_not_found_is_a_fetch_failure() {
        let err = ScoreError::RecordNotFound {
            user_id: UserId::new("17"),
            level_id: 5,
        };
        assert_eq!(err.stage(), SubmitStage::Fetch);
        assert_eq!(err.to_string(), "no score record for user 17 on level 5");
    }
}
