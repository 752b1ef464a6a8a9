use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use fruitquest_core::score::ScoreSubmission;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::{InsertOutcome, ScoreRecord};

/// Request body for `PATCH /scores/{id}`.
#[derive(Debug, Deserialize)]
pub struct PatchScoreBody {
    pub score: u32,
}

/// POST /scores: create a score row, or ask the client to patch an existing one.
pub async fn post_score(
    State(state): State<AppState>,
    Json(body): Json<ScoreSubmission>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user_id = body.user_id.as_str();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("user_id is empty".to_string()));
    }
    let max_len = state.config.limits.max_user_id_len;
    if user_id.len() > max_len {
        return Err(AppError::BadRequest(format!(
            "user_id exceeds {max_len} chars"
        )));
    }

    let outcome = state
        .scores
        .write()
        .await
        .insert(body.user_id.clone(), body.level_id, body.score);
    match outcome {
        InsertOutcome::Created(record) => {
            tracing::info!(
                id = record.id,
                level_id = record.level_id,
                score = record.score,
                "Score created"
            );
            Ok((StatusCode::CREATED, Json(json!(record))))
        },
        InsertOutcome::Duplicate { existing_id } => {
            tracing::debug!(existing_id, "Duplicate score, asking client to patch");
            Ok((StatusCode::OK, Json(json!({ "requirePatch": true }))))
        },
        InsertOutcome::Full => Err(AppError::Unavailable(
            "score table is full".to_string(),
        )),
    }
}

/// GET /scores: every stored row.
pub async fn list_scores(State(state): State<AppState>) -> Json<Vec<ScoreRecord>> {
    Json(state.scores.read().await.list().to_vec())
}

/// PATCH /scores/{id}: overwrite a row's score.
pub async fn patch_score(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<PatchScoreBody>,
) -> Result<Json<ScoreRecord>, AppError> {
    state
        .scores
        .write()
        .await
        .update(id, body.score)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("score {id} not found")))
}
