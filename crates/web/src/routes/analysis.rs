use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use chess_trainer_core::{AnalysisPipeline, AnalysisReport, ReplaySession, StandardOracle};

use super::ApiError;
use crate::AppState;

#[derive(Deserialize)]
pub struct StepRequest {
    pub direction: i32,
}

/// Analyses the posted PGN and makes it the current replay session
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    pgn: String,
) -> Result<Json<AnalysisReport>, ApiError> {
    let mut pipeline =
        AnalysisPipeline::new(StandardOracle).map_err(chess_trainer_core::Error::from)?;
    pipeline.submit(&pgn);
    let report = pipeline.run().await;

    tracing::info!(plies = report.log.len(), complete = report.is_complete(), "PGN analysed");
    *state.replay.lock().await = ReplaySession::new(report.clone());

    Ok(Json(report))
}

pub async fn replay_step(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StepRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut replay = state.replay.lock().await;
    let session = replay
        .as_mut()
        .ok_or_else(|| ApiError::Conflict("No analysed game to replay".to_string()))?;

    let frame = session.step(request.direction);
    let value = serde_json::to_value(&frame).map_err(chess_trainer_core::Error::from)?;
    Ok(Json(value))
}
