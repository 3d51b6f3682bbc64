use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use shakmaty::{Color, Role, Square};
use std::sync::Arc;

use chess_trainer_core::engine::PortState;
use chess_trainer_core::eval::Hint;
use chess_trainer_core::position::role_from_letter;
use chess_trainer_core::{
    analyze_position, EngineLevel, EngineReply, Position, PositionInfo, StandardOracle,
};

use super::ApiError;
use crate::{AppState, Session};

#[derive(Deserialize)]
pub struct NewGameRequest {
    pub color: String,
    pub level: Option<u8>,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

/// Game state handed back after every game action
#[derive(Serialize)]
pub struct GameView {
    pub position: Position,
    pub info: PositionInfo,
    pub player: &'static str,
    pub moves: Vec<String>,
    pub level: EngineLevel,
    pub engine: PortState,
    pub reply: Option<EngineReply>,
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn view(session: &Session, reply: Option<EngineReply>) -> Result<GameView, ApiError> {
    let info = analyze_position(&StandardOracle, session.position())?;
    Ok(GameView {
        position: session.position().clone(),
        info,
        player: color_name(session.player()),
        moves: session.moves().to_vec(),
        level: session.level(),
        engine: session.engine_state(),
        reply,
    })
}

fn parse_color(text: &str) -> Result<Color, ApiError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Color::White),
        "black" | "b" => Ok(Color::Black),
        other => Err(ApiError::BadRequest(format!("Unknown color \"{other}\""))),
    }
}

fn parse_square(text: &str) -> Result<Square, ApiError> {
    text.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid square \"{text}\"")))
}

fn parse_promotion(text: Option<&str>) -> Result<Option<Role>, ApiError> {
    let letter = match text.and_then(|t| t.trim().chars().next()) {
        Some(letter) => letter,
        None => return Ok(None),
    };
    match role_from_letter(letter) {
        Some(role @ (Role::Queen | Role::Rook | Role::Bishop | Role::Knight)) => Ok(Some(role)),
        _ => Err(ApiError::BadRequest(format!("Invalid promotion piece \"{letter}\""))),
    }
}

/// Starts a new game; the computer opens when the player takes black
pub async fn new_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewGameRequest>,
) -> Result<Json<GameView>, ApiError> {
    let player = parse_color(&request.color)?;
    let level = request
        .level
        .map(EngineLevel::new)
        .unwrap_or(state.config.engine_level);

    let mut session = state.session.lock().await;
    session.set_level(level);
    session.new_game(player);

    let reply = if player == Color::Black {
        session.engine_move().await?
    } else {
        None
    };
    Ok(Json(view(&session, reply)?))
}

pub async fn play_move(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<GameView>, ApiError> {
    let from = parse_square(&request.from)?;
    let to = parse_square(&request.to)?;
    let promotion = parse_promotion(request.promotion.as_deref())?;

    let mut session = state.session.lock().await;
    session.play(from, to, promotion)?;
    Ok(Json(view(&session, None)?))
}

pub async fn engine_move(State(state): State<Arc<AppState>>) -> Result<Json<GameView>, ApiError> {
    let mut session = state.session.lock().await;
    let reply = session.engine_move().await?;
    Ok(Json(view(&session, reply)?))
}

pub async fn hint(State(state): State<Arc<AppState>>) -> Json<Option<Hint>> {
    let session = state.session.lock().await;
    Json(session.hint())
}

/// Sets up a position a few greedy plies into a fresh game
pub async fn tactic(State(state): State<Arc<AppState>>) -> Result<Json<GameView>, ApiError> {
    let mut session = state.session.lock().await;
    {
        let mut rng = rand::rng();
        session.random_tactic(&mut rng)?;
    }
    Ok(Json(view(&session, None)?))
}
