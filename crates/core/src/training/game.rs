//! Play against the engine, with the greedy selector as a stand-in

use rand::Rng;
use serde::Serialize;
use shakmaty::{Color, Role, Square};
use tracing::{debug, info, warn};

use crate::engine::{EngineLevel, EnginePort, PortState, SearchEngine, SearchRequest};
use crate::error::{Error, Result};
use crate::eval::{analysis_hint, best_move, Hint};
use crate::moves::ResolvedMove;
use crate::oracle::{play_resolved, Oracle};
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSource {
    Engine,
    Fallback,
}

/// The move the computer side played
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineReply {
    #[serde(rename = "move")]
    pub mv: ResolvedMove,
    pub source: MoveSource,
}

/// State of one game against the computer
pub struct GameSession<O: Oracle, E> {
    oracle: O,
    start: Position,
    position: Position,
    player: Color,
    moves: Vec<String>,
    level: EngineLevel,
    depth_override: Option<u8>,
    port: EnginePort<E>,
}

impl<O: Oracle, E: SearchEngine> GameSession<O, E> {
    pub fn new(oracle: O, port: EnginePort<E>, level: EngineLevel) -> Result<Self> {
        let start = oracle.new_position(None)?;
        Ok(Self {
            oracle,
            position: start.clone(),
            start,
            player: Color::White,
            moves: Vec::new(),
            level,
            depth_override: None,
            port,
        })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn player(&self) -> Color {
        self.player
    }

    /// Coordinate-notation moves from the start position
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn level(&self) -> EngineLevel {
        self.level
    }

    pub fn set_level(&mut self, level: EngineLevel) {
        self.level = level;
    }

    pub fn set_depth_override(&mut self, depth: Option<u8>) {
        self.depth_override = depth;
    }

    pub fn engine_state(&self) -> PortState {
        self.port.state()
    }

    /// Starts over. When `player` is black the caller asks for an engine move next.
    pub fn new_game(&mut self, player: Color) {
        self.position = self.start.clone();
        self.moves.clear();
        self.player = player;
        info!(?player, "new game");
    }

    /// Plays the human's move and records it. Only allowed while the
    /// player's colour is to move.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<ResolvedMove> {
        if self.position.is_finished() {
            return Err(Error::GameFinished);
        }
        if self.position.turn() != self.player {
            return Err(Error::NotYourMove);
        }
        let requested = ResolvedMove::new(from, to).with_promotion(promotion);
        self.apply(requested)
    }

    fn apply(&mut self, mv: ResolvedMove) -> Result<ResolvedMove> {
        let mover = self.position.piece_at(mv.from).map(|p| p.role);
        let after = play_resolved(&self.oracle, &self.position, &mv)?;

        // record what actually landed, so auto-queening shows up as "q"
        let promoted = after
            .piece_at(mv.to)
            .map(|p| p.role)
            .filter(|role| Some(*role) != mover);
        let played = ResolvedMove::new(mv.from, mv.to).with_promotion(promoted);

        self.moves.push(played.to_string());
        self.position = after;
        Ok(played)
    }

    pub fn search_request(&self) -> SearchRequest {
        SearchRequest {
            moves: self.moves.clone(),
            depth: self.depth_override.unwrap_or_else(|| self.level.depth()),
            skill: self.level.skill(),
        }
    }

    /// Lets the computer move for the side to move.
    ///
    /// The engine is asked first; when it is missing, busy, failing or
    /// answers with a move the oracle rejects, the greedy selector plays
    /// instead. `None` when the game is over.
    pub async fn engine_move(&mut self) -> Result<Option<EngineReply>> {
        if self.position.is_finished() {
            return Ok(None);
        }

        self.port.recover().await;
        let request = self.search_request();
        match self.port.request(request).await {
            Ok(mv) => match self.apply(mv) {
                Ok(played) => {
                    debug!(mv = %played, "engine move");
                    return Ok(Some(EngineReply {
                        mv: played,
                        source: MoveSource::Engine,
                    }));
                }
                Err(e) => warn!(mv = %mv, error = %e, "engine move rejected, using fallback"),
            },
            Err(e) => debug!(error = %e, "engine unavailable, using fallback"),
        }

        let fallback = match best_move(&self.oracle, &self.position) {
            Some(mv) => mv,
            None => return Ok(None),
        };
        let played = self.apply(fallback)?;
        Ok(Some(EngineReply {
            mv: played,
            source: MoveSource::Fallback,
        }))
    }

    pub fn hint(&self) -> Option<Hint> {
        analysis_hint(&self.oracle, &self.position)
    }

    /// Greedy plays both sides until the game ends or `max_plies` moves
    pub fn self_play(&mut self, max_plies: usize) -> Result<Vec<String>> {
        let mut played = Vec::new();
        for _ in 0..max_plies {
            if self.position.is_finished() {
                break;
            }
            let mv = match best_move(&self.oracle, &self.position) {
                Some(mv) => mv,
                None => break,
            };
            played.push(self.apply(mv)?.to_string());
        }
        Ok(played)
    }

    /// Fresh game advanced by 8 to 15 greedy plies, handed to the side to move.
    pub fn random_tactic<R: Rng>(&mut self, rng: &mut R) -> Result<Color> {
        self.new_game(Color::White);
        let plies = rng.random_range(8..=15);
        self.self_play(plies)?;
        self.player = self.position.turn();
        info!(plies = self.moves.len(), player = ?self.player, "tactic position ready");
        Ok(self.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ScriptedEngine;
    use crate::oracle::StandardOracle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(replies: &[&str]) -> GameSession<StandardOracle, ScriptedEngine> {
        let port = EnginePort::new(ScriptedEngine::with_replies(replies));
        GameSession::new(StandardOracle, port, EngineLevel::default()).unwrap()
    }

    fn offline() -> GameSession<StandardOracle, ScriptedEngine> {
        GameSession::new(StandardOracle, EnginePort::unavailable(), EngineLevel::new(3)).unwrap()
    }

    const FOOLS_MATE: [(Square, Square); 4] = [
        (Square::F2, Square::F3),
        (Square::E7, Square::E5),
        (Square::G2, Square::G4),
        (Square::D8, Square::H4),
    ];

    /// Plays a line from both sides of the board
    fn play_line(
        game: &mut GameSession<StandardOracle, ScriptedEngine>,
        line: &[(Square, Square)],
    ) {
        for (from, to) in line {
            game.player = game.position().turn();
            game.play(*from, *to, None).unwrap();
        }
    }

    #[test]
    fn test_play_records_coordinates() {
        let mut game = offline();
        play_line(&mut game, &[(Square::E2, Square::E4), (Square::E7, Square::E5)]);
        assert_eq!(game.moves(), &["e2e4", "e7e5"]);
        assert_eq!(game.position().turn(), Color::White);
    }

    #[test]
    fn test_player_cannot_move_for_the_computer() {
        let mut game = offline();
        game.new_game(Color::Black);
        let err = game.play(Square::E2, Square::E4, None).unwrap_err();
        assert!(matches!(err, Error::NotYourMove));
        assert!(game.moves().is_empty());

        let mut game = offline();
        game.play(Square::E2, Square::E4, None).unwrap();
        assert!(matches!(game.play(Square::E7, Square::E5, None), Err(Error::NotYourMove)));
        assert_eq!(game.moves(), &["e2e4"]);
    }

    #[tokio::test]
    async fn test_player_moves_after_engine_opens() {
        let mut game = offline();
        game.new_game(Color::Black);
        game.engine_move().await.unwrap().unwrap();
        let played = game.play(Square::E7, Square::E5, None).unwrap();
        assert_eq!(played, ResolvedMove::new(Square::E7, Square::E5));
        assert_eq!(game.moves(), &["b1a3", "e7e5"]);
    }

    #[test]
    fn test_illegal_move_leaves_game_untouched() {
        let mut game = offline();
        let err = game.play(Square::E2, Square::E5, None).unwrap_err();
        assert!(matches!(err, Error::Oracle(_)));
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_finished_game_rejects_moves() {
        let mut game = offline();
        play_line(&mut game, &FOOLS_MATE);
        assert!(game.position().status().checkmate);
        assert!(matches!(game.play(Square::A2, Square::A3, None), Err(Error::GameFinished)));
    }

    #[test]
    fn test_search_request_follows_level() {
        let mut game = offline();
        game.play(Square::D2, Square::D4, None).unwrap();
        let request = game.search_request();
        assert_eq!(request.moves, vec!["d2d4".to_string()]);
        assert_eq!((request.depth, request.skill), (10, 5));

        game.set_depth_override(Some(3));
        assert_eq!(game.search_request().depth, 3);
    }

    #[tokio::test]
    async fn test_engine_reply_is_played() {
        let mut game = session(&["e7e5"]);
        game.play(Square::E2, Square::E4, None).unwrap();

        let reply = game.engine_move().await.unwrap().unwrap();
        assert_eq!(reply.source, MoveSource::Engine);
        assert_eq!(reply.mv, ResolvedMove::new(Square::E7, Square::E5));
        assert_eq!(game.moves(), &["e2e4", "e7e5"]);
    }

    #[tokio::test]
    async fn test_rejected_engine_reply_falls_back() {
        // a white move offered while black is to move
        let mut game = session(&["d2d4"]);
        game.play(Square::E2, Square::E4, None).unwrap();

        let reply = game.engine_move().await.unwrap().unwrap();
        assert_eq!(reply.source, MoveSource::Fallback);
        // a7 is black's first origin, a5 its first destination
        assert_eq!(reply.mv, ResolvedMove::new(Square::A7, Square::A5));
        assert_eq!(game.position().turn(), Color::White);
    }

    #[tokio::test]
    async fn test_missing_engine_falls_back() {
        let mut game = offline();
        game.new_game(Color::Black);
        let reply = game.engine_move().await.unwrap().unwrap();
        assert_eq!(reply.source, MoveSource::Fallback);
        assert_eq!(reply.mv, ResolvedMove::new(Square::B1, Square::A3));
    }

    #[tokio::test]
    async fn test_no_engine_move_after_game_end() {
        let mut game = session(&["e2e4"]);
        play_line(&mut game, &FOOLS_MATE);
        assert!(game.engine_move().await.unwrap().is_none());
    }

    #[test]
    fn test_hint_prefers_biggest_capture() {
        let mut game = offline();
        play_line(&mut game, &[(Square::E2, Square::E4), (Square::D7, Square::D5)]);
        let hint = game.hint().unwrap();
        assert_eq!(hint.mv, ResolvedMove::new(Square::E4, Square::D5));
        assert_eq!(hint.gain, 1);
    }

    #[test]
    fn test_self_play_is_bounded() {
        let mut game = offline();
        let played = game.self_play(6).unwrap();
        assert_eq!(played.len(), 6);
        assert_eq!(game.moves(), played.as_slice());
    }

    #[test]
    fn test_random_tactic_hands_over_side_to_move() {
        let mut game = offline();
        let mut rng = StdRng::seed_from_u64(7);
        let player = game.random_tactic(&mut rng).unwrap();
        assert!((8..=15).contains(&game.moves().len()));
        assert_eq!(player, game.position().turn());
        assert_eq!(game.player(), player);
    }
}
