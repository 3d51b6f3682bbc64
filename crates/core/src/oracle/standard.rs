//! Standard chess oracle backed by shakmaty

use std::collections::BTreeMap;

use shakmaty::fen::Fen;
use shakmaty::{
    CastlingMode, Chess, EnPassantMode, File, FromSetup, Move, Piece, Position as _, Role, Square,
};

use super::{LegalMoves, Oracle, OracleError};
use crate::position::{GameStatus, Position};

/// Oracle for standard chess.
///
/// Origins are enumerated a1, b1, ..., h8 and destinations in the same
/// order, so "first candidate" is deterministic for every caller. Castling
/// is reported as the king's two-square step.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardOracle;

impl StandardOracle {
    fn import(position: &Position) -> Result<Chess, OracleError> {
        parse_fen(position.fen())
    }

    fn legal_pairs(chess: &Chess) -> Vec<(Square, Square, Move)> {
        chess
            .legal_moves()
            .into_iter()
            .filter_map(|m| {
                let from = m.from()?;
                Some((from, destination(&m), m))
            })
            .collect()
    }
}

impl Oracle for StandardOracle {
    fn new_position(&self, snapshot: Option<&str>) -> Result<Position, OracleError> {
        let chess = match snapshot {
            Some(fen) => parse_fen(fen)?,
            None => Chess::default(),
        };
        Ok(snapshot_of(&chess, &[]))
    }

    fn legal_moves(
        &self,
        position: &Position,
        origin: Option<Square>,
    ) -> Result<LegalMoves, OracleError> {
        let chess = Self::import(position)?;

        let mut pairs: Vec<(Square, Square)> = Self::legal_pairs(&chess)
            .into_iter()
            .filter(|(from, _, _)| origin.map_or(true, |o| o == *from))
            .map(|(from, to, _)| (from, to))
            .collect();
        pairs.sort();

        let mut legal = LegalMoves::new();
        for (from, to) in pairs {
            legal.push(from, to);
        }
        Ok(legal)
    }

    fn apply_move(
        &self,
        position: &Position,
        origin: Square,
        destination: Square,
    ) -> Result<Position, OracleError> {
        let chess = Self::import(position)?;
        let illegal = OracleError::IllegalMove {
            from: origin,
            to: destination,
        };

        let candidates: Vec<Move> = Self::legal_pairs(&chess)
            .into_iter()
            .filter(|(from, to, _)| *from == origin && *to == destination)
            .map(|(_, _, m)| m)
            .collect();

        // Promotions default to a queen; callers overwrite via set_piece.
        let mv = candidates
            .iter()
            .find(|m| m.promotion() == Some(Role::Queen))
            .or_else(|| candidates.first())
            .cloned()
            .ok_or_else(|| illegal.clone())?;

        let next = chess.play(mv).map_err(|_| illegal)?;
        Ok(snapshot_of(&next, position.history()))
    }

    fn set_piece(
        &self,
        position: &Position,
        square: Square,
        piece: Piece,
    ) -> Result<Position, OracleError> {
        let chess = Self::import(position)?;
        let mut setup = chess.to_setup(EnPassantMode::Legal);
        setup.board.set_piece_at(square, piece);

        let edited = Chess::from_setup(setup, CastlingMode::Standard)
            .map_err(|e| OracleError::InvalidPosition(e.to_string()))?;

        // The edit replaces the current position, not a new ply.
        let history = position.history();
        let prior = &history[..history.len().saturating_sub(1)];
        Ok(snapshot_of(&edited, prior))
    }
}

fn parse_fen(text: &str) -> Result<Chess, OracleError> {
    let fen: Fen = text
        .parse()
        .map_err(|e: shakmaty::fen::ParseFenError| OracleError::InvalidSnapshot(e.to_string()))?;
    fen.into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| OracleError::InvalidSnapshot(e.to_string()))
}

/// Destination as a user would click it: castling lands on the g- or c-file.
fn destination(m: &Move) -> Square {
    match *m {
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() { File::G } else { File::C };
            Square::from_coords(file, king.rank())
        }
        _ => m.to(),
    }
}

/// Board, side to move, castling rights and en-passant square
fn repetition_key(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

fn snapshot_of(chess: &Chess, prior_history: &[String]) -> Position {
    let fen = Fen::from_position(chess, EnPassantMode::Legal).to_string();
    let key = repetition_key(&fen);

    let mut history = if chess.halfmoves() == 0 {
        Vec::new()
    } else {
        prior_history.to_vec()
    };
    history.push(key.clone());
    let repetitions = history.iter().filter(|k| **k == key).count();

    let board = chess.board();
    let pieces: BTreeMap<Square, Piece> = board
        .occupied()
        .into_iter()
        .filter_map(|sq| board.piece_at(sq).map(|piece| (sq, piece)))
        .collect();

    let status = GameStatus {
        checkmate: chess.is_checkmate(),
        stalemate: chess.is_stalemate(),
        threefold: repetitions >= 3,
        insufficient_material: chess.is_insufficient_material(),
    };

    Position::from_parts(fen, pieces, chess.turn(), status, history)
}
