//! Legal-move oracle
//!
//! Move legality is delegated entirely to an [`Oracle`]; nothing else in the
//! crate knows the rules of chess.

mod standard;

pub use standard::StandardOracle;

use shakmaty::{Color, Piece, Rank, Role, Square};
use thiserror::Error;
use tracing::debug;

use crate::moves::ResolvedMove;
use crate::position::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("illegal move {from}-{to}")]
    IllegalMove { from: Square, to: Square },

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Source of truth for move legality and move application.
pub trait Oracle {
    /// Imports a snapshot, or the standard start position for `None`
    fn new_position(&self, snapshot: Option<&str>) -> Result<Position, OracleError>;

    /// Legal destinations per origin, optionally restricted to one origin square
    fn legal_moves(
        &self,
        position: &Position,
        origin: Option<Square>,
    ) -> Result<LegalMoves, OracleError>;

    /// Plays `origin -> destination`, returning the resulting position
    fn apply_move(
        &self,
        position: &Position,
        origin: Square,
        destination: Square,
    ) -> Result<Position, OracleError>;

    /// Overwrites one square (used to finish a promotion)
    fn set_piece(
        &self,
        position: &Position,
        square: Square,
        piece: Piece,
    ) -> Result<Position, OracleError>;

    /// Serializable snapshot accepted by [`Oracle::new_position`]
    fn export(&self, position: &Position) -> String {
        position.fen().to_string()
    }
}

/// Ordered mapping origin -> destinations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoves {
    entries: Vec<(Square, Vec<Square>)>,
}

impl LegalMoves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair, keeping first-seen order and dropping duplicates
    pub fn push(&mut self, origin: Square, destination: Square) {
        match self.entries.iter_mut().find(|(from, _)| *from == origin) {
            Some((_, targets)) => {
                if !targets.contains(&destination) {
                    targets.push(destination);
                }
            }
            None => self.entries.push((origin, vec![destination])),
        }
    }

    pub fn destinations(&self, origin: Square) -> &[Square] {
        self.entries
            .iter()
            .find(|(from, _)| *from == origin)
            .map(|(_, targets)| targets.as_slice())
            .unwrap_or(&[])
    }

    pub fn origins(&self) -> impl Iterator<Item = Square> + '_ {
        self.entries.iter().map(|(from, _)| *from)
    }

    /// Every (origin, destination) pair in enumeration order
    pub fn pairs(&self) -> impl Iterator<Item = (Square, Square)> + '_ {
        self.entries
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to)))
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, targets)| targets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Applies a resolved move, finishing a pawn promotion with `set_piece`.
///
/// A promotion piece is only honoured for a pawn reaching its last rank;
/// anywhere else it is ignored.
pub fn play_resolved<O: Oracle + ?Sized>(
    oracle: &O,
    position: &Position,
    mv: &ResolvedMove,
) -> Result<Position, OracleError> {
    let mover = position.piece_at(mv.from);
    let after = oracle.apply_move(position, mv.from, mv.to)?;

    let role = match mv.promotion {
        Some(role) => role,
        None => return Ok(after),
    };

    let promotes = match mover {
        Some(piece) => piece.role == Role::Pawn && mv.to.rank() == last_rank(piece.color),
        None => false,
    };
    if !promotes {
        debug!(mv = %mv, "ignoring promotion on a non-promoting move");
        return Ok(after);
    }

    let color = position.turn();
    oracle.set_piece(&after, mv.to, Piece { color, role })
}

fn last_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::Eighth,
        Color::Black => Rank::First,
    }
}
