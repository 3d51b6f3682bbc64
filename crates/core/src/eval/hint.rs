use serde::Serialize;
use shakmaty::Color;

use super::material::piece_value;
use crate::moves::ResolvedMove;
use crate::oracle::Oracle;
use crate::position::{serialize_color, Position};

/// Suggested move for the side to move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub mv: ResolvedMove,
    #[serde(serialize_with = "serialize_color")]
    pub side: Color,
    /// Value of the piece captured, 0 for a quiet move
    pub gain: i32,
}

impl Hint {
    pub fn is_capture(&self) -> bool {
        self.gain > 0
    }
}

/// The legal move capturing the most valuable piece; first seen wins ties
pub fn analysis_hint<O: Oracle + ?Sized>(oracle: &O, position: &Position) -> Option<Hint> {
    let side = position.turn();
    let mut best: Option<Hint> = None;

    for (square, piece) in position.pieces() {
        if piece.color != side {
            continue;
        }
        let legal = match oracle.legal_moves(position, Some(*square)) {
            Ok(legal) => legal,
            Err(_) => continue,
        };
        for target in legal.destinations(*square) {
            let gain = position
                .piece_at(*target)
                .map(|captured| piece_value(captured.role))
                .unwrap_or(0);
            if best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(Hint {
                    mv: ResolvedMove::new(*square, *target),
                    side,
                    gain,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::StandardOracle;
    use shakmaty::Square;

    #[test]
    fn test_prefers_most_valuable_capture() {
        // Knight on c3 can take a rook on b5 or a pawn on e4
        let pos = StandardOracle
            .new_position(Some("4k3/8/8/1r6/4p3/2N5/8/4K3 w - - 0 1"))
            .unwrap();
        let hint = analysis_hint(&StandardOracle, &pos).unwrap();
        assert_eq!(hint.mv, ResolvedMove::new(Square::C3, Square::B5));
        assert_eq!(hint.gain, 5);
        assert!(hint.is_capture());
        assert_eq!(hint.side, Color::White);
    }

    #[test]
    fn test_quiet_position_still_suggests_a_move() {
        let pos = StandardOracle.new_position(None).unwrap();
        let hint = analysis_hint(&StandardOracle, &pos).unwrap();
        assert!(!hint.is_capture());
        assert_eq!(hint.mv.from, Square::B1);
    }

    #[test]
    fn test_no_hint_without_moves() {
        let stalemate = StandardOracle
            .new_position(Some("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"))
            .unwrap();
        assert!(stalemate.status().stalemate);
        assert!(analysis_hint(&StandardOracle, &stalemate).is_none());
    }
}
