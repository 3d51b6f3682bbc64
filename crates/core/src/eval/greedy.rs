use tracing::debug;

use super::material::material_balance;
use crate::moves::ResolvedMove;
use crate::oracle::Oracle;
use crate::position::Position;

/// A scored candidate together with the position it leads to
#[derive(Debug, Clone)]
pub struct Candidate {
    pub mv: ResolvedMove,
    pub score: i32,
    pub position: Position,
}

/// One-ply greedy search over every legal move.
///
/// Each move is played on its own copy and scored from the mover's side;
/// the first maximum in oracle enumeration order wins. Moves the oracle
/// refuses to play are skipped. Opponent replies are not considered.
pub fn best_candidate<O: Oracle + ?Sized>(oracle: &O, position: &Position) -> Option<Candidate> {
    let legal = match oracle.legal_moves(position, None) {
        Ok(legal) => legal,
        Err(e) => {
            debug!(error = %e, "no legal moves available for greedy search");
            return None;
        }
    };

    let side = position.turn();
    let mut best: Option<Candidate> = None;

    for (from, to) in legal.pairs() {
        let next = match oracle.apply_move(position, from, to) {
            Ok(next) => next,
            Err(e) => {
                debug!(error = %e, "skipping candidate");
                continue;
            }
        };

        let score = material_balance(&next, side);
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(Candidate {
                mv: ResolvedMove::new(from, to),
                score,
                position: next,
            });
        }
    }

    best
}

/// The move chosen by [`best_candidate`]
pub fn best_move<O: Oracle + ?Sized>(oracle: &O, position: &Position) -> Option<ResolvedMove> {
    best_candidate(oracle, position).map(|c| c.mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{LegalMoves, OracleError, StandardOracle};
    use shakmaty::{Piece, Square};

    /// Standard rules, except that one listed move cannot be played and
    /// enumeration can be switched off
    struct Refusing {
        refused: Option<(Square, Square)>,
        no_moves: bool,
    }

    impl Oracle for Refusing {
        fn new_position(&self, snapshot: Option<&str>) -> Result<Position, OracleError> {
            StandardOracle.new_position(snapshot)
        }

        fn legal_moves(
            &self,
            position: &Position,
            origin: Option<Square>,
        ) -> Result<LegalMoves, OracleError> {
            if self.no_moves {
                return Err(OracleError::InvalidPosition("enumeration failed".to_string()));
            }
            StandardOracle.legal_moves(position, origin)
        }

        fn apply_move(
            &self,
            position: &Position,
            origin: Square,
            destination: Square,
        ) -> Result<Position, OracleError> {
            if self.refused == Some((origin, destination)) {
                return Err(OracleError::IllegalMove {
                    from: origin,
                    to: destination,
                });
            }
            StandardOracle.apply_move(position, origin, destination)
        }

        fn set_piece(
            &self,
            position: &Position,
            square: Square,
            piece: Piece,
        ) -> Result<Position, OracleError> {
            StandardOracle.set_piece(position, square, piece)
        }
    }

    #[test]
    fn test_takes_hanging_queen() {
        let pos = StandardOracle
            .new_position(Some("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1"))
            .unwrap();
        let mv = best_move(&StandardOracle, &pos).unwrap();
        assert_eq!(mv, ResolvedMove::new(Square::D2, Square::D5));
    }

    #[test]
    fn test_ties_go_to_first_enumerated_move() {
        let pos = StandardOracle.new_position(None).unwrap();
        let candidate = best_candidate(&StandardOracle, &pos).unwrap();
        assert_eq!(candidate.score, 0);
        // b1 is the first origin with legal moves, a3 before c3
        assert_eq!(candidate.mv, ResolvedMove::new(Square::B1, Square::A3));
    }

    #[test]
    fn test_deterministic() {
        let pos = StandardOracle
            .new_position(Some("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"))
            .unwrap();
        let first = best_move(&StandardOracle, &pos);
        let second = best_move(&StandardOracle, &pos);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_terminal_position_has_no_move() {
        let mate = StandardOracle
            .new_position(Some("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"))
            .unwrap();
        assert!(best_move(&StandardOracle, &mate).is_none());
    }

    #[test]
    fn test_candidate_carries_resulting_position() {
        let pos = StandardOracle
            .new_position(Some("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1"))
            .unwrap();
        let candidate = best_candidate(&StandardOracle, &pos).unwrap();
        assert_eq!(candidate.score, 5);
        assert!(candidate.position.piece_at(Square::D5).is_some());
        // the input position is untouched
        assert!(pos.piece_at(Square::D2).is_some());
    }

    #[test]
    fn test_refused_candidate_is_skipped() {
        let oracle = Refusing {
            refused: Some((Square::B1, Square::A3)),
            no_moves: false,
        };
        let pos = oracle.new_position(None).unwrap();
        let candidate = best_candidate(&oracle, &pos).unwrap();
        assert_eq!(candidate.mv, ResolvedMove::new(Square::B1, Square::C3));
        assert_eq!(candidate.score, 0);
    }

    #[test]
    fn test_refused_capture_falls_to_next_best() {
        let oracle = Refusing {
            refused: Some((Square::D2, Square::D5)),
            no_moves: false,
        };
        let pos = oracle
            .new_position(Some("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1"))
            .unwrap();
        let candidate = best_candidate(&oracle, &pos).unwrap();
        assert_ne!(candidate.mv, ResolvedMove::new(Square::D2, Square::D5));
        assert_eq!(candidate.score, -4);
    }

    #[test]
    fn test_failed_enumeration_gives_no_move() {
        let oracle = Refusing {
            refused: None,
            no_moves: true,
        };
        let pos = StandardOracle.new_position(None).unwrap();
        assert!(best_move(&oracle, &pos).is_none());
    }
}
