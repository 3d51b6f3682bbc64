//! Chess Trainer Core Library

use shakmaty::Color;

pub mod analysis;
pub mod engine;
pub mod error;
pub mod eval;
pub mod moves;
pub mod oracle;
pub mod parser;
pub mod position;
pub mod training;

pub use analysis::{AnalysisPipeline, AnalysisReport, ReplaySession, Verdict};
pub use engine::{EngineLevel, EnginePort, SearchEngine, UciEngine};
pub use error::{Error, Result};
pub use moves::ResolvedMove;
pub use oracle::{Oracle, OracleError, StandardOracle};
pub use position::{GameStatus, Position};
pub use training::{EngineReply, GameSession, MoveSource};

/// Basic position information
#[derive(Debug, Clone, serde::Serialize)]
pub struct PositionInfo {
    pub piece_count: u32,
    pub legal_move_count: u32,
    #[serde(serialize_with = "position::serialize_color")]
    pub side_to_move: Color,
    pub status: GameStatus,
}

/// Summarizes a position
pub fn analyze_position<O: Oracle + ?Sized>(
    oracle: &O,
    position: &Position,
) -> Result<PositionInfo> {
    let legal_moves = oracle.legal_moves(position, None)?;

    Ok(PositionInfo {
        piece_count: position.pieces().len() as u32,
        legal_move_count: legal_moves.len() as u32,
        side_to_move: position.turn(),
        status: position.status(),
    })
}

/// Creates the standard starting position
pub fn starting_position() -> Result<Position> {
    Ok(StandardOracle.new_position(None)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_info() {
        let position = starting_position().unwrap();
        let info = analyze_position(&StandardOracle, &position).unwrap();
        assert_eq!(info.piece_count, 32);
        assert_eq!(info.legal_move_count, 20);
        assert_eq!(info.side_to_move, Color::White);
        assert!(!info.status.is_finished());
    }
}
