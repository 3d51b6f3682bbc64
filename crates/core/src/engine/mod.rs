//! External search engine integration
//!
//! Talks to UCI-compatible engines like Stockfish behind a single-request
//! port. The engine is optional: every caller has a greedy fallback.

mod level;
mod port;
mod uci;

pub use level::EngineLevel;
pub use port::{EnginePort, PortState};
pub use uci::UciEngine;

use std::future::Future;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to start engine: {0}")]
    Spawn(String),

    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine protocol error: {0}")]
    Protocol(String),

    #[error("engine is not ready")]
    NotReady,

    #[error("engine is busy with another request")]
    Busy,

    #[error("no engine configured")]
    Unavailable,
}

/// One search: the game so far, how deep to look and how well to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Coordinate-notation moves from the start position
    pub moves: Vec<String>,
    pub depth: u8,
    pub skill: u8,
}

pub trait SearchEngine {
    /// Best move in coordinate notation ("e2e4", "e7e8q")
    fn best_move(
        &mut self,
        request: SearchRequest,
    ) -> impl Future<Output = Result<String, EngineError>> + Send;

    /// Brings the engine back to an idle state after an abandoned search
    fn reset(&mut self) -> impl Future<Output = Result<(), EngineError>> + Send {
        async { Ok(()) }
    }
}
