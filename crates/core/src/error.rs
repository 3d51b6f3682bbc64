//! Error types for chess-trainer-core

use thiserror::Error;

use crate::oracle::OracleError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Game is already finished")]
    GameFinished,

    #[error("It is not your move")]
    NotYourMove,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &str) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    #[test]
    fn test_io_failure_converts() {
        let err = read("/nonexistent/game.pgn").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_not_your_move_message() {
        assert_eq!(Error::NotYourMove.to_string(), "It is not your move");
    }
}
