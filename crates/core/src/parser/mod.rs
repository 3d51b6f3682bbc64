//! Parsers for chess notation
//!
//! - PGN movetext tokenizing and header extraction
//! - SAN move resolution

pub mod pgn;
pub mod san;

pub use pgn::{parse_headers, tokenize, PgnHeaders};
pub use san::{resolve, SanError};
