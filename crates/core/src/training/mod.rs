//! Training modes built on the core: games against the computer and tactic drills

pub mod game;

pub use game::{EngineReply, GameSession, MoveSource};
