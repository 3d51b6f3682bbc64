//! Shallow, explainable move evaluation
//!
//! A material count and a one-ply greedy selector built on it. Used as the
//! analysis reference move and as the fallback opponent.

mod greedy;
mod hint;
mod material;

pub use greedy::{best_candidate, best_move, Candidate};
pub use hint::{analysis_hint, Hint};
pub use material::{material_balance, piece_value};
