//! Concrete board moves

use std::fmt;

use serde::Serialize;
use shakmaty::{Role, Square};

use crate::position::{role_from_letter, role_letter, serialize_promotion, serialize_square};

/// A move resolved to concrete squares.
///
/// Produced by the SAN resolver or the greedy selector and consumed by
/// [`Oracle::apply_move`](crate::oracle::Oracle::apply_move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedMove {
    #[serde(serialize_with = "serialize_square")]
    pub from: Square,
    #[serde(serialize_with = "serialize_square")]
    pub to: Square,
    #[serde(serialize_with = "serialize_promotion")]
    pub promotion: Option<Role>,
}

impl ResolvedMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, promotion: Option<Role>) -> Self {
        self.promotion = promotion;
        self
    }

    /// True when both moves share origin and destination (promotion ignored)
    pub fn same_squares(&self, other: &ResolvedMove) -> bool {
        self.from == other.from && self.to == other.to
    }

    /// "e2-e4" form used in explanations
    pub fn hyphenated(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }

    /// Parses coordinate notation as returned by UCI engines ("e2e4", "e7e8q").
    pub fn from_coordinate(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.len() != 4 && text.len() != 5 {
            return None;
        }
        let from: Square = text.get(0..2)?.parse().ok()?;
        let to: Square = text.get(2..4)?.parse().ok()?;
        let promotion = match text.chars().nth(4) {
            Some(c) => Some(role_from_letter(c).filter(|r| *r != Role::King && *r != Role::Pawn)?),
            None => None,
        };
        Some(Self { from, to, promotion })
    }
}

/// Coordinate notation ("e2e4", "e7e8q")
impl fmt::Display for ResolvedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role_letter(role).to_ascii_lowercase())?;
        }
        Ok(())
    }
}
