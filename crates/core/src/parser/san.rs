//! Best-effort resolution of SAN tokens against an oracle
//!
//! Resolution is deliberately lenient: when piece type and disambiguation
//! hints select nothing, any legal move onto the destination square is
//! accepted, and the first candidate in oracle order wins. Callers must
//! treat the result as a best guess rather than ground truth.

use shakmaty::{Color, File, Rank, Role, Square};
use thiserror::Error;
use tracing::debug;

use crate::moves::ResolvedMove;
use crate::oracle::Oracle;
use crate::position::{role_from_letter, Position};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    #[error("\"{0}\" does not resolve to a legal move")]
    Unresolvable(String),
}

/// Structure extracted from a token before consulting the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SanParts {
    pub role: Role,
    pub destination: Square,
    pub file_hint: Option<File>,
    pub rank_hint: Option<Rank>,
    pub capture: bool,
    pub promotion: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CastleSide {
    King,
    Queen,
}

/// Strips trailing check, mate and annotation glyphs ("Nf3+!?" -> "Nf3")
pub fn clean_token(token: &str) -> &str {
    token
        .trim()
        .trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'))
}

/// Resolves one SAN token to a concrete move in `position`.
pub fn resolve<O: Oracle + ?Sized>(
    token: &str,
    position: &Position,
    oracle: &O,
) -> Result<ResolvedMove, SanError> {
    let unresolvable = || SanError::Unresolvable(token.to_string());
    let san = clean_token(token);
    if san.is_empty() {
        return Err(unresolvable());
    }

    if let Some(side) = castle_side(san) {
        return Ok(castle_move(position.turn(), side));
    }

    let parts = parse_parts(san).ok_or_else(unresolvable)?;
    let legal = oracle
        .legal_moves(position, None)
        .map_err(|_| unresolvable())?;
    let side = position.turn();

    let mut candidates: Vec<(Square, Square)> = Vec::new();
    for (from, to) in legal.pairs() {
        if to != parts.destination {
            continue;
        }
        let piece = match position.piece_at(from) {
            Some(piece) => piece,
            None => continue,
        };
        if piece.color != side || piece.role != parts.role {
            continue;
        }
        if parts.file_hint.is_some_and(|f| from.file() != f) {
            continue;
        }
        if parts.rank_hint.is_some_and(|r| from.rank() != r) {
            continue;
        }
        // En passant lands on an empty square, so pawns skip this check.
        if parts.capture && parts.role != Role::Pawn && position.piece_at(to).is_none() {
            continue;
        }
        candidates.push((from, to));
    }

    if candidates.is_empty() {
        candidates = legal
            .pairs()
            .filter(|(_, to)| *to == parts.destination)
            .collect();
        if !candidates.is_empty() {
            debug!(token, "resolved through destination-only fallback");
        }
    }

    let (from, to) = candidates.first().copied().ok_or_else(unresolvable)?;
    Ok(ResolvedMove::new(from, to).with_promotion(parts.promotion))
}

fn castle_side(san: &str) -> Option<CastleSide> {
    match san.to_ascii_uppercase().as_str() {
        "O-O" | "0-0" => Some(CastleSide::King),
        "O-O-O" | "0-0-0" => Some(CastleSide::Queen),
        _ => None,
    }
}

/// Fixed king step for castling, independent of legality
fn castle_move(turn: Color, side: CastleSide) -> ResolvedMove {
    let rank = match turn {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    };
    let file = match side {
        CastleSide::King => File::G,
        CastleSide::Queen => File::C,
    };
    ResolvedMove::new(Square::from_coords(File::E, rank), Square::from_coords(file, rank))
}

pub(crate) fn parse_parts(san: &str) -> Option<SanParts> {
    let chars: Vec<char> = san.chars().collect();

    // "=Q" suffix
    let (body, promotion) = match chars.as_slice() {
        [rest @ .., '=', letter] => match role_from_letter(*letter) {
            Some(role @ (Role::Queen | Role::Rook | Role::Bishop | Role::Knight)) => {
                (rest, Some(role))
            }
            _ => (chars.as_slice(), None),
        },
        _ => (chars.as_slice(), None),
    };

    // The last file+rank pair is the destination
    let dest_index = (0..body.len().saturating_sub(1))
        .rev()
        .find(|&i| {
            file_of(body[i].to_ascii_lowercase()).is_some() && rank_of(body[i + 1]).is_some()
        })?;
    let destination = Square::from_coords(
        file_of(body[dest_index].to_ascii_lowercase())?,
        rank_of(body[dest_index + 1])?,
    );

    let (role, start) = match body.first() {
        Some(&c) if matches!(c, 'K' | 'Q' | 'R' | 'B' | 'N') => (role_from_letter(c)?, 1),
        _ => (Role::Pawn, 0),
    };

    let mut file_hint = None;
    let mut rank_hint = None;
    if dest_index > start {
        for &c in &body[start..dest_index] {
            if let Some(file) = file_of(c) {
                file_hint = Some(file);
            } else if let Some(rank) = rank_of(c) {
                rank_hint = Some(rank);
            }
        }
    }

    Some(SanParts {
        role,
        destination,
        file_hint,
        rank_hint,
        capture: body.contains(&'x'),
        promotion,
    })
}

fn file_of(c: char) -> Option<File> {
    match c {
        'a'..='h' => Some(File::new(u32::from(c) - u32::from('a'))),
        _ => None,
    }
}

fn rank_of(c: char) -> Option<Rank> {
    match c {
        '1'..='8' => Some(Rank::new(u32::from(c) - u32::from('1'))),
        _ => None,
    }
}
