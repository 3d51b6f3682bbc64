//! Typed position snapshots exported by the oracle

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use shakmaty::{Color, Piece, Role, Square};

/// Terminal-state flags of a position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GameStatus {
    pub checkmate: bool,
    pub stalemate: bool,
    pub threefold: bool,
    pub insufficient_material: bool,
}

impl GameStatus {
    pub fn is_finished(&self) -> bool {
        self.checkmate || self.stalemate || self.threefold || self.insufficient_material
    }
}

/// Immutable snapshot of a position.
///
/// Produced by an [`Oracle`](crate::oracle::Oracle); every move application
/// yields a fresh value. The FEN string is the serializable form the oracle
/// can re-import, the piece map is the typed view everything else reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    fen: String,
    pieces: BTreeMap<Square, Piece>,
    turn: Color,
    status: GameStatus,
    /// Repetition keys since the last irreversible move, current position last
    history: Vec<String>,
}

impl Position {
    pub(crate) fn from_parts(
        fen: String,
        pieces: BTreeMap<Square, Piece>,
        turn: Color,
        status: GameStatus,
        history: Vec<String>,
    ) -> Self {
        Self {
            fen,
            pieces,
            turn,
            status,
            history,
        }
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn pieces(&self) -> &BTreeMap<Square, Piece> {
        &self.pieces
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pieces.get(&square).copied()
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub(crate) fn history(&self) -> &[String] {
        &self.history
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let pieces: BTreeMap<String, String> = self
            .pieces
            .iter()
            .map(|(sq, piece)| (sq.to_string(), piece_code(*piece).to_string()))
            .collect();

        let mut state = serializer.serialize_struct("Position", 4)?;
        state.serialize_field("fen", &self.fen)?;
        state.serialize_field("pieces", &pieces)?;
        state.serialize_field("turn", color_key(self.turn))?;
        state.serialize_field("status", &self.status)?;
        state.end()
    }
}

/// Piece letter with the color encoded in its case ("P" white pawn, "q" black queen)
pub fn piece_code(piece: Piece) -> char {
    let letter = role_letter(piece.role);
    match piece.color {
        Color::White => letter,
        Color::Black => letter.to_ascii_lowercase(),
    }
}

/// Upper-case SAN letter of a role ('P' for pawns)
pub fn role_letter(role: Role) -> char {
    match role {
        Role::Pawn => 'P',
        Role::Knight => 'N',
        Role::Bishop => 'B',
        Role::Rook => 'R',
        Role::Queen => 'Q',
        Role::King => 'K',
    }
}

/// Inverse of [`role_letter`], case-insensitive
pub fn role_from_letter(letter: char) -> Option<Role> {
    match letter.to_ascii_uppercase() {
        'P' => Some(Role::Pawn),
        'N' => Some(Role::Knight),
        'B' => Some(Role::Bishop),
        'R' => Some(Role::Rook),
        'Q' => Some(Role::Queen),
        'K' => Some(Role::King),
        _ => None,
    }
}

/// "White" / "Black"
pub fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

fn color_key(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

pub(crate) fn serialize_color<S: Serializer>(
    color: &Color,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(color_key(*color))
}

pub(crate) fn serialize_square<S: Serializer>(
    square: &Square,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(square)
}

pub(crate) fn serialize_promotion<S: Serializer>(
    role: &Option<Role>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match role {
        Some(role) => {
            let letter = role_letter(*role).to_ascii_lowercase().to_string();
            serializer.serialize_some(&letter)
        }
        None => serializer.serialize_none(),
    }
}
