use shakmaty::{Color, Role};

use crate::position::Position;

/// Fixed piece values in pawns; the king counts for nothing
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 1,
        Role::Knight => 3,
        Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 0,
    }
}

/// Material of `side` minus material of its opponent
pub fn material_balance(position: &Position, side: Color) -> i32 {
    position
        .pieces()
        .values()
        .map(|piece| {
            let value = piece_value(piece.role);
            if piece.color == side {
                value
            } else {
                -value
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{Oracle, StandardOracle};

    #[test]
    fn test_start_position_is_balanced() {
        let pos = StandardOracle.new_position(None).unwrap();
        assert_eq!(material_balance(&pos, Color::White), 0);
        assert_eq!(material_balance(&pos, Color::Black), 0);
    }

    #[test]
    fn test_balance_is_antisymmetric() {
        // White is up a rook, black has an extra pawn
        let pos = StandardOracle
            .new_position(Some("4k3/pp6/8/8/8/8/P7/R3K3 w - - 0 1"))
            .unwrap();
        assert_eq!(material_balance(&pos, Color::White), 4);
        assert_eq!(material_balance(&pos, Color::Black), -4);
    }

    #[test]
    fn test_kings_only() {
        let pos = StandardOracle.new_position(Some("8/8/8/4k3/8/8/8/4K3 w - - 0 1")).unwrap();
        assert_eq!(material_balance(&pos, Color::White), 0);
    }
}
