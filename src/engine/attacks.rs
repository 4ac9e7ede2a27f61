//! Attack and check detection.
//!
//! The oracle reuses the geometric predicates from [`crate::engine::rules`]:
//! a square is attacked by a colour if any piece of that colour could
//! geometrically capture on it. Two piece kinds need their own tests here:
//! pawns attack diagonally but move straight (attack is not move), and kings
//! use a plain distance check so that attack testing never recurses into the
//! castling rule.

use crate::engine::board::Board;
use crate::engine::rules;
use crate::engine::types::{Color, Coord, PieceKind};

/// Is `target` attacked by any piece of colour `by`?
pub fn is_square_attacked(board: &Board, target: Coord, by: Color) -> bool {
    for row in 0..8u8 {
        for col in 0..8u8 {
            let from = Coord::new(row, col);
            let piece = match board.get(from) {
                Some(p) if p.color == by => p,
                _ => continue,
            };
            let row_diff = target.row as i8 - from.row as i8;
            let col_diff = target.col as i8 - from.col as i8;
            let hits = match piece.kind {
                PieceKind::Pawn => row_diff == by.pawn_direction() && col_diff.abs() == 1,
                PieceKind::Knight => rules::knight_move_is_valid(board, from, target, by),
                PieceKind::Bishop => rules::bishop_move_is_valid(board, from, target, by),
                PieceKind::Rook => rules::rook_move_is_valid(board, from, target, by),
                PieceKind::Queen => rules::queen_move_is_valid(board, from, target, by),
                PieceKind::King => {
                    row_diff.abs() <= 1 && col_diff.abs() <= 1 && from != target
                }
            };
            if hits {
                return true;
            }
        }
    }
    false
}

/// Is the king of `color` currently in check? A board without that king
/// reports `false` (not a supported position, but never a panic).
pub fn king_in_check(board: &Board, color: Color) -> bool {
    match board.king_coord(color) {
        Some(king) => is_square_attacked(board, king, !color),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
