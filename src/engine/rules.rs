//! Geometric move rules, one predicate per piece kind.
//!
//! These predicates decide whether a single move is *geometrically* valid on
//! a board snapshot: direction, path clearance, capture shape, and the
//! special pawn and castling cases. They deliberately ignore whether the
//! move would leave the mover's own king in check; that filtering happens in
//! one place, in [`crate::engine::legality`], uniformly for every piece.
//!
//! Castling is the one rule that needs to know about attacked squares (the
//! king may not castle out of, through, or into check), so it receives an
//! attack-test callback instead of reaching into the attack oracle itself.

use crate::engine::board::Board;
use crate::engine::types::{CastleSide, CastlingRights, Color, Coord, EnPassant, Piece, PieceKind};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Is the move geometrically valid for `piece`, ignoring self-check?
///
/// `attacked` must report whether a square is attacked by the opponent of
/// `piece.color`; it is consulted only by the castling sub-rule.
pub fn move_is_pseudo_legal(
    board: &Board,
    from: Coord,
    to: Coord,
    piece: Piece,
    en_passant: Option<EnPassant>,
    castling: &CastlingRights,
    attacked: &dyn Fn(Coord) -> bool,
) -> bool {
    if from == to {
        return false;
    }
    match piece.kind {
        PieceKind::Pawn => pawn_move_is_valid(board, from, to, piece.color, en_passant),
        PieceKind::Knight => knight_move_is_valid(board, from, to, piece.color),
        PieceKind::Bishop => bishop_move_is_valid(board, from, to, piece.color),
        PieceKind::Rook => rook_move_is_valid(board, from, to, piece.color),
        PieceKind::Queen => queen_move_is_valid(board, from, to, piece.color),
        PieceKind::King => {
            // Castling is evaluated first; if it matches, the one-square rule
            // is skipped.
            castling_is_legal(board, from, to, piece.color, castling, attacked)
                || king_move_is_valid(board, from, to, piece.color)
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Every square strictly between `from` and `to` is empty. `from` and `to`
/// must lie on a shared rank, file, or diagonal.
fn line_is_clear(board: &Board, from: Coord, to: Coord) -> bool {
    let dr = (to.row as i8 - from.row as i8).signum();
    let dc = (to.col as i8 - from.col as i8).signum();
    let mut row = from.row as i8 + dr;
    let mut col = from.col as i8 + dc;
    while (row, col) != (to.row as i8, to.col as i8) {
        if board.get(Coord::new(row as u8, col as u8)).is_some() {
            return false;
        }
        row += dr;
        col += dc;
    }
    true
}

/// The destination holds a piece of the mover's own colour.
#[inline]
fn blocked_by_own_piece(board: &Board, to: Coord, color: Color) -> bool {
    matches!(board.get(to), Some(p) if p.color == color)
}

// ---------------------------------------------------------------------------
// Pawn
// ---------------------------------------------------------------------------

pub fn pawn_move_is_valid(
    board: &Board,
    from: Coord,
    to: Coord,
    color: Color,
    en_passant: Option<EnPassant>,
) -> bool {
    let dir = color.pawn_direction();
    let row_diff = to.row as i8 - from.row as i8;
    let col_diff = (to.col as i8 - from.col as i8).abs();

    // En-passant capture: one diagonal step onto the (empty) capture target.
    if let Some(ep) = en_passant {
        if row_diff == dir && col_diff == 1 && to == ep.target && board.get(to).is_none() {
            return true;
        }
    }

    // Ordinary diagonal capture.
    if row_diff == dir && col_diff == 1 {
        return matches!(board.get(to), Some(p) if p.color != color);
    }

    // One square forward onto an empty square.
    if col_diff == 0 && row_diff == dir {
        return board.get(to).is_none();
    }

    // Two squares forward from the starting rank, both squares empty.
    if col_diff == 0 && from.row == color.pawn_start_row() && row_diff == 2 * dir {
        let skipped = Coord::new((from.row as i8 + dir) as u8, from.col);
        return board.get(skipped).is_none() && board.get(to).is_none();
    }

    false
}

// ---------------------------------------------------------------------------
// Rook, knight, bishop, queen
// ---------------------------------------------------------------------------

pub fn rook_move_is_valid(board: &Board, from: Coord, to: Coord, color: Color) -> bool {
    if from.row != to.row && from.col != to.col {
        return false;
    }
    if blocked_by_own_piece(board, to, color) {
        return false;
    }
    line_is_clear(board, from, to)
}

pub fn knight_move_is_valid(board: &Board, from: Coord, to: Coord, color: Color) -> bool {
    let row_diff = (to.row as i8 - from.row as i8).abs();
    let col_diff = (to.col as i8 - from.col as i8).abs();
    if !matches!((row_diff, col_diff), (1, 2) | (2, 1)) {
        return false;
    }
    !blocked_by_own_piece(board, to, color)
}

pub fn bishop_move_is_valid(board: &Board, from: Coord, to: Coord, color: Color) -> bool {
    let row_diff = (to.row as i8 - from.row as i8).abs();
    let col_diff = (to.col as i8 - from.col as i8).abs();
    if row_diff != col_diff || row_diff == 0 {
        return false;
    }
    if blocked_by_own_piece(board, to, color) {
        return false;
    }
    line_is_clear(board, from, to)
}

pub fn queen_move_is_valid(board: &Board, from: Coord, to: Coord, color: Color) -> bool {
    rook_move_is_valid(board, from, to, color) || bishop_move_is_valid(board, from, to, color)
}

// ---------------------------------------------------------------------------
// King
// ---------------------------------------------------------------------------

/// Ordinary one-square king step. Whether the destination is attacked is not
/// checked here; the legality filter covers the king the same way it covers
/// every other piece.
pub fn king_move_is_valid(board: &Board, from: Coord, to: Coord, color: Color) -> bool {
    let row_diff = (to.row as i8 - from.row as i8).abs();
    let col_diff = (to.col as i8 - from.col as i8).abs();
    if row_diff > 1 || col_diff > 1 || (row_diff == 0 && col_diff == 0) {
        return false;
    }
    !blocked_by_own_piece(board, to, color)
}

/// Castling: king slides two squares toward a rook that has never moved.
///
/// Requires: king and rook unmoved and on their original squares, every
/// square strictly between them empty, the king not currently in check, and
/// no square the king traverses or lands on attacked by the opponent.
pub fn castling_is_legal(
    board: &Board,
    from: Coord,
    to: Coord,
    color: Color,
    castling: &CastlingRights,
    attacked: &dyn Fn(Coord) -> bool,
) -> bool {
    let home = color.home_row();
    if from.row != home || to.row != home || from.col != 4 {
        return false;
    }
    let col_delta = to.col as i8 - from.col as i8;
    if col_delta.abs() != 2 {
        return false;
    }
    let side = if col_delta > 0 {
        CastleSide::KingSide
    } else {
        CastleSide::QueenSide
    };

    if castling.king_moved(color) || castling.rook_moved(color, side) {
        return false;
    }

    // The matching rook must still stand on its corner.
    let rook_col = match side {
        CastleSide::KingSide => 7,
        CastleSide::QueenSide => 0,
    };
    match board.get(Coord::new(home, rook_col)) {
        Some(p) if p.kind == PieceKind::Rook && p.color == color => {}
        _ => return false,
    }

    // Every square strictly between king and rook must be empty.
    let (first, last) = match side {
        CastleSide::KingSide => (5, 6),
        CastleSide::QueenSide => (1, 3),
    };
    for col in first..=last {
        if board.get(Coord::new(home, col)).is_some() {
            return false;
        }
    }

    // The king may not castle out of, through, or into check: its origin,
    // the crossed square, and the destination must all be safe.
    let step = col_delta.signum();
    let mut col = from.col as i8;
    loop {
        if attacked(Coord::new(home, col as u8)) {
            return false;
        }
        if col == to.col as i8 {
            break;
        }
        col += step;
    }

    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Piece;

    fn sq(name: &str) -> Coord {
        Coord::from_algebraic(name).unwrap()
    }

    fn board(placement: &str) -> Board {
        Board::from_placement(placement).unwrap()
    }

    /// Attack callback that reports no square attacked.
    fn no_attacks(_: Coord) -> bool {
        false
    }

    // -------------------------------------------------------------------
    // Pawn
    // -------------------------------------------------------------------

    #[test]
    fn pawn_single_and_double_push() {
        let b = Board::initial();
        assert!(pawn_move_is_valid(&b, sq("e2"), sq("e3"), Color::White, None));
        assert!(pawn_move_is_valid(&b, sq("e2"), sq("e4"), Color::White, None));
        assert!(pawn_move_is_valid(&b, sq("d7"), sq("d6"), Color::Black, None));
        assert!(pawn_move_is_valid(&b, sq("d7"), sq("d5"), Color::Black, None));
    }

    #[test]
    fn pawn_cannot_push_backwards_or_sideways() {
        let b = Board::initial();
        assert!(!pawn_move_is_valid(&b, sq("e2"), sq("e1"), Color::White, None));
        assert!(!pawn_move_is_valid(&b, sq("e2"), sq("d2"), Color::White, None));
        assert!(!pawn_move_is_valid(&b, sq("d7"), sq("d8"), Color::Black, None));
    }

    #[test]
    fn pawn_double_push_only_from_start() {
        let b = board("4k3/8/8/8/8/4P3/8/4K3");
        assert!(pawn_move_is_valid(&b, sq("e3"), sq("e4"), Color::White, None));
        assert!(!pawn_move_is_valid(&b, sq("e3"), sq("e5"), Color::White, None));
    }

    #[test]
    fn pawn_push_blocked() {
        // Black pawn directly in front of the white one.
        let b = board("4k3/8/8/8/8/4p3/4P3/4K3");
        assert!(!pawn_move_is_valid(&b, sq("e2"), sq("e3"), Color::White, None));
        assert!(!pawn_move_is_valid(&b, sq("e2"), sq("e4"), Color::White, None));
    }

    #[test]
    fn pawn_double_push_blocked_on_skipped_square() {
        let b = board("4k3/8/8/8/8/4n3/4P3/4K3");
        assert!(!pawn_move_is_valid(&b, sq("e2"), sq("e4"), Color::White, None));
    }

    #[test]
    fn pawn_diagonal_capture() {
        let b = board("4k3/8/8/8/3p4/4P3/8/4K3");
        assert!(pawn_move_is_valid(&b, sq("e3"), sq("d4"), Color::White, None));
        // No capture target on the other diagonal.
        assert!(!pawn_move_is_valid(&b, sq("e3"), sq("f4"), Color::White, None));
        // Cannot capture straight ahead.
        let b2 = board("4k3/8/8/8/4p3/4P3/8/4K3");
        assert!(!pawn_move_is_valid(&b2, sq("e3"), sq("e4"), Color::White, None));
    }

    #[test]
    fn pawn_cannot_capture_own_piece() {
        let b = board("4k3/8/8/8/3N4/4P3/8/4K3");
        assert!(!pawn_move_is_valid(&b, sq("e3"), sq("d4"), Color::White, None));
    }

    #[test]
    fn pawn_en_passant_geometry() {
        // Black pawn just double-pushed d7-d5; white pawn on e5.
        let b = board("4k3/8/8/3pP3/8/8/8/4K3");
        let ep = EnPassant {
            pawn: sq("d5"),
            target: sq("d6"),
        };
        assert!(pawn_move_is_valid(&b, sq("e5"), sq("d6"), Color::White, Some(ep)));
        // Without the window the same move is not a pawn move.
        assert!(!pawn_move_is_valid(&b, sq("e5"), sq("d6"), Color::White, None));
        // The window does not license other diagonals.
        assert!(!pawn_move_is_valid(&b, sq("e5"), sq("f6"), Color::White, Some(ep)));
    }

    // -------------------------------------------------------------------
    // Rook / bishop / queen / knight
    // -------------------------------------------------------------------

    #[test]
    fn rook_moves_straight_lines() {
        let b = board("4k3/8/8/8/3R4/8/8/4K3");
        assert!(rook_move_is_valid(&b, sq("d4"), sq("d8"), Color::White));
        assert!(rook_move_is_valid(&b, sq("d4"), sq("a4"), Color::White));
        assert!(!rook_move_is_valid(&b, sq("d4"), sq("e5"), Color::White));
    }

    #[test]
    fn rook_path_blocked() {
        let b = board("4k3/8/8/3n4/3R4/8/8/4K3");
        // Can capture the blocker but not pass through it.
        assert!(rook_move_is_valid(&b, sq("d4"), sq("d5"), Color::White));
        assert!(!rook_move_is_valid(&b, sq("d4"), sq("d7"), Color::White));
    }

    #[test]
    fn rook_cannot_capture_own_piece() {
        let b = Board::initial();
        assert!(!rook_move_is_valid(&b, sq("a1"), sq("a2"), Color::White));
    }

    #[test]
    fn knight_jumps() {
        let b = Board::initial();
        assert!(knight_move_is_valid(&b, sq("g1"), sq("f3"), Color::White));
        assert!(knight_move_is_valid(&b, sq("g1"), sq("h3"), Color::White));
        // Blocked destination (own pawn), wrong shape.
        assert!(!knight_move_is_valid(&b, sq("g1"), sq("e2"), Color::White));
        assert!(!knight_move_is_valid(&b, sq("g1"), sq("g3"), Color::White));
    }

    #[test]
    fn bishop_diagonals_and_blockers() {
        let b = board("4k3/8/8/8/3B4/8/8/4K3");
        assert!(bishop_move_is_valid(&b, sq("d4"), sq("h8"), Color::White));
        assert!(bishop_move_is_valid(&b, sq("d4"), sq("a1"), Color::White));
        assert!(!bishop_move_is_valid(&b, sq("d4"), sq("d5"), Color::White));

        let blocked = board("4k3/8/5p2/8/3B4/8/8/4K3");
        assert!(bishop_move_is_valid(&blocked, sq("d4"), sq("f6"), Color::White));
        assert!(!bishop_move_is_valid(&blocked, sq("d4"), sq("h8"), Color::White));
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let b = board("4k3/8/8/8/3Q4/8/8/4K3");
        assert!(queen_move_is_valid(&b, sq("d4"), sq("d8"), Color::White));
        assert!(queen_move_is_valid(&b, sq("d4"), sq("h8"), Color::White));
        assert!(!queen_move_is_valid(&b, sq("d4"), sq("e6"), Color::White));
    }

    // -------------------------------------------------------------------
    // King
    // -------------------------------------------------------------------

    #[test]
    fn king_one_square_any_direction() {
        let b = board("4k3/8/8/8/3K4/8/8/8");
        for to in ["c3", "c4", "c5", "d3", "d5", "e3", "e4", "e5"] {
            assert!(king_move_is_valid(&b, sq("d4"), sq(to), Color::White));
        }
        assert!(!king_move_is_valid(&b, sq("d4"), sq("d6"), Color::White));
        assert!(!king_move_is_valid(&b, sq("d4"), sq("f4"), Color::White));
    }

    #[test]
    fn king_null_move_rejected() {
        let b = board("4k3/8/8/8/3K4/8/8/8");
        assert!(!king_move_is_valid(&b, sq("d4"), sq("d4"), Color::White));
    }

    // -------------------------------------------------------------------
    // Castling
    // -------------------------------------------------------------------

    #[test]
    fn castling_both_wings_when_clear() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let rights = CastlingRights::default();
        assert!(castling_is_legal(&b, sq("e1"), sq("g1"), Color::White, &rights, &no_attacks));
        assert!(castling_is_legal(&b, sq("e1"), sq("c1"), Color::White, &rights, &no_attacks));
        assert!(castling_is_legal(&b, sq("e8"), sq("g8"), Color::Black, &rights, &no_attacks));
        assert!(castling_is_legal(&b, sq("e8"), sq("c8"), Color::Black, &rights, &no_attacks));
    }

    #[test]
    fn castling_requires_two_square_slide_on_home_row() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let rights = CastlingRights::default();
        assert!(!castling_is_legal(&b, sq("e1"), sq("f1"), Color::White, &rights, &no_attacks));
        assert!(!castling_is_legal(&b, sq("e1"), sq("g2"), Color::White, &rights, &no_attacks));
    }

    #[test]
    fn castling_blocked_by_piece_between() {
        // Knights on b1 and g1: both wings blocked for white. The b-file
        // blocker matters even though the king never crosses it.
        let b = board("r3k2r/8/8/8/8/8/8/RN2K1NR");
        let rights = CastlingRights::default();
        assert!(!castling_is_legal(&b, sq("e1"), sq("g1"), Color::White, &rights, &no_attacks));
        assert!(!castling_is_legal(&b, sq("e1"), sq("c1"), Color::White, &rights, &no_attacks));
    }

    #[test]
    fn castling_denied_after_king_or_rook_moved() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let mut rights = CastlingRights::default();
        rights.note_rook_moved(Color::White, CastleSide::KingSide);
        assert!(!castling_is_legal(&b, sq("e1"), sq("g1"), Color::White, &rights, &no_attacks));
        assert!(castling_is_legal(&b, sq("e1"), sq("c1"), Color::White, &rights, &no_attacks));

        rights.note_king_moved(Color::White);
        assert!(!castling_is_legal(&b, sq("e1"), sq("c1"), Color::White, &rights, &no_attacks));
    }

    #[test]
    fn castling_denied_without_rook_on_corner() {
        let b = board("4k3/8/8/8/8/8/8/4K2R");
        let rights = CastlingRights::default();
        // Queenside rook is gone; rights alone do not make it legal.
        assert!(!castling_is_legal(&b, sq("e1"), sq("c1"), Color::White, &rights, &no_attacks));
        assert!(castling_is_legal(&b, sq("e1"), sq("g1"), Color::White, &rights, &no_attacks));
    }

    #[test]
    fn castling_denied_through_attacked_square() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let rights = CastlingRights::default();
        let f1 = sq("f1");
        let f1_attacked = move |c: Coord| c == f1;
        // Kingside crosses f1; queenside does not.
        assert!(!castling_is_legal(&b, sq("e1"), sq("g1"), Color::White, &rights, &f1_attacked));
        assert!(castling_is_legal(&b, sq("e1"), sq("c1"), Color::White, &rights, &f1_attacked));
    }

    #[test]
    fn castling_denied_while_in_check() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let rights = CastlingRights::default();
        let e1 = sq("e1");
        let origin_attacked = move |c: Coord| c == e1;
        assert!(!castling_is_legal(&b, sq("e1"), sq("g1"), Color::White, &rights, &origin_attacked));
        assert!(!castling_is_legal(&b, sq("e1"), sq("c1"), Color::White, &rights, &origin_attacked));
    }

    #[test]
    fn castling_ignores_attack_on_uncrossed_square() {
        // b1 is attacked; queenside castling is still fine because the king
        // only traverses d1 and c1.
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let rights = CastlingRights::default();
        let b1 = sq("b1");
        let b1_attacked = move |c: Coord| c == b1;
        assert!(castling_is_legal(&b, sq("e1"), sq("c1"), Color::White, &rights, &b1_attacked));
    }

    // -------------------------------------------------------------------
    // Dispatcher
    // -------------------------------------------------------------------

    #[test]
    fn dispatcher_rejects_null_move() {
        let b = Board::initial();
        let rights = CastlingRights::default();
        let queen = Piece::new(PieceKind::Queen, Color::White);
        assert!(!move_is_pseudo_legal(
            &b,
            sq("d1"),
            sq("d1"),
            queen,
            None,
            &rights,
            &no_attacks
        ));
    }

    #[test]
    fn dispatcher_routes_castling_through_king() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let rights = CastlingRights::default();
        let king = Piece::new(PieceKind::King, Color::White);
        assert!(move_is_pseudo_legal(
            &b,
            sq("e1"),
            sq("g1"),
            king,
            None,
            &rights,
            &no_attacks
        ));
        assert!(move_is_pseudo_legal(
            &b,
            sq("e1"),
            sq("d1"),
            king,
            None,
            &rights,
            &no_attacks
        ));
    }
}
