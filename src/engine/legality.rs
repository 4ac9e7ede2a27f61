//! Self-check filtering and legal-move sets.
//!
//! Geometric candidates from [`crate::engine::rules`] are filtered through a
//! simulate-and-test pass: copy the board, carry out the move's full effect
//! (including the en-passant victim removal and the castling rook hop), and
//! ask the oracle whether the mover's own king is attacked afterwards. The
//! same pass applies to every piece, the king included.

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::rules;
use crate::engine::types::{CastlingRights, Color, Coord, EnPassant, Piece, PieceKind};

/// Would moving `piece` from `from` to `to` leave its own king attacked?
///
/// The probe replays the complete move on a scratch copy: an en-passant
/// capture also removes the captured pawn, and a castling king move also
/// relocates the rook, so positions like a pin through the captured pawn are
/// judged correctly.
pub fn move_exposes_king(
    board: &Board,
    from: Coord,
    to: Coord,
    piece: Piece,
    en_passant: Option<EnPassant>,
) -> bool {
    let mut probe = *board;

    if piece.kind == PieceKind::Pawn {
        if let Some(ep) = en_passant {
            if to == ep.target && probe.get(to).is_none() {
                probe.set(ep.pawn, None);
            }
        }
    }

    if piece.kind == PieceKind::King && (to.col as i8 - from.col as i8).abs() == 2 {
        let home = piece.color.home_row();
        let (rook_from, rook_to) = if to.col > from.col {
            (Coord::new(home, 7), Coord::new(home, 5))
        } else {
            (Coord::new(home, 0), Coord::new(home, 3))
        };
        let rook = probe.get(rook_from);
        probe.set(rook_from, None);
        probe.set(rook_to, rook);
    }

    probe.set(to, Some(piece));
    probe.set(from, None);

    attacks::king_in_check(&probe, piece.color)
}

/// All legal destinations for the piece on `from` (empty when the square is
/// empty). Turn order is not enforced here; the game state machine is the
/// layer that knows whose move it is.
pub fn legal_moves_from(
    board: &Board,
    from: Coord,
    en_passant: Option<EnPassant>,
    castling: &CastlingRights,
) -> Vec<Coord> {
    let piece = match board.get(from) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let attacked = |sq: Coord| attacks::is_square_attacked(board, sq, !piece.color);

    let mut moves = Vec::new();
    for row in 0..8u8 {
        for col in 0..8u8 {
            let to = Coord::new(row, col);
            if rules::move_is_pseudo_legal(board, from, to, piece, en_passant, castling, &attacked)
                && !move_exposes_king(board, from, to, piece, en_passant)
            {
                moves.push(to);
            }
        }
    }
    moves
}

/// Does `color` have at least one legal move? Short-circuits on the first
/// (origin, destination) pair that is geometrically valid and does not expose
/// the king; used for checkmate and stalemate detection.
pub fn has_any_legal_move(
    board: &Board,
    color: Color,
    en_passant: Option<EnPassant>,
    castling: &CastlingRights,
) -> bool {
    for row in 0..8u8 {
        for col in 0..8u8 {
            let from = Coord::new(row, col);
            let piece = match board.get(from) {
                Some(p) if p.color == color => p,
                _ => continue,
            };
            let attacked = |sq: Coord| attacks::is_square_attacked(board, sq, !color);
            for to_row in 0..8u8 {
                for to_col in 0..8u8 {
                    let to = Coord::new(to_row, to_col);
                    if rules::move_is_pseudo_legal(
                        board, from, to, piece, en_passant, castling, &attacked,
                    ) && !move_exposes_king(board, from, to, piece, en_passant)
                    {
                        return true;
                    }
                }
            }
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
