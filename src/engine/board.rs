//! 8×8 board representation.
//!
//! `Board` is a plain value type (a fixed-size array of optional pieces), so
//! "what-if" probes during legality checking are a cheap copy rather than a
//! mutate-and-restore dance on shared state. It performs no rule validation;
//! out-of-range coordinates are a programming error and fail fast.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::types::{ChessError, Color, Coord, Piece, PieceKind};

/// Back-rank piece order, a-file to h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The 8×8 grid. Row 0 is rank 8 (black's back rank), row 7 is rank 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard starting position.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for col in 0..8 {
            board.squares[0][col] = Some(Piece::new(BACK_RANK[col], Color::Black));
            board.squares[1][col] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            board.squares[6][col] = Some(Piece::new(PieceKind::Pawn, Color::White));
            board.squares[7][col] = Some(Piece::new(BACK_RANK[col], Color::White));
        }
        board
    }

    /// What piece (if any) occupies `at`?
    #[inline]
    pub fn get(&self, at: Coord) -> Option<Piece> {
        self.squares[at.row as usize][at.col as usize]
    }

    /// Place (or clear) a square.
    #[inline]
    pub fn set(&mut self, at: Coord, piece: Option<Piece>) {
        self.squares[at.row as usize][at.col as usize] = piece;
    }

    /// Locate the king of the given colour. Legal play guarantees exactly one
    /// king per side; on a malformed board this returns `None` rather than
    /// panicking.
    pub fn king_coord(&self, color: Color) -> Option<Coord> {
        for row in 0..8 {
            for col in 0..8 {
                if let Some(piece) = self.squares[row][col] {
                    if piece.kind == PieceKind::King && piece.color == color {
                        return Some(Coord::new(row as u8, col as u8));
                    }
                }
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Fingerprint
    // -----------------------------------------------------------------------

    /// Deterministic, order-preserving encoding of the 64 squares, used for
    /// repetition counting. One letter per occupied square (`N`/`n` style),
    /// `-` per empty square, ranks separated by `/`. Equality of fingerprints
    /// means equality of piece placement; castling rights, the en-passant
    /// window, and the side to move are intentionally not encoded.
    pub fn fingerprint(&self) -> String {
        let mut out = String::with_capacity(72);
        for row in 0..8 {
            for col in 0..8 {
                match self.squares[row][col] {
                    Some(piece) => out.push(piece.kind.to_char(piece.color)),
                    None => out.push('-'),
                }
            }
            if row < 7 {
                out.push('/');
            }
        }
        out
    }

    // -----------------------------------------------------------------------
    // Placement parsing
    // -----------------------------------------------------------------------

    /// Parse a FEN-style piece-placement field (the first field only, e.g.
    /// `"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"`). Ranks are listed
    /// from rank 8 down, digits skip empty squares. Useful for setting up
    /// custom positions; no validation beyond shape is performed.
    pub fn from_placement(placement: &str) -> Result<Self, ChessError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidPlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut col: u8 = 0;
            for ch in rank_str.chars() {
                if col > 7 {
                    return Err(ChessError::InvalidPlacement(format!(
                        "too many squares in rank {}",
                        8 - row
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidPlacement(format!(
                            "invalid empty count '{ch}' in rank {}",
                            8 - row
                        )));
                    }
                    col += digit as u8;
                } else if let Some((color, kind)) = PieceKind::from_char(ch) {
                    board.set(Coord::new(row as u8, col), Some(Piece::new(kind, color)));
                    col += 1;
                } else {
                    return Err(ChessError::InvalidPlacement(format!(
                        "invalid character '{ch}'"
                    )));
                }
            }
            if col != 8 {
                return Err(ChessError::InvalidPlacement(format!(
                    "rank {} has {} squares instead of 8",
                    8 - row,
                    col
                )));
            }
        }
        Ok(board)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Board {
    /// Render as an 8-line text grid (rank 8 at the top), handy in test
    /// failures and debug logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8 {
                let ch = match self.squares[row][col] {
                    Some(piece) => piece.kind.to_char(piece.color),
                    None => '.',
                };
                write!(f, "{ch}")?;
                if col < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
