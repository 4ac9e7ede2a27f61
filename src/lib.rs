//! A rules engine for standard chess.
//!
//! The crate answers two questions for a UI (or any other caller): "what are
//! the legal destinations for the piece on this square?" and "apply this move
//! and give me the resulting state". On top of that it tracks check,
//! checkmate, stalemate, and the draw rules (fifty moves, threefold
//! repetition, insufficient material).
//!
//! [`GameState`] is the single owner of all mutable state; every other module
//! is a layer of pure functions over a read-only board view:
//!
//! * [`engine::board`] — the 8×8 board value type
//! * [`engine::rules`] — per-piece geometric move predicates
//! * [`engine::attacks`] — "is this square attacked?" / "is this king in check?"
//! * [`engine::legality`] — filters out moves that would expose the mover's king
//! * [`engine::game`] — the stateful game machine
//!
//! ```
//! use chess_rules::{Coord, GameState};
//!
//! let mut game = GameState::new();
//! let from = Coord::from_algebraic("e2").unwrap();
//! let to = Coord::from_algebraic("e4").unwrap();
//! assert!(game.legal_moves_from(from).contains(&to));
//! game.apply_move(from, to).unwrap();
//! ```

pub mod engine;

pub use engine::board::Board;
pub use engine::game::GameState;
pub use engine::types::{
    CastleSide, CastlingRights, ChessError, Color, Coord, DrawReason, EnPassant, GameResult,
    GameStatus, PendingPromotion, Piece, PieceKind, PromotionPiece,
};
