//! Stateful game machine.
//!
//! `GameState` is the sole owner of mutable game state: the board, turn
//! order, castling flags, the en-passant window, the pending-promotion
//! sub-state, the halfmove clock, and the fingerprint history used for
//! repetition counting. It is the only type a UI collaborator talks to;
//! every rule module underneath is pure.
//!
//! Mutating calls validate fully before touching anything, so a rejected
//! call leaves the state structurally identical to what came in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::legality;
use crate::engine::types::{
    CastlingRights, ChessError, Color, Coord, DrawReason, EnPassant, GameResult, GameStatus,
    PendingPromotion, Piece, PieceKind, PromotionPiece,
};

// =========================================================================
// GameState
// =========================================================================

/// A complete chess game: one cohesive, serializable snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    turn: Color,
    castling: CastlingRights,
    en_passant: Option<EnPassant>,
    pending_promotion: Option<PendingPromotion>,
    /// Half-moves since the last capture or pawn move (fifty-move rule).
    halfmove_clock: u16,
    /// Board fingerprint after each completed half-move, oldest first.
    history: Vec<String>,
    in_check: Option<Color>,
    result: GameResult,

    // Metadata
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl GameState {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// A fresh game: standard starting board, white to move, full castling
    /// rights, no en passant, empty history.
    pub fn new() -> Self {
        Self::from_position(Board::initial(), Color::White)
    }

    /// A game starting from a custom position with fresh auxiliary state.
    /// The status (check, mate, draws that need no history) is classified
    /// immediately, so loading a dead position reports it as such.
    pub fn from_position(board: Board, turn: Color) -> Self {
        let mut state = GameState {
            board,
            turn,
            castling: CastlingRights::default(),
            en_passant: None,
            pending_promotion: None,
            halfmove_clock: 0,
            history: Vec::new(),
            in_check: None,
            result: GameResult::Ongoing,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };
        let (result, in_check) = state.classify(turn);
        state.result = result;
        state.in_check = in_check;
        state
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn in_check(&self) -> Option<Color> {
        self.in_check
    }

    /// The read-only status surface the UI renders from.
    pub fn status(&self) -> GameStatus {
        GameStatus {
            turn: self.turn,
            in_check: self.in_check,
            result: self.result,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_game_over()
    }

    pub fn castling_rights(&self) -> &CastlingRights {
        &self.castling
    }

    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.pending_promotion
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Fingerprints of every completed half-move, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Legal destinations for the piece on `from`. Empty when the square is
    /// empty, holds the opponent's piece, the game is over, or a promotion
    /// is pending.
    pub fn legal_moves_from(&self, from: Coord) -> Vec<Coord> {
        if self.result.is_game_over() || self.pending_promotion.is_some() {
            return Vec::new();
        }
        match self.board.get(from) {
            Some(piece) if piece.color == self.turn => {
                legality::legal_moves_from(&self.board, from, self.en_passant, &self.castling)
            }
            _ => Vec::new(),
        }
    }

    // -----------------------------------------------------------------
    // Apply move
    // -----------------------------------------------------------------

    /// Play a half-move. On success the turn switches, unless the move put a
    /// pawn on the far rank, in which case the game waits for
    /// [`GameState::resolve_promotion`] with the turn unchanged.
    pub fn apply_move(&mut self, from: Coord, to: Coord) -> Result<(), ChessError> {
        if self.result.is_game_over() {
            return Err(ChessError::GameOver(self.result.to_string()));
        }
        if self.pending_promotion.is_some() {
            return Err(ChessError::PromotionPending);
        }
        let piece = match self.board.get(from) {
            Some(p) if p.color == self.turn => p,
            _ => {
                return Err(ChessError::InvalidSelection {
                    square: from.to_string(),
                });
            }
        };
        let legal =
            legality::legal_moves_from(&self.board, from, self.en_passant, &self.castling);
        if !legal.contains(&to) {
            return Err(ChessError::IllegalMove {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        // ---- Mutate the board ----
        let mut capture = self.board.get(to).is_some();
        if piece.kind == PieceKind::Pawn {
            if let Some(ep) = self.en_passant {
                if to == ep.target && self.board.get(to).is_none() {
                    // En passant: the captured pawn is not on the destination.
                    self.board.set(ep.pawn, None);
                    capture = true;
                }
            }
        }
        if piece.kind == PieceKind::King && (to.col as i8 - from.col as i8).abs() == 2 {
            // Castling: bring the matching rook along.
            let home = piece.color.home_row();
            let (rook_from, rook_to) = if to.col > from.col {
                (Coord::new(home, 7), Coord::new(home, 5))
            } else {
                (Coord::new(home, 0), Coord::new(home, 3))
            };
            let rook = self.board.get(rook_from);
            self.board.set(rook_from, None);
            self.board.set(rook_to, rook);
        }
        self.board.set(to, Some(piece));
        self.board.set(from, None);

        // ---- Castling rights (monotonic) ----
        match piece.kind {
            PieceKind::King => self.castling.note_king_moved(piece.color),
            PieceKind::Rook => {
                if let Some(side) = CastlingRights::rook_home_side(piece.color, from) {
                    self.castling.note_rook_moved(piece.color, side);
                }
            }
            _ => {}
        }
        // A capture landing on a rook home square kills that right as well;
        // otherwise a later piece on the corner could fake an unmoved rook.
        if capture {
            let them = !piece.color;
            if let Some(side) = CastlingRights::rook_home_side(them, to) {
                self.castling.note_rook_moved(them, side);
            }
        }

        // ---- En-passant window: one half-move lifetime ----
        self.en_passant = if piece.kind == PieceKind::Pawn
            && (to.row as i8 - from.row as i8).abs() == 2
        {
            let dir = piece.color.pawn_direction();
            let target = Coord::new((to.row as i8 - dir) as u8, to.col);
            Some(EnPassant { pawn: to, target })
        } else {
            None
        };

        // ---- Promotion: defer the rest of the half-move ----
        if piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row() {
            self.pending_promotion = Some(PendingPromotion {
                square: to,
                color: piece.color,
            });
            tracing::debug!(square = %to, color = %piece.color, "awaiting promotion choice");
            return Ok(());
        }

        tracing::debug!(%from, %to, color = %piece.color, capture, "move applied");
        self.complete_half_move(capture || piece.kind == PieceKind::Pawn);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Resolve promotion
    // -----------------------------------------------------------------

    /// Replace the promoted pawn with the chosen piece and complete the
    /// deferred half-move (counters, history, draw and check evaluation,
    /// turn switch).
    pub fn resolve_promotion(&mut self, choice: PromotionPiece) -> Result<(), ChessError> {
        if self.result.is_game_over() {
            return Err(ChessError::GameOver(self.result.to_string()));
        }
        let pending = self
            .pending_promotion
            .ok_or(ChessError::NoPendingPromotion)?;

        self.board.set(
            pending.square,
            Some(Piece::new(choice.kind(), pending.color)),
        );
        self.pending_promotion = None;
        tracing::debug!(square = %pending.square, piece = %choice.kind(), "promotion resolved");

        // A promotion is a pawn move: the clock always resets.
        self.complete_half_move(true);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Half-move completion (shared tail of apply_move / resolve_promotion)
    // -----------------------------------------------------------------

    /// Update the clock and history from the post-move board, classify the
    /// position for the opponent, and switch the turn.
    fn complete_half_move(&mut self, reset_clock: bool) {
        if reset_clock {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.history.push(self.board.fingerprint());

        let opponent = !self.turn;
        let (result, in_check) = self.classify(opponent);
        self.result = result;
        self.in_check = in_check;
        self.turn = opponent;

        if self.result.is_game_over() {
            tracing::info!(result = %self.result, "game over");
        }
    }

    /// Classify the position for the side about to move. Draw conditions are
    /// checked first, in fixed priority order; the first match is terminal.
    fn classify(&self, to_move: Color) -> (GameResult, Option<Color>) {
        if self.halfmove_clock >= 100 {
            return (GameResult::Draw(DrawReason::FiftyMoveRule), None);
        }
        if let Some(current) = self.history.last() {
            let occurrences = self.history.iter().filter(|fp| *fp == current).count();
            if occurrences >= 3 {
                return (GameResult::Draw(DrawReason::ThreefoldRepetition), None);
            }
        }
        if insufficient_material(&self.board) {
            return (GameResult::Draw(DrawReason::InsufficientMaterial), None);
        }

        let in_check = attacks::king_in_check(&self.board, to_move);
        let has_move =
            legality::has_any_legal_move(&self.board, to_move, self.en_passant, &self.castling);
        match (in_check, has_move) {
            (false, false) => (GameResult::Draw(DrawReason::Stalemate), None),
            (true, false) => (GameResult::Checkmate(!to_move), Some(to_move)),
            (true, true) => (GameResult::Ongoing, Some(to_move)),
            (false, true) => (GameResult::Ongoing, None),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Insufficient material
// =========================================================================

/// Neither side can possibly mate: K vs K, K+minor vs K, or K+B vs K+B with
/// both bishops on same-coloured squares. Any pawn, rook, or queen on the
/// board means mating material exists.
fn insufficient_material(board: &Board) -> bool {
    let mut minors = [0u32; 2];
    let mut bishops = [0u32; 2];
    let mut bishop_square: [Option<Coord>; 2] = [None, None];

    for row in 0..8u8 {
        for col in 0..8u8 {
            let at = Coord::new(row, col);
            let piece = match board.get(at) {
                Some(p) => p,
                None => continue,
            };
            match piece.kind {
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
                PieceKind::Knight => minors[piece.color.index()] += 1,
                PieceKind::Bishop => {
                    minors[piece.color.index()] += 1;
                    bishops[piece.color.index()] += 1;
                    bishop_square[piece.color.index()] = Some(at);
                }
                PieceKind::King => {}
            }
        }
    }

    match (minors[0], minors[1]) {
        // K vs K
        (0, 0) => true,
        // K + minor vs K
        (1, 0) | (0, 1) => true,
        // K+B vs K+B, bishops on same-coloured squares
        (1, 1) if bishops == [1, 1] => {
            let white = bishop_square[0].expect("white bishop counted");
            let black = bishop_square[1].expect("black bishop counted");
            (white.row + white.col) % 2 == (black.row + black.col) % 2
        }
        _ => false,
    }
}

// =========================================================================
// Tests
// =========================================================================
