pub mod attacks;
pub mod board;
pub mod game;
pub mod legality;
pub mod rules;
pub mod types;

pub use board::Board;
pub use game::GameState;
pub use legality::{has_any_legal_move, legal_moves_from, move_exposes_king};
pub use types::*;
