//! Capture effects, selected by the kind of the piece being taken.
//!
//! A normal capture only soft-deletes the victim (the move command does the
//! grid overwrite). Taking a king additionally signals that the game is over,
//! with the capturing color as winner. With check safety enforced by
//! `Board::try_move` that signal never fires from the standard start, but a
//! custom setup placed through `set_piece` can still reach it.

use crate::board::Board;
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;

/// True iff `target` holds a piece of the opposite color to `mover`.
pub fn can_capture(mover: &Piece, target: Position, board: &Board) -> bool {
    matches!(board.get_piece(target), Some(piece) if piece.color != mover.color)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CaptureRule {
    Normal,
    King,
}

impl CaptureRule {
    /// Which rule applies when `victim` is taken.
    pub fn for_target(victim: &Piece) -> Self {
        match victim.kind {
            PieceKind::King => CaptureRule::King,
            _ => CaptureRule::Normal,
        }
    }

    /// Soft-delete the victim.
    pub fn apply(self, victim: &mut Piece) {
        victim.captured = true;
    }

    /// The winner this capture decides, if any.
    pub fn terminates(self, capturer: Color) -> Option<Color> {
        match self {
            CaptureRule::Normal => None,
            CaptureRule::King => Some(capturer),
        }
    }
}
