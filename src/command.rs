//! Reversible board mutations and the undo/redo history.
//!
//! Commands are plain data executed against the raw grid; the board decides
//! which command a player action becomes. Each history entry also carries the
//! castling-rights/en-passant state from both sides of the command so that
//! undo and redo restore it exactly.

use crate::board::{CastlingRights, Grid};
use crate::piece::Piece;
use crate::position::Position;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Command {
    /// Plain piece move. `captured` is the piece that stood on `to`, already
    /// marked captured; undo puts it back revived.
    Move {
        from: Position,
        to: Position,
        captured: Option<Piece>,
    },
    /// King and rook move together; undone in reverse order.
    Castle {
        king_from: Position,
        king_to: Position,
        rook_from: Position,
        rook_to: Position,
    },
    /// The captured pawn is beside the destination, not on it.
    EnPassant {
        from: Position,
        to: Position,
        captured_square: Position,
        captured: Piece,
    },
    /// Pawn push or capture onto the last rank combined with the piece swap,
    /// so one undo reverts the whole player action.
    Promote {
        from: Position,
        to: Position,
        pawn: Piece,
        promoted: Piece,
        captured: Option<Piece>,
    },
}

fn revive(piece: Piece) -> Piece {
    Piece {
        captured: false,
        ..piece
    }
}

impl Command {
    pub(crate) fn execute(&self, grid: &mut Grid) {
        match *self {
            Command::Move { from, to, .. } => {
                grid.move_piece(from, to);
            }
            Command::Castle {
                king_from,
                king_to,
                rook_from,
                rook_to,
            } => {
                grid.move_piece(king_from, king_to);
                grid.move_piece(rook_from, rook_to);
            }
            Command::EnPassant {
                from,
                to,
                captured_square,
                ..
            } => {
                grid.move_piece(from, to);
                grid.set(captured_square, None);
            }
            Command::Promote {
                from, to, promoted, ..
            } => {
                grid.set(from, None);
                grid.set(to, Some(promoted));
            }
        }
    }

    pub(crate) fn undo(&self, grid: &mut Grid) {
        match *self {
            Command::Move { from, to, captured } => {
                grid.move_piece(to, from);
                grid.set(to, captured.map(revive));
            }
            Command::Castle {
                king_from,
                king_to,
                rook_from,
                rook_to,
            } => {
                grid.move_piece(rook_to, rook_from);
                grid.move_piece(king_to, king_from);
            }
            Command::EnPassant {
                from,
                to,
                captured_square,
                captured,
            } => {
                grid.move_piece(to, from);
                grid.set(captured_square, Some(revive(captured)));
            }
            Command::Promote {
                from,
                to,
                pawn,
                captured,
                ..
            } => {
                grid.set(from, Some(pawn));
                grid.set(to, captured.map(revive));
            }
        }
    }
}

/// Castling-rights and en-passant state saved alongside a command.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct BoardFlags {
    pub castling: CastlingRights,
    pub en_passant: Option<Position>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct HistoryEntry {
    pub command: Command,
    pub before: BoardFlags,
    pub after: BoardFlags,
}

/// Undo/redo stacks. Executing a new command discards the redo branch.
#[derive(Default, Debug)]
pub(crate) struct CommandManager {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl CommandManager {
    pub(crate) fn execute(&mut self, entry: HistoryEntry, grid: &mut Grid) {
        entry.command.execute(grid);
        self.undo.push(entry);
        self.redo.clear();
    }

    /// Undo the most recent command, returning the state to restore.
    pub(crate) fn undo(&mut self, grid: &mut Grid) -> Option<BoardFlags> {
        let entry = self.undo.pop()?;
        entry.command.undo(grid);
        let flags = entry.before;
        self.redo.push(entry);
        Some(flags)
    }

    /// Re-execute the most recently undone command.
    pub(crate) fn redo(&mut self, grid: &mut Grid) -> Option<BoardFlags> {
        let entry = self.redo.pop()?;
        entry.command.execute(grid);
        let flags = entry.after;
        self.undo.push(entry);
        Some(flags)
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
