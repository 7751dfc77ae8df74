//! The human-readable move log.
//!
//! Kept consistent with the command history through a cursor: undo rewinds
//! it (the entry stays for redo), redo replays it, and a fresh move discards
//! the rewound tail.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::{Color, PieceKind};
use crate::position::Position;

/// One executed move, as the UI displays it.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct MoveInfo {
    pub from: Position,
    pub to: Position,
    pub kind: PieceKind,
    pub color: Color,
    pub capture: bool,
}

impl fmt::Display for MoveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}-{}", self.color, self.kind, self.from, self.to)?;
        if self.capture {
            write!(f, " (capture)")?;
        }
        Ok(())
    }
}

#[derive(Default, Debug)]
pub struct MoveLog {
    entries: Vec<MoveInfo>,
    cursor: usize,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh move, discarding anything rewound past the cursor.
    pub fn push(&mut self, info: MoveInfo) {
        self.entries.truncate(self.cursor);
        self.entries.push(info);
        self.cursor = self.entries.len();
    }

    /// Step the visible history back one move.
    pub fn rewind(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward again after a rewind.
    pub fn replay(&mut self) -> Option<MoveInfo> {
        let info = *self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some(info)
    }

    /// The moves up to the cursor, oldest first.
    pub fn moves(&self) -> &[MoveInfo] {
        &self.entries[..self.cursor]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
