//! Board state: the 8x8 grid, side to move, castling and en-passant
//! bookkeeping, and the command history that makes every move reversible.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::capture::CaptureRule;
use crate::command::{BoardFlags, Command, CommandManager, HistoryEntry};
use crate::error::{EngineError, Result};
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn all() -> Self {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> Self {
        CastlingRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }
}

/// The raw 8x8 square storage. Writes assume validated positions; the board
/// wraps every public entry point with validation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Grid {
    squares: [[Option<Piece>; 8]; 8],
}

impl Grid {
    pub(crate) fn empty() -> Self {
        Grid {
            squares: [[None; 8]; 8],
        }
    }

    pub(crate) fn get(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        let (row, col) = pos.index();
        self.squares[row][col]
    }

    pub(crate) fn set(&mut self, pos: Position, piece: Option<Piece>) {
        let (row, col) = pos.index();
        self.squares[row][col] = piece;
    }

    /// Unconditional swap: whatever is at `from` lands on `to`, discarding
    /// anything there. Used forward by commands and backward by undo.
    pub(crate) fn move_piece(&mut self, from: Position, to: Position) {
        let piece = self.get(from);
        self.set(to, piece);
        self.set(from, None);
    }

    fn find_king(&self, color: Color) -> Option<Position> {
        for row in 0..8 {
            for col in 0..8 {
                let pos = Position::new(row, col);
                if let Some(piece) = self.get(pos) {
                    if piece.kind == PieceKind::King && piece.color == color {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }
}

#[derive(Debug)]
pub struct Board {
    grid: Grid,
    turn: Color,
    castling: CastlingRights,
    en_passant: Option<Position>,
    history: CommandManager,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// A board in the standard opening position, white to move.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.reset();
        board
    }

    /// An empty board with no castling rights. Useful for setting up test
    /// and custom positions through `set_piece`.
    pub fn empty() -> Self {
        Board {
            grid: Grid::empty(),
            turn: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            history: CommandManager::default(),
        }
    }

    /// Back to the standard opening layout; clears the command history.
    pub fn reset(&mut self) {
        self.grid = Grid::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, kind) in back_rank.into_iter().enumerate() {
            let col = col as i8;
            self.grid
                .set(Position::new(0, col), Some(Piece::new(kind, Color::White)));
            self.grid
                .set(Position::new(7, col), Some(Piece::new(kind, Color::Black)));
            self.grid.set(
                Position::new(1, col),
                Some(Piece::new(PieceKind::Pawn, Color::White)),
            );
            self.grid.set(
                Position::new(6, col),
                Some(Piece::new(PieceKind::Pawn, Color::Black)),
            );
        }
        self.turn = Color::White;
        self.castling = CastlingRights::all();
        self.en_passant = None;
        self.history.clear();
    }

    /// Read a square. Invalid positions and empty squares both read as
    /// `None`, since UI hit-testing probes speculatively.
    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        self.grid.get(pos)
    }

    /// Write a square. An invalid position is a caller bug and errors hard.
    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) -> Result<()> {
        if !pos.is_valid() {
            return Err(EngineError::InvalidPosition {
                row: pos.row,
                col: pos.col,
            });
        }
        self.grid.set(pos, piece);
        Ok(())
    }

    /// Raw grid swap: whatever is at `from` lands on `to`, discarding any
    /// occupant. No legality checks, no turn flip, no history entry: this
    /// is the primitive the commands are built from, exposed for board
    /// editing. Errors hard on off-board positions.
    pub fn move_piece(&mut self, from: Position, to: Position) -> Result<()> {
        for pos in [from, to] {
            if !pos.is_valid() {
                return Err(EngineError::InvalidPosition {
                    row: pos.row,
                    col: pos.col,
                });
            }
        }
        self.grid.move_piece(from, to);
        Ok(())
    }

    /// Defensive copy of the grid, safe for the UI to hold.
    pub fn snapshot(&self) -> [[Option<Piece>; 8]; 8] {
        self.grid.squares
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn is_white_turn(&self) -> bool {
        self.turn.is_white()
    }

    /// Hand the move to a side, for custom setups where the side to move is
    /// part of the position.
    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Attempt a move for the side to move, auto-promoting to a queen.
    /// Returns false with zero state change on any validation failure.
    pub fn try_move(&mut self, from: Position, to: Position) -> bool {
        self.try_move_promoting(from, to, PieceKind::Queen)
    }

    /// Attempt a move with an explicit promotion choice for the case where
    /// a pawn reaches the last rank.
    pub fn try_move_promoting(
        &mut self,
        from: Position,
        to: Position,
        promotion: PieceKind,
    ) -> bool {
        if !from.is_valid() || !to.is_valid() {
            trace!(%from, %to, "move rejected: off the board");
            return false;
        }
        let Some(piece) = self.grid.get(from) else {
            trace!(%from, "move rejected: empty origin");
            return false;
        };
        if piece.color != self.turn {
            trace!(%from, "move rejected: not this side's turn");
            return false;
        }
        let Some(command) = self.plan_legal_move(piece, from, to, promotion) else {
            trace!(%from, %to, "move rejected: illegal");
            return false;
        };

        let before = BoardFlags {
            castling: self.castling,
            en_passant: self.en_passant,
        };
        let after = self.next_flags(piece, from, to);
        self.history.execute(
            HistoryEntry {
                command,
                before,
                after,
            },
            &mut self.grid,
        );
        self.castling = after.castling;
        self.en_passant = after.en_passant;
        self.turn = self.turn.opponent();
        true
    }

    /// Take back the last move. False if there is nothing to undo.
    pub fn undo_move(&mut self) -> bool {
        match self.history.undo(&mut self.grid) {
            Some(flags) => {
                self.castling = flags.castling;
                self.en_passant = flags.en_passant;
                self.turn = self.turn.opponent();
                true
            }
            None => false,
        }
    }

    /// Replay the last undone move. False if there is nothing to redo.
    pub fn redo_move(&mut self) -> bool {
        match self.history.redo(&mut self.grid) {
            Some(flags) => {
                self.castling = flags.castling;
                self.en_passant = flags.en_passant;
                self.turn = self.turn.opponent();
                true
            }
            None => false,
        }
    }

    /// True iff any enemy piece's movement rule reaches `color`'s king.
    pub fn is_in_check(&self, color: Color) -> bool {
        let Some(king_pos) = self.grid.find_king(color) else {
            return false;
        };
        for row in 0..8 {
            for col in 0..8 {
                let from = Position::new(row, col);
                if let Some(piece) = self.grid.get(from) {
                    if piece.color != color && piece.is_valid_move(from, king_pos, self) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Exhaustive (piece, destination) scan: does `color` have any move that
    /// leaves its own king out of check? Each candidate is applied to the
    /// live grid, tested and reverted; sessions are single-threaded.
    pub fn has_any_legal_move(&mut self, color: Color) -> bool {
        for row in 0..8 {
            for col in 0..8 {
                let from = Position::new(row, col);
                let Some(piece) = self.grid.get(from) else {
                    continue;
                };
                if piece.color != color {
                    continue;
                }
                for to_row in 0..8 {
                    for to_col in 0..8 {
                        let to = Position::new(to_row, to_col);
                        if self
                            .plan_legal_move(piece, from, to, PieceKind::Queen)
                            .is_some()
                        {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Destinations the piece on `pos` can legally reach, the hint query a
    /// board UI highlights.
    pub fn legal_moves_from(&mut self, pos: Position) -> Vec<Position> {
        let Some(piece) = self.grid.get(pos) else {
            return Vec::new();
        };
        let mut destinations = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                let to = Position::new(row, col);
                if self
                    .plan_legal_move(piece, pos, to, PieceKind::Queen)
                    .is_some()
                {
                    destinations.push(to);
                }
            }
        }
        destinations
    }

    /// Translate a candidate move into the command it would execute, or
    /// `None` if it is illegal. Legality includes check safety: the command
    /// is applied to the grid, tested and reverted.
    fn plan_legal_move(
        &mut self,
        piece: Piece,
        from: Position,
        to: Position,
        promotion: PieceKind,
    ) -> Option<Command> {
        let command = self
            .castle_command(piece, from, to)
            .or_else(|| self.en_passant_command(piece, from, to))
            .or_else(|| self.plain_command(piece, from, to, promotion))?;

        command.execute(&mut self.grid);
        let safe = !self.is_in_check(piece.color);
        command.undo(&mut self.grid);
        safe.then_some(command)
    }

    fn plain_command(
        &self,
        piece: Piece,
        from: Position,
        to: Position,
        promotion: PieceKind,
    ) -> Option<Command> {
        if !piece.is_valid_move(from, to, self) {
            return None;
        }
        let captured = self.grid.get(to).map(|mut victim| {
            CaptureRule::for_target(&victim).apply(&mut victim);
            victim
        });
        let last_rank = match piece.color {
            Color::White => 7,
            Color::Black => 0,
        };
        if piece.kind == PieceKind::Pawn && to.row == last_rank {
            if !matches!(
                promotion,
                PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
            ) {
                return None;
            }
            Some(Command::Promote {
                from,
                to,
                pawn: piece,
                promoted: Piece::new(promotion, piece.color),
                captured,
            })
        } else {
            Some(Command::Move { from, to, captured })
        }
    }

    /// A king stepping two files from its home square is a castling attempt.
    /// Requires the right for that wing, a clear path, the rook in its
    /// corner, and a king that is neither in check nor crossing an attacked
    /// square. The landing square is covered by the caller's check test.
    fn castle_command(&mut self, piece: Piece, from: Position, to: Position) -> Option<Command> {
        if piece.kind != PieceKind::King {
            return None;
        }
        let back_rank = match piece.color {
            Color::White => 0,
            Color::Black => 7,
        };
        if from != Position::new(back_rank, 4) || to.row != back_rank {
            return None;
        }

        let (allowed, rook_from, rook_to) = match to.col {
            6 => (
                match piece.color {
                    Color::White => self.castling.white_kingside,
                    Color::Black => self.castling.black_kingside,
                },
                Position::new(back_rank, 7),
                Position::new(back_rank, 5),
            ),
            2 => (
                match piece.color {
                    Color::White => self.castling.white_queenside,
                    Color::Black => self.castling.black_queenside,
                },
                Position::new(back_rank, 0),
                Position::new(back_rank, 3),
            ),
            _ => return None,
        };
        if !allowed {
            return None;
        }
        // Every square between king and rook must be empty.
        let step = (rook_from.col - from.col).signum();
        let mut square = from.offset(0, step);
        while square != rook_from {
            if self.grid.get(square).is_some() {
                return None;
            }
            square = square.offset(0, step);
        }
        let rook_present = matches!(
            self.grid.get(rook_from),
            Some(rook) if rook.kind == PieceKind::Rook && rook.color == piece.color
        );
        if !rook_present {
            return None;
        }
        if self.is_in_check(piece.color) {
            return None;
        }
        // The rook's destination is also the square the king crosses.
        if !self.king_safe_at(from, rook_to, piece.color) {
            return None;
        }

        Some(Command::Castle {
            king_from: from,
            king_to: to,
            rook_from,
            rook_to,
        })
    }

    /// A pawn stepping diagonally onto the en-passant target square captures
    /// the pawn that just double-stepped past it.
    fn en_passant_command(&self, piece: Piece, from: Position, to: Position) -> Option<Command> {
        if piece.kind != PieceKind::Pawn || self.en_passant != Some(to) {
            return None;
        }
        let dir = match piece.color {
            Color::White => 1,
            Color::Black => -1,
        };
        if to.row - from.row != dir || (to.col - from.col).abs() != 1 {
            return None;
        }
        let captured_square = Position::new(from.row, to.col);
        let mut victim = self.grid.get(captured_square)?;
        if victim.kind != PieceKind::Pawn || victim.color == piece.color {
            return None;
        }
        CaptureRule::for_target(&victim).apply(&mut victim);
        Some(Command::EnPassant {
            from,
            to,
            captured_square,
            captured: victim,
        })
    }

    /// Would the king be safe standing on `square`? Temporarily moves it
    /// there to ask.
    fn king_safe_at(&mut self, king_from: Position, square: Position, color: Color) -> bool {
        let saved = self.grid.get(square);
        let king = self.grid.get(king_from);
        self.grid.set(square, king);
        self.grid.set(king_from, None);
        let safe = !self.is_in_check(color);
        self.grid.set(king_from, king);
        self.grid.set(square, saved);
        safe
    }

    /// Castling rights and en-passant target after `piece` moves. A king
    /// move drops both of its side's rights; a rook leaving a corner, or a
    /// capture landing on one, drops that wing.
    fn next_flags(&self, piece: Piece, from: Position, to: Position) -> BoardFlags {
        let mut castling = self.castling;
        match (piece.kind, piece.color) {
            (PieceKind::King, Color::White) => {
                castling.white_kingside = false;
                castling.white_queenside = false;
            }
            (PieceKind::King, Color::Black) => {
                castling.black_kingside = false;
                castling.black_queenside = false;
            }
            (PieceKind::Rook, _) => match (from.row, from.col) {
                (0, 0) => castling.white_queenside = false,
                (0, 7) => castling.white_kingside = false,
                (7, 0) => castling.black_queenside = false,
                (7, 7) => castling.black_kingside = false,
                _ => {}
            },
            _ => {}
        }
        match (to.row, to.col) {
            (0, 0) => castling.white_queenside = false,
            (0, 7) => castling.white_kingside = false,
            (7, 0) => castling.black_queenside = false,
            (7, 7) => castling.black_kingside = false,
            _ => {}
        }

        let en_passant = if piece.kind == PieceKind::Pawn && (to.row - from.row).abs() == 2 {
            Some(Position::new((from.row + to.row) / 2, from.col))
        } else {
            None
        };

        BoardFlags {
            castling,
            en_passant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    fn place(board: &mut Board, row: i8, col: i8, kind: PieceKind, color: Color) {
        board
            .set_piece(pos(row, col), Some(Piece::new(kind, color)))
            .unwrap();
    }

    #[test]
    fn standard_start_has_twenty_legal_white_moves() {
        let mut board = Board::new();
        let mut legal = 0;
        for from_row in 0..8 {
            for from_col in 0..8 {
                for to_row in 0..8 {
                    for to_col in 0..8 {
                        let mut probe = Board::new();
                        if probe.try_move(pos(from_row, from_col), pos(to_row, to_col)) {
                            legal += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(legal, 20);
        assert!(!board.is_in_check(Color::White));
        assert!(board.has_any_legal_move(Color::White));
    }

    #[test]
    fn rejected_move_leaves_the_board_untouched() {
        let mut board = Board::new();
        let snapshot = board.snapshot();
        let turn = board.turn();

        // Wrong turn, empty origin, off-board, and geometric rejections.
        assert!(!board.try_move(pos(6, 4), pos(5, 4)));
        assert!(!board.try_move(pos(3, 3), pos(4, 3)));
        assert!(!board.try_move(pos(0, 0), pos(-1, 0)));
        assert!(!board.try_move(pos(0, 0), pos(4, 0)));

        assert_eq!(board.snapshot(), snapshot);
        assert_eq!(board.turn(), turn);
    }

    #[test]
    fn turn_alternates_through_move_undo_redo() {
        let mut board = Board::new();
        assert!(board.is_white_turn());
        assert!(board.try_move(pos(1, 4), pos(3, 4)));
        assert!(!board.is_white_turn());
        assert!(board.try_move(pos(6, 4), pos(4, 4)));
        assert!(board.is_white_turn());

        assert!(board.undo_move());
        assert!(!board.is_white_turn());
        assert!(board.redo_move());
        assert!(board.is_white_turn());
    }

    #[test]
    fn undo_restores_the_exact_position() {
        let mut board = Board::new();
        let start = board.snapshot();

        assert!(board.try_move(pos(1, 4), pos(3, 4)));
        assert!(board.try_move(pos(6, 3), pos(4, 3)));
        assert!(board.try_move(pos(3, 4), pos(4, 3)), "exd5");
        assert!(board.undo_move());
        assert!(board.undo_move());
        assert!(board.undo_move());

        assert_eq!(board.snapshot(), start);
        assert!(board.is_white_turn());
        assert_eq!(board.castling_rights(), CastlingRights::all());
    }

    #[test]
    fn redo_is_discarded_by_a_fresh_move() {
        let mut board = Board::new();
        assert!(board.try_move(pos(1, 4), pos(3, 4)));
        assert!(board.undo_move());
        assert!(board.can_redo());

        assert!(board.try_move(pos(1, 3), pos(3, 3)));
        assert!(!board.redo_move());
    }

    #[test]
    fn undo_and_redo_on_empty_stacks_are_no_ops() {
        let mut board = Board::new();
        assert!(!board.undo_move());
        assert!(!board.redo_move());
        assert!(board.is_white_turn());
    }

    #[test]
    fn set_piece_rejects_off_board_positions() {
        let mut board = Board::empty();
        let err = board
            .set_piece(pos(8, 0), Some(Piece::new(PieceKind::Pawn, Color::White)))
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidPosition { row: 8, col: 0 });
        assert_eq!(board.get_piece(pos(8, 0)), None);
        assert_eq!(board.get_piece(pos(-1, 3)), None);
    }

    #[test]
    fn move_piece_swaps_unconditionally_but_validates_bounds() {
        let mut board = Board::new();
        // An illegal chess move, but a legal grid edit.
        board.move_piece(pos(0, 0), pos(4, 4)).unwrap();
        assert_eq!(board.get_piece(pos(4, 4)).unwrap().kind, PieceKind::Rook);
        assert_eq!(board.get_piece(pos(0, 0)), None);

        assert!(board.move_piece(pos(0, 0), pos(8, 8)).is_err());
        assert!(board.move_piece(pos(-1, 0), pos(0, 0)).is_err());
    }

    #[test]
    fn snapshot_is_a_defensive_copy() {
        let board = Board::new();
        let mut snapshot = board.snapshot();
        snapshot[0][0] = None;
        assert!(board.get_piece(pos(0, 0)).is_some());
    }

    #[test]
    fn kingside_castle_moves_both_pieces_and_undoes_exactly() {
        let mut board = Board::new();
        // Clear f1 and g1.
        board.set_piece(pos(0, 5), None).unwrap();
        board.set_piece(pos(0, 6), None).unwrap();
        let before = board.snapshot();

        assert!(board.try_move(pos(0, 4), pos(0, 6)));
        assert_eq!(board.get_piece(pos(0, 6)).unwrap().kind, PieceKind::King);
        assert_eq!(board.get_piece(pos(0, 5)).unwrap().kind, PieceKind::Rook);
        assert_eq!(board.get_piece(pos(0, 4)), None);
        assert_eq!(board.get_piece(pos(0, 7)), None);
        assert!(!board.castling_rights().white_kingside);
        assert!(!board.castling_rights().white_queenside);

        assert!(board.undo_move());
        assert_eq!(board.snapshot(), before);
        assert!(board.castling_rights().white_kingside);
    }

    #[test]
    fn queenside_castle_works_on_a_clear_wing() {
        let mut board = Board::new();
        board.set_piece(pos(0, 1), None).unwrap();
        board.set_piece(pos(0, 2), None).unwrap();
        board.set_piece(pos(0, 3), None).unwrap();

        assert!(board.try_move(pos(0, 4), pos(0, 2)));
        assert_eq!(board.get_piece(pos(0, 2)).unwrap().kind, PieceKind::King);
        assert_eq!(board.get_piece(pos(0, 3)).unwrap().kind, PieceKind::Rook);
    }

    #[test]
    fn castle_refused_through_an_attacked_square() {
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::King, Color::White);
        place(&mut board, 0, 7, PieceKind::Rook, Color::White);
        place(&mut board, 7, 4, PieceKind::King, Color::Black);
        // Black rook covers f1, the square the king crosses.
        place(&mut board, 7, 5, PieceKind::Rook, Color::Black);
        board.castling.white_kingside = true;

        assert!(!board.try_move(pos(0, 4), pos(0, 6)));

        // Fine once nothing covers the crossing square.
        board.set_piece(pos(7, 5), None).unwrap();
        assert!(board.try_move(pos(0, 4), pos(0, 6)));
    }

    #[test]
    fn castle_refused_after_the_king_has_moved() {
        let mut board = Board::new();
        board.set_piece(pos(0, 5), None).unwrap();
        board.set_piece(pos(0, 6), None).unwrap();

        assert!(board.try_move(pos(0, 4), pos(0, 5))); // Kf1
        assert!(board.try_move(pos(6, 0), pos(5, 0)));
        assert!(board.try_move(pos(0, 5), pos(0, 4))); // back to e1
        assert!(board.try_move(pos(5, 0), pos(4, 0)));

        assert!(!board.try_move(pos(0, 4), pos(0, 6)));
    }

    #[test]
    fn en_passant_captures_the_bypassed_pawn_and_undo_revives_it() {
        let mut board = Board::new();
        assert!(board.try_move(pos(1, 4), pos(3, 4))); // e4
        assert!(board.try_move(pos(6, 0), pos(5, 0))); // a6
        assert!(board.try_move(pos(3, 4), pos(4, 4))); // e5
        assert!(board.try_move(pos(6, 3), pos(4, 3))); // d5, double step past e5
        assert_eq!(board.en_passant_target(), Some(pos(5, 3)));
        let before = board.snapshot();

        assert!(board.try_move(pos(4, 4), pos(5, 3)), "exd6 en passant");
        assert_eq!(board.get_piece(pos(5, 3)).unwrap().kind, PieceKind::Pawn);
        assert_eq!(board.get_piece(pos(4, 3)), None, "bypassed pawn removed");

        assert!(board.undo_move());
        assert_eq!(board.snapshot(), before);
        assert_eq!(board.en_passant_target(), Some(pos(5, 3)));
    }

    #[test]
    fn en_passant_window_closes_after_one_move() {
        let mut board = Board::new();
        assert!(board.try_move(pos(1, 4), pos(3, 4)));
        assert!(board.try_move(pos(6, 0), pos(5, 0)));
        assert!(board.try_move(pos(3, 4), pos(4, 4)));
        assert!(board.try_move(pos(6, 3), pos(4, 3)));

        // White declines the capture; the window is gone next turn.
        assert!(board.try_move(pos(1, 0), pos(2, 0)));
        assert!(board.try_move(pos(5, 0), pos(4, 0)));
        assert!(!board.try_move(pos(4, 4), pos(5, 3)));
    }

    #[test]
    fn promotion_replaces_the_pawn_and_undo_restores_it() {
        let mut board = Board::empty();
        place(&mut board, 6, 0, PieceKind::Pawn, Color::White);
        place(&mut board, 0, 4, PieceKind::King, Color::White);
        place(&mut board, 7, 7, PieceKind::King, Color::Black);
        let before = board.snapshot();

        assert!(board.try_move(pos(6, 0), pos(7, 0)));
        let promoted = board.get_piece(pos(7, 0)).unwrap();
        assert_eq!(promoted.kind, PieceKind::Queen);
        assert_eq!(promoted.color, Color::White);

        assert!(board.undo_move());
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn promotion_honors_the_chosen_kind_and_rejects_absurd_ones() {
        let mut board = Board::empty();
        place(&mut board, 6, 0, PieceKind::Pawn, Color::White);
        place(&mut board, 0, 4, PieceKind::King, Color::White);
        place(&mut board, 7, 7, PieceKind::King, Color::Black);

        assert!(!board.try_move_promoting(pos(6, 0), pos(7, 0), PieceKind::King));
        assert!(!board.try_move_promoting(pos(6, 0), pos(7, 0), PieceKind::Pawn));
        assert!(board.try_move_promoting(pos(6, 0), pos(7, 0), PieceKind::Knight));
        assert_eq!(board.get_piece(pos(7, 0)).unwrap().kind, PieceKind::Knight);
    }

    #[test]
    fn a_pinned_piece_may_not_expose_its_king() {
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::King, Color::White);
        place(&mut board, 1, 4, PieceKind::Rook, Color::White);
        place(&mut board, 7, 4, PieceKind::Rook, Color::Black);
        place(&mut board, 7, 7, PieceKind::King, Color::Black);

        // Pinned to the e-file: sideways is illegal, along the pin is fine.
        assert!(!board.try_move(pos(1, 4), pos(1, 0)));
        assert!(board.try_move(pos(1, 4), pos(5, 4)));
    }

    #[test]
    fn rook_slide_delivers_check() {
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::King, Color::White);
        place(&mut board, 7, 7, PieceKind::King, Color::Black);
        place(&mut board, 7, 4, PieceKind::Rook, Color::Black);
        board.turn = Color::Black;

        assert!(!board.is_in_check(Color::White));
        assert!(board.try_move(pos(7, 4), pos(1, 4)));
        assert!(board.is_in_check(Color::White));
    }

    #[test]
    fn legal_moves_from_lists_opening_knight_jumps() {
        let mut board = Board::new();
        let moves = board.legal_moves_from(pos(0, 1));
        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&pos(2, 0)));
        assert!(moves.contains(&pos(2, 2)));

        // A blocked bishop and an empty square have nowhere to go.
        assert!(board.legal_moves_from(pos(0, 2)).is_empty());
        assert!(board.legal_moves_from(pos(4, 4)).is_empty());
    }

    #[test]
    fn legal_moves_include_the_castling_destination() {
        let mut board = Board::new();
        board.set_piece(pos(0, 5), None).unwrap();
        board.set_piece(pos(0, 6), None).unwrap();

        let moves = board.legal_moves_from(pos(0, 4));
        assert!(moves.contains(&pos(0, 6)));
        assert!(moves.contains(&pos(0, 5)));
    }
}
