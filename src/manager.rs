//! Game session orchestration: terminal-state detection, the move log, and
//! change notifications for the presentation layer.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::capture::CaptureRule;
use crate::game::Game;
use crate::log::{MoveInfo, MoveLog};
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Winner {
    None,
    White,
    Black,
    Draw,
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

/// Outcome of a session. Written once by the first terminal condition and
/// frozen until a new game starts or an undo steps back past it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct GameResult {
    pub over: bool,
    pub winner: Winner,
    pub reason: String,
}

impl Default for GameResult {
    fn default() -> Self {
        GameResult {
            over: false,
            winner: Winner::None,
            reason: String::new(),
        }
    }
}

/// Synchronous change notifications, delivered to observers before the
/// mutating call returns.
#[derive(Clone, PartialEq, Debug)]
pub enum GameEvent {
    TurnChanged,
    BoardChanged,
    MoveAdded(MoveInfo),
    MoveUndone,
    MoveRedone,
    GameEnded(GameResult),
}

type Observer = Box<dyn FnMut(&GameEvent)>;

/// Orchestrates one game session for a UI collaborator: validates moves
/// through the board, keeps the move log, re-evaluates terminal conditions
/// after every change, and raises notifications.
pub struct GameManager {
    game: Game,
    log: MoveLog,
    result: GameResult,
    observers: Vec<Observer>,
}

impl Default for GameManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GameManager {
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    /// A session over a custom position, e.g. a puzzle setup.
    pub fn with_board(board: Board) -> Self {
        GameManager {
            game: Game::with_board(board),
            log: MoveLog::new(),
            result: GameResult::default(),
            observers: Vec::new(),
        }
    }

    /// Register a change observer. Observers are invoked synchronously, in
    /// registration order, before the mutating call returns.
    pub fn subscribe(&mut self, observer: impl FnMut(&GameEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    pub fn board_snapshot(&self) -> [[Option<Piece>; 8]; 8] {
        self.game.board().snapshot()
    }

    pub fn is_white_turn(&self) -> bool {
        self.game.is_white_turn()
    }

    pub fn result(&self) -> &GameResult {
        &self.result
    }

    /// The executed moves up to the current point, oldest first.
    pub fn move_history(&self) -> &[MoveInfo] {
        self.log.moves()
    }

    /// Destination hints for the piece on `pos`.
    pub fn legal_moves_from(&mut self, pos: Position) -> Vec<Position> {
        self.game.board_mut().legal_moves_from(pos)
    }

    /// Attempt a move for the side to move; auto-queens on promotion.
    pub fn try_move(&mut self, from: Position, to: Position) -> bool {
        self.try_move_promoting(from, to, PieceKind::Queen)
    }

    pub fn try_move_promoting(
        &mut self,
        from: Position,
        to: Position,
        promotion: PieceKind,
    ) -> bool {
        if self.result.over {
            return false;
        }
        let Some(piece) = self.game.board().get_piece(from) else {
            return false;
        };
        let target = self.game.board().get_piece(to);
        let en_passant = piece.kind == PieceKind::Pawn
            && target.is_none()
            && from.col != to.col
            && self.game.board().en_passant_target() == Some(to);

        if !self.game.try_move_promoting(from, to, promotion) {
            return false;
        }

        let move_info = MoveInfo {
            from,
            to,
            kind: piece.kind,
            color: piece.color,
            capture: target.is_some() || en_passant,
        };
        debug!(%move_info, "move applied");
        self.log.push(move_info);
        self.emit(GameEvent::MoveAdded(move_info));
        self.emit(GameEvent::BoardChanged);
        self.emit(GameEvent::TurnChanged);

        if let Some(victim) = target {
            if let Some(winner) = CaptureRule::for_target(&victim).terminates(piece.color) {
                self.end_by_king_capture(winner);
                return true;
            }
        }
        self.evaluate_terminal();
        true
    }

    /// Take back the last move. Stepping back past a terminal move reopens
    /// the result.
    pub fn undo_last_move(&mut self) -> bool {
        if !self.game.undo_move() {
            return false;
        }
        self.log.rewind();
        if self.result.over {
            self.result = GameResult::default();
        }
        debug!("move undone");
        self.emit(GameEvent::MoveUndone);
        self.emit(GameEvent::BoardChanged);
        self.emit(GameEvent::TurnChanged);
        true
    }

    /// Replay the last undone move, re-evaluating terminal conditions.
    pub fn redo_last_move(&mut self) -> bool {
        if !self.game.redo_move() {
            return false;
        }
        if let Some(move_info) = self.log.replay() {
            debug!(%move_info, "move redone");
        }
        self.emit(GameEvent::MoveRedone);
        self.emit(GameEvent::BoardChanged);
        self.emit(GameEvent::TurnChanged);
        self.evaluate_terminal();
        true
    }

    /// Start a fresh game on the standard opening position.
    pub fn reset(&mut self) {
        self.game.reset();
        self.log.clear();
        self.result = GameResult::default();
        self.emit(GameEvent::BoardChanged);
        self.emit(GameEvent::TurnChanged);
    }

    /// Terminal sink for the king-capture rule. First writer wins.
    pub fn end_by_king_capture(&mut self, winner: Color) {
        self.finish(winner.into(), "King Captured");
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.game.board().is_in_check(color)
    }

    pub fn is_in_checkmate(&mut self, color: Color) -> bool {
        self.game.board().is_in_check(color) && !self.game.board_mut().has_any_legal_move(color)
    }

    pub fn is_in_stalemate(&mut self, color: Color) -> bool {
        !self.game.board().is_in_check(color) && !self.game.board_mut().has_any_legal_move(color)
    }

    /// Draw by material: bare kings, or a bare king against king plus a
    /// single minor piece.
    pub fn has_insufficient_material(&self) -> bool {
        let mut white = Vec::new();
        let mut black = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                if let Some(piece) = self.game.board().get_piece(Position::new(row, col)) {
                    match piece.color {
                        Color::White => white.push(piece.kind),
                        Color::Black => black.push(piece.kind),
                    }
                }
            }
        }
        let king_and_minor = |kinds: &[PieceKind]| {
            kinds.len() == 2
                && kinds
                    .iter()
                    .any(|kind| matches!(kind, PieceKind::Bishop | PieceKind::Knight))
        };
        if white.len() == 1 && black.len() == 1 {
            return true;
        }
        (white.len() == 1 && king_and_minor(&black)) || (black.len() == 1 && king_and_minor(&white))
    }

    /// Fixed evaluation order for the side to move next: checkmate, then
    /// stalemate, then insufficient material. The first hit freezes the
    /// result.
    fn evaluate_terminal(&mut self) {
        if self.result.over {
            return;
        }
        let next = self.game.board().turn();
        if self.is_in_checkmate(next) {
            self.finish(next.opponent().into(), "Checkmate");
        } else if self.is_in_stalemate(next) {
            self.finish(Winner::Draw, "Stalemate");
        } else if self.has_insufficient_material() {
            self.finish(Winner::Draw, "Insufficient Material");
        }
    }

    fn finish(&mut self, winner: Winner, reason: &str) {
        if self.result.over {
            return;
        }
        self.result = GameResult {
            over: true,
            winner,
            reason: reason.to_string(),
        };
        info!(?winner, reason, "game over");
        self.emit(GameEvent::GameEnded(self.result.clone()));
    }
}
