//! Engine error type.
//!
//! Game-rule failures (illegal move, empty undo stack) are reported as
//! boolean returns, never as errors. The error type exists for
//! caller-contract violations, which should fail loudly.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum EngineError {
    /// An off-board position was passed to a board mutator.
    #[error("position ({row}, {col}) is outside the board")]
    InvalidPosition { row: i8, col: i8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_position_names_the_coordinates() {
        let err = EngineError::InvalidPosition { row: 9, col: -1 };
        assert_eq!(err.to_string(), "position (9, -1) is outside the board");
    }
}
