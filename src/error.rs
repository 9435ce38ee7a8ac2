//! Error types for board manipulation, game flow and configuration

use std::path::PathBuf;

use crate::difficulty::Difficulty;
use crate::game::GameStatus;

/// A rejected piece placement. The board is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("column {column} out of range, columns must be between 0 and {}", .columns - 1)]
    ColumnOutOfRange { column: usize, columns: usize },
}

/// Errors surfaced to whoever drives a [`GameSession`](crate::game::GameSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("the game is over ({status})")]
    GameOver { status: GameStatus },

    #[error("the AI is still choosing its move")]
    AiMovePending,

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Errors raised when parsing a board picture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout has {rows} rows and {columns} columns, both must be at least {min}")]
    TooSmall {
        rows: usize,
        columns: usize,
        min: usize,
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("could not parse '{0}' as a cell")]
    UnknownCell(char),

    #[error("piece at row {row}, column {col} has nothing underneath it")]
    FloatingPiece { row: usize, col: usize },
}

/// An unusable set of search parameters.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("depth must be at least 1")]
    ZeroDepth,

    #[error("noise must be between 0 and 1, got {0}")]
    NoiseOutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}', expected easy, medium or hard")]
pub struct ParseDifficultyError(pub String);

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("config validation error: profiles.{difficulty}: {source}")]
    Profile {
        difficulty: Difficulty,
        source: ProfileError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_error_display() {
        assert_eq!(
            MoveError::ColumnFull { column: 3 }.to_string(),
            "column 3 is full"
        );
        assert_eq!(
            MoveError::ColumnOutOfRange {
                column: 9,
                columns: 7
            }
            .to_string(),
            "column 9 out of range, columns must be between 0 and 6"
        );
    }

    #[test]
    fn game_error_wraps_move_error() {
        let err: GameError = MoveError::ColumnFull { column: 0 }.into();
        assert_eq!(err, GameError::Move(MoveError::ColumnFull { column: 0 }));
        assert_eq!(err.to_string(), "column 0 is full");
    }

    #[test]
    fn profile_error_display() {
        assert_eq!(ProfileError::ZeroDepth.to_string(), "depth must be at least 1");
        let err = ConfigError::Profile {
            difficulty: Difficulty::Hard,
            source: ProfileError::NoiseOutOfRange(1.5),
        };
        assert_eq!(
            err.to_string(),
            "config validation error: profiles.hard: noise must be between 0 and 1, got 1.5"
        );
    }

    #[test]
    fn game_over_display() {
        let err = GameError::GameOver {
            status: GameStatus::PlayerWon,
        };
        assert_eq!(err.to_string(), "the game is over (player won)");
    }
}
