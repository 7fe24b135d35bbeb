//! Sokoban level engine.
//! - Cell symbols and the centered, fixed-size grid
//! - Level state machine: moves, pushes, take-back and repeat
//! - Level collections with playable-aware navigation
//! - XSB collection loading and TOML configuration

pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod level;
pub mod levels_set;
pub mod loader;
pub mod moves;

pub use cell::Cell;
pub use config::EngineConfig;
pub use error::{
    ConfigError, HistoryRangeError, InitializeError, InvalidMoveRequest, LoadError,
    NavigationError,
};
pub use grid::{Grid, Position, Size};
pub use level::{Level, LevelState, LevelView};
pub use levels_set::LevelsSet;
pub use loader::LevelDefinition;
pub use moves::{Direction, MoveInformation, MoveIntent, MoveType, WorkerDirection};
