use crate::grid::Size;
use std::io;
use std::path::PathBuf;

/// A move request that is not a single-axis unit step.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid move request ({dx}, {dy}): moves must be one cell along one axis")]
pub struct InvalidMoveRequest {
    pub dx: i32,
    pub dy: i32,
}

/// Why `initialize` left a level unplayable.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InitializeError {
    #[error("level is empty")]
    EmptyLevel,
    #[error("level size {content} exceeds maximum {maximal}")]
    OutOfBounds { content: Size, maximal: Size },
    #[error("level has {boxes} boxes but {goals} goals")]
    BoxesGoalsMismatch { boxes: usize, goals: usize },
    #[error("level has {0} workers, expected exactly one")]
    WorkerCount(usize),
    #[error("level was never initialized")]
    NeverInitialized,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRangeError {
    #[error("level is not playable")]
    NotPlayable,
    #[error("requested {requested} steps but only {available} are available")]
    OutOfRange { requested: usize, available: usize },
    /// A stored move stopped fitting the board when the moves count was
    /// `reached`. Nothing was changed.
    #[error("history does not match the board at move {reached}")]
    Inconsistent { reached: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("levels set is empty")]
    EmptySet,
    #[error("levels set contains no playable level")]
    NoPlayableLevels,
    #[error("level index {index} out of range (set contains {len} levels)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("could not read levels file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("maximal size {0} must be at least 1x1")]
    InvalidSize(Size),
}
