//! Caller-facing error types.
//!
//! Internal fallible operations keep the teacher's local-enum-plus-`?`
//! style (see `dijkstra`, `levelgen`); `thiserror` is reserved for the
//! errors that cross an external boundary — the CLI, recording
//! playback, and config loading — where a `Display` impl a human or a
//! log line actually reads is worth the derive.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("no creature occupies the acting position")]
    NoActor,
    #[error("target is not adjacent to the actor")]
    NotAdjacent,
    #[error("target cell is blocked")]
    Blocked,
    #[error("actor is incapacitated and cannot act")]
    Incapacitated,
    #[error("inventory slot '{0}' is empty")]
    EmptySlot(char),
    #[error("item at slot '{0}' cannot be used this way")]
    WrongCategory(char),
    #[error("item has no charges remaining")]
    NoCharges,
    #[error("charm is still recharging ({0} ticks left)")]
    Recharging(i32),
}

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("recording header is truncated: need {needed} bytes, found {found}")]
    TruncatedHeader { needed: usize, found: usize },
    #[error("unsupported recording version {0:?}")]
    UnsupportedVersion(String),
    #[error("recording buffer exceeded its maximum size, byte dropped")]
    BufferFull,
    #[error("playback diverged from the recorded event stream at offset {0}")]
    OutOfSync(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
