//! Error types.
//!
//! Asset errors are fatal: they bubble up through the state handlers to
//! `main`, which logs them and exits. Save and item errors are recoverable
//! and are usually logged and swallowed at the call site.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading or validating game assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("sprite sheet '{sheet}' has no animation named '{animation}'")]
    MissingAnimation { sheet: String, animation: String },

    #[error("animation '{animation}' has no frames")]
    EmptyAnimation { animation: String },

    #[error("layers of animation '{animation}' disagree: {detail}")]
    LayerMismatch { animation: String, detail: String },

    #[error("no tileset contains gid {gid}")]
    UnknownTileset { gid: u32 },

    #[error("map '{0}' is not available")]
    MissingMap(String),
}

/// Failure while writing or reading a saved game.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode save data: {0}")]
    Encode(String),

    #[error("failed to decode save data: {0}")]
    Decode(String),

    #[error("no saved games in {0}")]
    NoSaves(PathBuf),
}

/// Failure while rebuilding an item from its saved record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("unknown item kind '{0}'")]
    UnknownKind(String),

    #[error("item '{kind}' is missing field '{field}'")]
    MissingField { kind: String, field: String },

    #[error("item '{kind}' has an invalid value for '{field}'")]
    InvalidField { kind: String, field: String },
}

/// Errors that abort the main loop.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Asset(#[from] AssetError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
