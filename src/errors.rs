use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the trainer sheet engine
#[derive(Debug, Error)]
pub enum SheetError {
    /// Error related to loading a rule table
    #[error("Rule data error: {0}")]
    RuleData(#[from] RuleDataError),
    /// Error related to restoring a saved or imported sheet
    #[error("Restore error: {0}")]
    Restore(#[from] RestoreError),
    /// Error related to editing a signature move
    #[error("Signature override error: {0}")]
    Override(#[from] OverrideError),
    /// Party slot outside 1..=4
    #[error("Invalid party slot: {0}")]
    InvalidSlot(usize),
    /// Move slot index outside the slot's move list
    #[error("Invalid move index: {0}")]
    InvalidMoveIndex(usize),
    /// Trainer role selector outside 1..=4
    #[error("Invalid role selector: {0}")]
    InvalidRoleSelector(usize),
    /// Save file or export could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode sheet: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors related to reading the static rule tables
#[derive(Debug, Error)]
pub enum RuleDataError {
    /// Neither a JSON nor a RON file exists for the table
    #[error("No rule table named '{table}' in {}", dir.display())]
    TableNotFound { table: String, dir: PathBuf },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed RON in {}: {source}", path.display())]
    Ron {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Errors that abort a restore. The sheet keeps its previous state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestoreError {
    #[error("Payload is not an object")]
    NotAnObject,
    #[error("Payload has no schema version")]
    MissingVersion,
    #[error("Unsupported schema version {found} (expected {expected})")]
    VersionMismatch { found: String, expected: u32 },
    #[error("Payload is missing the '{0}' section")]
    MissingSection(&'static str),
    #[error("Export envelope has format '{0}'")]
    ForeignFormat(String),
    #[error("Export envelope has unsupported version {0}")]
    ForeignFormatVersion(String),
    #[error("Payload is not valid JSON: {0}")]
    Parse(String),
}

/// Errors raised while editing signature move overrides
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverrideError {
    #[error("Unknown signature override key '{0}'")]
    UnknownKey(String),
    #[error("Signature override '{key}' expects {expected}")]
    ValueMismatch { key: String, expected: &'static str },
}

/// Type alias for Results using SheetError
pub type SheetResult<T> = Result<T, SheetError>;

/// Type alias for Results using RuleDataError
pub type RuleDataResult<T> = Result<T, RuleDataError>;

/// Type alias for Results using RestoreError
pub type RestoreResult<T> = Result<T, RestoreError>;

/// Type alias for Results using OverrideError
pub type OverrideResult<T> = Result<T, OverrideError>;
