// src/error.rs

//! Error types for mirrorctl
//!
//! Every failure of the edit workflow maps to one of the kinds below. The
//! orchestrator wraps whatever stopped it in [`Error::Edit`], so callers see a
//! stable `unable to edit: ...` prefix while still being able to match on the
//! underlying kind through [`Error::cause_kind`].

use thiserror::Error;

/// Result type for mirrorctl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Registry searched when resolving a symbolic reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Local repositories
    LocalRepo,
    /// Remote mirrors
    Mirror,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::LocalRepo => write!(f, "local repo"),
            ReferenceKind::Mirror => write!(f, "mirror"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Named entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Another writer currently holds the entity
    #[error("{0}")]
    LockContention(String),

    /// A reference list named an entity that does not exist
    #[error("{kind} with name {name} not found")]
    UnknownReference { kind: ReferenceKind, name: String },

    /// Filter expression failed to parse
    #[error("invalid filter '{filter}': {diagnostic}")]
    InvalidFilter { filter: String, diagnostic: String },

    /// Candidate entity violates an invariant
    #[error("{0}")]
    InvariantViolation(String),

    /// Index refresh against the remote archive failed
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Persisting the entity failed
    #[error("store error: {0}")]
    Store(String),

    /// Entity with the same name already exists
    #[error("{0}")]
    Conflict(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON (de)serialization of stored columns failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A mirror edit failed; wraps the cause verbatim
    #[error("unable to edit: {0}")]
    Edit(Box<Error>),
}

impl Error {
    /// Wrap an error as an edit failure, leaving already-wrapped errors alone
    pub fn edit(cause: Error) -> Self {
        match cause {
            Error::Edit(_) => cause,
            other => Error::Edit(Box::new(other)),
        }
    }

    /// The error underneath any `Edit` wrapper
    pub fn cause_kind(&self) -> &Error {
        match self {
            Error::Edit(inner) => inner.cause_kind(),
            other => other,
        }
    }
}
