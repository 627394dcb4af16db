use thiserror::Error;

/// Errors that can arise while building or persisting the game world.
///
/// Gameplay failures (unknown target, ambiguous exit, combat lock) are not
/// errors; they are reported to the acting player and carried as
/// [`Rejection`](crate::mud::dispatch::Rejection) values.
#[derive(Debug, Error)]
pub enum MudError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, seed files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// World seed JSON could not be parsed.
    #[error("seed parse error: {0}")]
    Seed(#[from] serde_json::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// An alias was pointed at a command name that is not registered.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// An alias tried to take a name already owned by a canonical command.
    #[error("command name already registered: {0}")]
    DuplicateCommand(String),

    /// A player name is already bound to an online session.
    #[error("player already online: {0}")]
    AlreadyOnline(String),

    /// Internal error (task join errors, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}
