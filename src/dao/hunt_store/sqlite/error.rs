//! Error types shared by the SQLite storage implementation.

use rusqlite::ErrorCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`SqliteDaoError`] failures.
pub type SqliteResult<T> = Result<T, SqliteDaoError>;

/// Failures that can occur while interacting with SQLite.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// The database file could not be opened or created.
    #[error("failed to open SQLite database `{path}`")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A connection pragma was rejected.
    #[error("failed to set SQLite pragma `{pragma}`")]
    Pragma {
        pragma: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the tables failed.
    #[error("failed to apply SQLite schema")]
    Schema {
        #[source]
        source: rusqlite::Error,
    },
    /// `BEGIN` failed, usually because the database is locked.
    #[error("failed to begin transaction")]
    Begin {
        #[source]
        source: rusqlite::Error,
    },
    /// `COMMIT` failed.
    #[error("failed to commit transaction")]
    Commit {
        #[source]
        source: rusqlite::Error,
    },
    /// `ROLLBACK` failed.
    #[error("failed to roll back transaction")]
    Rollback {
        #[source]
        source: rusqlite::Error,
    },
    /// Reading a user row failed.
    #[error("failed to load user {id}")]
    LoadUser {
        id: i64,
        #[source]
        source: rusqlite::Error,
    },
    /// Upserting a user row failed, possibly on a constraint.
    #[error("failed to save user {id}")]
    SaveUser {
        id: i64,
        #[source]
        source: rusqlite::Error,
    },
    /// Reading the team list failed.
    #[error("failed to list teams")]
    ListTeams {
        #[source]
        source: rusqlite::Error,
    },
    /// Usually a duplicate name.
    #[error("unable to create team `{name}`, the name may already exist")]
    CreateTeam {
        name: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Reading a team by id or name failed.
    #[error("failed to load team `{key}`")]
    LoadTeam {
        key: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl SqliteDaoError {
    fn is_constraint_violation(&self) -> bool {
        let source = match self {
            SqliteDaoError::SaveUser { source, .. } | SqliteDaoError::CreateTeam { source, .. } => {
                source
            }
            _ => return false,
        };
        source.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
    }
}

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        if err.is_constraint_violation() {
            StorageError::conflict(err.to_string(), err)
        } else {
            StorageError::unavailable(err.to_string(), err)
        }
    }
}
