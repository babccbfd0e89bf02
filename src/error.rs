//! Service-level error type.

use thiserror::Error;

use crate::dao::storage::StorageError;

/// Unexpected failures while handling a message.
///
/// Expected outcomes such as an unknown team or a too-short name are replies, not
/// errors. Anything that reaches this type rolls back the message's transaction.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend rejected or failed an operation.
    #[error("{0}")]
    Storage(#[from] StorageError),
    /// Persisted rows contradict each other.
    #[error("data integrity violated: {0}")]
    Integrity(String),
}

impl ServiceError {
    /// Text embedded in the apology sent back to the chat.
    ///
    /// Includes the source chain so operators can diagnose the failure from the
    /// user's screenshot. Causes already spelled out by an outer layer are skipped.
    pub fn diagnostic(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !text.contains(&cause_text) {
                text.push_str(": ");
                text.push_str(&cause_text);
            }
            source = cause.source();
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("UNIQUE constraint failed: teams.name")]
    struct Backend;

    #[test]
    fn diagnostic_walks_the_source_chain() {
        let err = ServiceError::from(StorageError::conflict(
            "unable to create team `Foxes`".into(),
            Backend,
        ));
        assert_eq!(
            err.diagnostic(),
            "constraint violated: unable to create team `Foxes`: UNIQUE constraint failed: teams.name"
        );
    }
}
