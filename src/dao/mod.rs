//! Persistence: backend-neutral errors, row models, and the transactional store.

/// Transactional persistence of users and teams.
pub mod hunt_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
