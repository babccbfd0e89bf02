/// SQLite backend.
pub mod sqlite;

use crate::dao::models::{NewTeam, TeamEntity, UserEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the relational store holding users and teams.
///
/// Every inbound message is handled inside exactly one transaction obtained from
/// [`HuntStore::begin`]. Calls are synchronous: a slow database blocks the message
/// loop, which is the only backpressure the bot applies.
pub trait HuntStore: Send {
    /// Open a new transaction. Dropping the handle without committing rolls it back.
    fn begin(&mut self) -> StorageResult<Box<dyn HuntTransaction + '_>>;
}

/// Typed CRUD operations scoped to one open transaction.
///
/// Lookups report an absent row as `Ok(None)`; only backend failures are errors.
pub trait HuntTransaction {
    /// Load a user by platform id.
    fn get_user(&self, id: i64) -> StorageResult<Option<UserEntity>>;
    /// Insert or fully overwrite the user row keyed by its id.
    fn save_user(&self, user: &UserEntity) -> StorageResult<()>;
    /// All teams ordered by name ascending.
    fn list_teams(&self) -> StorageResult<Vec<TeamEntity>>;
    /// Insert a team, failing with a conflict when the name is already taken.
    fn create_team(&self, team: NewTeam) -> StorageResult<TeamEntity>;
    /// Load a team by database id.
    fn get_team_by_id(&self, id: i64) -> StorageResult<Option<TeamEntity>>;
    /// Exact, case-sensitive name match.
    fn get_team_by_name(&self, name: &str) -> StorageResult<Option<TeamEntity>>;
    /// Make every write durable and close the transaction.
    fn commit(self: Box<Self>) -> StorageResult<()>;
    /// Discard every write and close the transaction.
    fn rollback(self: Box<Self>) -> StorageResult<()>;
}
