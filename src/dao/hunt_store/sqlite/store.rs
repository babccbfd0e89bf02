use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, Transaction, named_params};
use tracing::info;

use crate::dao::{
    hunt_store::{HuntStore, HuntTransaction},
    models::{NewTeam, TeamEntity, UserEntity},
    storage::StorageResult,
};

use super::{
    error::{SqliteDaoError, SqliteResult},
    schema,
};

/// SQLite-backed store owning a single connection.
pub struct SqliteHuntStore {
    conn: Connection,
}

impl SqliteHuntStore {
    /// Open (or create) the database file at `path` and bootstrap the schema.
    pub fn open(path: &Path) -> SqliteResult<Self> {
        let conn = Connection::open(path).map_err(|source| SqliteDaoError::Open {
            path: path.display().to_string(),
            source,
        })?;

        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(|source| SqliteDaoError::Pragma {
                pragma: "journal_mode",
                source,
            })?;

        let store = Self::from_connection(conn)?;
        info!(path = %path.display(), "SQLite database opened");
        Ok(store)
    }

    /// Open a private in-memory database, mostly useful for tests.
    pub fn open_in_memory() -> SqliteResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| SqliteDaoError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> SqliteResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|source| SqliteDaoError::Pragma {
                pragma: "foreign_keys",
                source,
            })?;
        schema::apply(&conn)?;
        Ok(Self { conn })
    }
}

impl HuntStore for SqliteHuntStore {
    fn begin(&mut self) -> StorageResult<Box<dyn HuntTransaction + '_>> {
        let tx = self
            .conn
            .transaction()
            .map_err(|source| SqliteDaoError::Begin { source })?;
        Ok(Box::new(SqliteHuntTransaction { tx }))
    }
}

struct SqliteHuntTransaction<'conn> {
    tx: Transaction<'conn>,
}

impl HuntTransaction for SqliteHuntTransaction<'_> {
    fn get_user(&self, id: i64) -> StorageResult<Option<UserEntity>> {
        let user = self
            .tx
            .query_row(
                "SELECT id, user_name, first_name, admin, team_id FROM users WHERE id = ?1",
                [id],
                user_from_row,
            )
            .optional()
            .map_err(|source| SqliteDaoError::LoadUser { id, source })?;
        Ok(user)
    }

    fn save_user(&self, user: &UserEntity) -> StorageResult<()> {
        self.tx
            .execute(
                "INSERT INTO users (id, user_name, first_name, team_id, admin)
                 VALUES (:id, :user_name, :first_name, :team_id, :admin)
                 ON CONFLICT (id) DO UPDATE SET
                    user_name = excluded.user_name,
                    first_name = excluded.first_name,
                    team_id = excluded.team_id,
                    admin = excluded.admin",
                named_params! {
                    ":id": user.id,
                    ":user_name": user.user_name,
                    ":first_name": user.first_name,
                    ":team_id": user.team_id,
                    ":admin": user.admin,
                },
            )
            .map_err(|source| SqliteDaoError::SaveUser {
                id: user.id,
                source,
            })?;
        Ok(())
    }

    fn list_teams(&self) -> StorageResult<Vec<TeamEntity>> {
        let query = || -> rusqlite::Result<Vec<TeamEntity>> {
            let mut stmt = self
                .tx
                .prepare("SELECT id, name FROM teams ORDER BY name")?;
            let rows = stmt.query_map([], team_from_row)?;
            rows.collect()
        };

        let teams = query().map_err(|source| SqliteDaoError::ListTeams { source })?;
        Ok(teams)
    }

    fn create_team(&self, team: NewTeam) -> StorageResult<TeamEntity> {
        let created = self
            .tx
            .query_row(
                "INSERT INTO teams (name) VALUES (?1) RETURNING id, name",
                [&team.name],
                team_from_row,
            )
            .map_err(|source| SqliteDaoError::CreateTeam {
                name: team.name.clone(),
                source,
            })?;
        Ok(created)
    }

    fn get_team_by_id(&self, id: i64) -> StorageResult<Option<TeamEntity>> {
        let team = self
            .tx
            .query_row(
                "SELECT id, name FROM teams WHERE id = ?1",
                [id],
                team_from_row,
            )
            .optional()
            .map_err(|source| SqliteDaoError::LoadTeam {
                key: id.to_string(),
                source,
            })?;
        Ok(team)
    }

    fn get_team_by_name(&self, name: &str) -> StorageResult<Option<TeamEntity>> {
        let team = self
            .tx
            .query_row(
                "SELECT id, name FROM teams WHERE name = ?1",
                [name],
                team_from_row,
            )
            .optional()
            .map_err(|source| SqliteDaoError::LoadTeam {
                key: name.to_string(),
                source,
            })?;
        Ok(team)
    }

    fn commit(self: Box<Self>) -> StorageResult<()> {
        let Self { tx } = *self;
        tx.commit()
            .map_err(|source| SqliteDaoError::Commit { source })?;
        Ok(())
    }

    fn rollback(self: Box<Self>) -> StorageResult<()> {
        let Self { tx } = *self;
        tx.rollback()
            .map_err(|source| SqliteDaoError::Rollback { source })?;
        Ok(())
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserEntity> {
    Ok(UserEntity {
        id: row.get("id")?,
        user_name: row.get("user_name")?,
        first_name: row.get("first_name")?,
        admin: row.get("admin")?,
        team_id: row.get("team_id")?,
    })
}

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<TeamEntity> {
    Ok(TeamEntity {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::storage::StorageError;

    fn user(id: i64, name: &str) -> UserEntity {
        UserEntity {
            id,
            user_name: Some(format!("{}_handle", name.to_lowercase())),
            first_name: name.into(),
            admin: false,
            team_id: None,
        }
    }

    fn new_team(name: &str) -> NewTeam {
        NewTeam { name: name.into() }
    }

    #[test]
    fn missing_rows_are_none() {
        let mut store = SqliteHuntStore::open_in_memory().unwrap();
        let tx = store.begin().unwrap();

        assert_eq!(tx.get_user(42).unwrap(), None);
        assert_eq!(tx.get_team_by_id(1).unwrap(), None);
        assert_eq!(tx.get_team_by_name("Foxes").unwrap(), None);
    }

    #[test]
    fn save_user_overwrites_the_whole_row() {
        let mut store = SqliteHuntStore::open_in_memory().unwrap();
        let tx = store.begin().unwrap();
        let team = tx.create_team(new_team("Foxes")).unwrap();

        let mut alice = user(7, "Alice");
        alice.admin = true;
        alice.team_id = Some(team.id);
        tx.save_user(&alice).unwrap();

        let replacement = UserEntity {
            id: 7,
            user_name: None,
            first_name: "Alicia".into(),
            admin: false,
            team_id: None,
        };
        tx.save_user(&replacement).unwrap();

        assert_eq!(tx.get_user(7).unwrap(), Some(replacement));
    }

    #[test]
    fn teams_are_listed_by_name() {
        let mut store = SqliteHuntStore::open_in_memory().unwrap();
        let tx = store.begin().unwrap();
        for name in ["Wolves", "Badgers", "Foxes"] {
            tx.create_team(new_team(name)).unwrap();
        }

        let names: Vec<String> = tx
            .list_teams()
            .unwrap()
            .into_iter()
            .map(|team| team.name)
            .collect();
        assert_eq!(names, ["Badgers", "Foxes", "Wolves"]);
    }

    #[test]
    fn duplicate_team_name_is_a_conflict() {
        let mut store = SqliteHuntStore::open_in_memory().unwrap();
        let tx = store.begin().unwrap();
        tx.create_team(new_team("Foxes")).unwrap();

        let err = tx.create_team(new_team("Foxes")).unwrap_err();
        assert!(matches!(err, StorageError::Conflict { .. }), "{err:?}");
        assert_eq!(tx.list_teams().unwrap().len(), 1);

        // names differing only in case are distinct teams
        tx.create_team(new_team("foxes")).unwrap();
        assert_eq!(tx.list_teams().unwrap().len(), 2);
    }

    #[test]
    fn team_lookup_by_name_is_case_sensitive() {
        let mut store = SqliteHuntStore::open_in_memory().unwrap();
        let tx = store.begin().unwrap();
        let created = tx.create_team(new_team("Foxes")).unwrap();

        assert_eq!(tx.get_team_by_name("Foxes").unwrap(), Some(created.clone()));
        assert_eq!(tx.get_team_by_name("FOXES").unwrap(), None);
        assert_eq!(tx.get_team_by_id(created.id).unwrap(), Some(created));
    }

    #[test]
    fn user_must_reference_an_existing_team() {
        let mut store = SqliteHuntStore::open_in_memory().unwrap();
        let tx = store.begin().unwrap();
        let mut bob = user(8, "Bob");
        bob.team_id = Some(999);

        let err = tx.save_user(&bob).unwrap_err();
        assert!(matches!(err, StorageError::Conflict { .. }), "{err:?}");
    }

    #[test]
    fn rollback_discards_writes_and_commit_keeps_them() {
        let mut store = SqliteHuntStore::open_in_memory().unwrap();

        let tx = store.begin().unwrap();
        tx.save_user(&user(1, "Alice")).unwrap();
        tx.create_team(new_team("Foxes")).unwrap();
        tx.rollback().unwrap();

        let tx = store.begin().unwrap();
        assert_eq!(tx.get_user(1).unwrap(), None);
        assert!(tx.list_teams().unwrap().is_empty());
        tx.save_user(&user(1, "Alice")).unwrap();
        tx.commit().unwrap();

        let tx = store.begin().unwrap();
        assert_eq!(tx.get_user(1).unwrap(), Some(user(1, "Alice")));
    }

    #[test]
    fn file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hunt.db");

        {
            let mut store = SqliteHuntStore::open(&path).unwrap();
            let tx = store.begin().unwrap();
            tx.create_team(new_team("Foxes")).unwrap();
            tx.commit().unwrap();
        }

        let mut store = SqliteHuntStore::open(&path).unwrap();
        let tx = store.begin().unwrap();
        assert!(tx.get_team_by_name("Foxes").unwrap().is_some());
    }
}
