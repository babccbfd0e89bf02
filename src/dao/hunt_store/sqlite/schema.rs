use rusqlite::Connection;

use super::error::{SqliteDaoError, SqliteResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS teams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    user_name TEXT UNIQUE,
    first_name TEXT NOT NULL,
    team_id INTEGER REFERENCES teams (id),
    admin BOOLEAN NOT NULL DEFAULT FALSE
);
";

/// Create the tables if they are missing. Safe to run on every start.
pub fn apply(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(SCHEMA)
        .map_err(|source| SqliteDaoError::Schema { source })
}
