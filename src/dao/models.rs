use serde::{Deserialize, Serialize};

/// Participant row keyed by the chat platform's user identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Identifier assigned by the chat platform, stable for the user's lifetime.
    pub id: i64,
    /// Platform handle, unique when present.
    pub user_name: Option<String>,
    /// Display name shown in replies.
    pub first_name: String,
    /// Set once from the admin allow-list when the row is first created.
    pub admin: bool,
    /// Team the user currently belongs to, if any.
    pub team_id: Option<i64>,
}

/// Team row; names are globally unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Identifier assigned by the database.
    pub id: i64,
    /// Display name chosen at creation time.
    pub name: String,
}

/// Insert payload for a team whose identifier is not yet known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTeam {
    /// Requested team name.
    pub name: String,
}

impl UserEntity {
    /// Whether the user is currently a member of `team`.
    pub fn is_member_of(&self, team: &TeamEntity) -> bool {
        self.team_id == Some(team.id)
    }
}
