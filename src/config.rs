//! Process configuration: command line flags and the YAML game definition.

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::info;

use crate::state::{AdminList, Game};

/// Telegram bot running a team scavenger hunt.
#[derive(Debug, Clone, Parser)]
#[command(name = "scavenge-bot", version, about)]
pub struct Settings {
    /// YAML file describing the game.
    #[arg(long, env = "SCAVENGE_GAME_FILE")]
    pub game_file: PathBuf,

    /// Folder receiving submitted photos.
    #[arg(long, env = "SCAVENGE_GALLERY", default_value = "gallery")]
    pub gallery: PathBuf,

    /// SQLite database file.
    #[arg(long, env = "SCAVENGE_DATABASE", default_value = "scavenge.db")]
    pub database: PathBuf,

    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: String,

    /// Comma separated list of admin usernames.
    #[arg(long, env = "SCAVENGE_ADMINS", value_delimiter = ',')]
    pub admins: Vec<String>,

    /// Enable debug logging.
    #[arg(long, short)]
    pub verbose: bool,
}

impl Settings {
    /// Usernames allowed to act as admins.
    pub fn admin_list(&self) -> AdminList {
        AdminList::new(self.admins.iter().map(|name| name.trim()))
    }
}

/// Errors raised while loading the game file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("unable to read game file `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid YAML for a game.
    #[error("unable to parse game file `{}`", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// `start` is not an RFC 3339 timestamp.
    #[error("invalid start time `{value}`")]
    Start {
        value: String,
        #[source]
        source: time::error::Parse,
    },
    /// `duration` is not a humantime duration.
    #[error("invalid game duration `{value}`")]
    Duration {
        /// Raw value from the file.
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    /// `start + duration` falls outside the supported calendar.
    #[error("game duration `{value}` ends beyond the supported date range")]
    DurationOutOfRange {
        /// Raw value from the file.
        value: String,
    },
}

/// YAML representation of the game file.
#[derive(Debug, Deserialize)]
struct RawGame {
    title: String,
    start: String,
    duration: String,
    #[serde(default)]
    items: Vec<String>,
    #[serde(default)]
    bonuses: Vec<String>,
}

impl TryFrom<RawGame> for Game {
    type Error = ConfigError;

    fn try_from(raw: RawGame) -> Result<Self, Self::Error> {
        let start = OffsetDateTime::parse(raw.start.trim(), &Rfc3339).map_err(|source| {
            ConfigError::Start {
                value: raw.start.clone(),
                source,
            }
        })?;
        let duration = humantime::parse_duration(raw.duration.trim()).map_err(|source| {
            ConfigError::Duration {
                value: raw.duration.clone(),
                source,
            }
        })?;

        let game = Game::new(raw.title, start, duration, raw.items, raw.bonuses);
        if game.checked_end().is_none() {
            return Err(ConfigError::DurationOutOfRange {
                value: raw.duration,
            });
        }
        Ok(game)
    }
}

/// Parse a game definition from YAML text.
pub fn parse_game(contents: &str, path: &Path) -> Result<Game, ConfigError> {
    let raw: RawGame = serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Game::try_from(raw)
}

/// Read and parse the game file at `path`.
pub fn load_game(path: &Path) -> Result<Game, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let game = parse_game(&contents, path)?;
    info!(
        path = %path.display(),
        title = %game.title,
        items = game.items.len(),
        bonuses = game.bonuses.len(),
        "loaded game definition"
    );
    Ok(game)
}

#[cfg(test)]
mod tests {
    use std::{io::Write, time::Duration};

    use time::macros::datetime;

    use super::*;

    const GAME: &str = r#"
title: Lockdown Hunt
start: 2024-05-01T12:00:00Z
duration: 1h 30m
items:
  - teapot
  - a red sock
bonuses:
  - garden gnome
"#;

    #[test]
    fn game_file_is_loaded_and_sorted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GAME.as_bytes()).unwrap();

        let game = load_game(file.path()).unwrap();

        assert_eq!(game.title, "Lockdown Hunt");
        assert_eq!(game.start, datetime!(2024-05-01 12:00 UTC));
        assert_eq!(game.duration, Duration::from_secs(90 * 60));
        assert_eq!(game.items, vec!["a red sock", "teapot"]);
        assert_eq!(game.bonuses, vec!["garden gnome"]);
    }

    #[test]
    fn item_lists_are_optional() {
        let game = parse_game(
            "title: Quick\nstart: 2024-05-01T12:00:00+02:00\nduration: 45m\n",
            Path::new("quick.yaml"),
        )
        .unwrap();

        assert!(game.items.is_empty());
        assert!(game.bonuses.is_empty());
        assert_eq!(game.start, datetime!(2024-05-01 10:00 UTC));
    }

    #[test]
    fn bad_duration_is_reported() {
        let err = parse_game(
            "title: Broken\nstart: 2024-05-01T12:00:00Z\nduration: forever\n",
            Path::new("broken.yaml"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Duration { ref value, .. } if value == "forever"));
    }

    #[test]
    fn duration_past_the_calendar_is_rejected() {
        let err = parse_game(
            "title: Endless\nstart: 2024-05-01T12:00:00Z\nduration: 10000years\n",
            Path::new("endless.yaml"),
        )
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::DurationOutOfRange { ref value } if value == "10000years"),
            "{err:?}"
        );
    }

    #[test]
    fn bad_start_is_reported() {
        let err = parse_game(
            "title: Broken\nstart: next tuesday\nduration: 1h\n",
            Path::new("broken.yaml"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Start { .. }));
    }

    #[test]
    fn missing_title_is_a_parse_error() {
        let err = parse_game("start: 2024-05-01T12:00:00Z\nduration: 1h\n", Path::new("g.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_game(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn admins_are_split_on_commas() {
        let settings = Settings::try_parse_from([
            "scavenge-bot",
            "--game-file",
            "game.yaml",
            "--telegram-token",
            "123:abc",
            "--admins",
            "alice, bob",
        ])
        .unwrap();

        let admins = settings.admin_list();
        assert_eq!(admins.len(), 2);
        assert!(admins.contains(Some("bob")));
        assert_eq!(settings.gallery, PathBuf::from("gallery"));
        assert_eq!(settings.database, PathBuf::from("scavenge.db"));
        assert!(!settings.verbose);
    }
}
