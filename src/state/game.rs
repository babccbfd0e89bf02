//! The hunt being played and where a moment falls relative to it.

use std::time::Duration;

use time::{OffsetDateTime, PrimitiveDateTime};

/// Scavenger hunt definition loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Human readable title, also used to name the photo gallery folder.
    pub title: String,
    /// Instant the hunt opens.
    pub start: OffsetDateTime,
    /// How long the hunt stays open after [`Game::start`].
    pub duration: Duration,
    /// Items to find, sorted alphabetically.
    pub items: Vec<String>,
    /// Optional bonus items, sorted alphabetically.
    pub bonuses: Vec<String>,
}

/// Where a point in time falls relative to the `[start, start + duration)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Before the start instant.
    NotStarted,
    /// Inside the window.
    InProgress,
    /// At or after the end instant.
    Finished,
}

impl Game {
    /// Build a game, sorting the item and bonus lists.
    pub fn new(
        title: String,
        start: OffsetDateTime,
        duration: Duration,
        mut items: Vec<String>,
        mut bonuses: Vec<String>,
    ) -> Self {
        items.sort();
        bonuses.sort();
        Self {
            title,
            start,
            duration,
            items,
            bonuses,
        }
    }

    /// First instant at which the game is over, or `None` when it lies beyond the
    /// representable calendar.
    pub fn checked_end(&self) -> Option<OffsetDateTime> {
        let duration = time::Duration::try_from(self.duration).ok()?;
        self.start.checked_add(duration)
    }

    /// First instant at which the game is over, clamped to the latest representable date.
    pub fn end(&self) -> OffsetDateTime {
        self.checked_end()
            .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc())
    }

    /// Classify `now` against the half-open game window.
    pub fn status_at(&self, now: OffsetDateTime) -> GameStatus {
        if now < self.start {
            GameStatus::NotStarted
        } else if now < self.end() {
            GameStatus::InProgress
        } else {
            GameStatus::Finished
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn game() -> Game {
        Game::new(
            "Hunt".into(),
            datetime!(2024-05-01 12:00 UTC),
            Duration::from_secs(3600),
            vec!["teapot".into(), "gnome".into(), "acorn".into()],
            vec!["yeti".into(), "bicycle".into()],
        )
    }

    #[test]
    fn lists_are_sorted_on_construction() {
        let game = game();
        assert_eq!(game.items, ["acorn", "gnome", "teapot"]);
        assert_eq!(game.bonuses, ["bicycle", "yeti"]);
    }

    #[test]
    fn window_is_half_open() {
        let game = game();
        assert_eq!(
            game.status_at(datetime!(2024-05-01 11:59:59 UTC)),
            GameStatus::NotStarted
        );
        assert_eq!(
            game.status_at(datetime!(2024-05-01 12:00 UTC)),
            GameStatus::InProgress
        );
        assert_eq!(
            game.status_at(datetime!(2024-05-01 12:59:59 UTC)),
            GameStatus::InProgress
        );
        assert_eq!(
            game.status_at(datetime!(2024-05-01 13:00 UTC)),
            GameStatus::Finished
        );
    }

    #[test]
    fn huge_duration_clamps_instead_of_overflowing() {
        let game = Game::new(
            "Forever".into(),
            datetime!(2024-05-01 12:00 UTC),
            Duration::from_secs(10_000 * 365 * 24 * 3600),
            Vec::new(),
            Vec::new(),
        );

        assert_eq!(game.checked_end(), None);
        assert_eq!(game.end(), PrimitiveDateTime::MAX.assume_utc());
        assert_eq!(
            game.status_at(datetime!(2024-05-01 13:00 UTC)),
            GameStatus::InProgress
        );
    }
}
