//! Immutable state loaded at startup.

pub mod admins;
pub mod game;

pub use self::admins::AdminList;
pub use self::game::{Game, GameStatus};
