mod error;
mod schema;
mod store;

pub use error::SqliteDaoError;
pub use store::SqliteHuntStore;
