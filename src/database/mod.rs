pub mod manager;
pub mod models;
pub mod store;

pub use manager::{connect_pool, DatabaseError};
pub use models::Square;
pub use store::{PgSquareStore, SquareStore};
