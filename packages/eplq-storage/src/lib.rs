pub mod db;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

mod error;

pub use error::Error;
pub use memory::MemoryStore;
pub use postgres::PgPoiStore;
pub use store::{BoxFuture, PoiStore};

pub type Result<T, E = Error> = std::result::Result<T, E>;
