pub mod audit;
pub mod geometry;
pub mod poi;
pub mod predicate;

mod error;

pub use error::{Error, Result};
