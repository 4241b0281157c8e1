pub mod models;
pub mod tmdb;

pub use models::*;
pub use tmdb::*;
