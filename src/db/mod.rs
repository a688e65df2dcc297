//! Database module
//!
//! SQLite connection pool and migrations backing the profile and food-log stores.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
