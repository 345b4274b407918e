//! Embedded SQLite adapter built on Diesel and r2d2.

mod models;
mod repository;
mod schema;
mod transaction;

pub use repository::{SqliteObjectStore, SqliteOptions, SqlitePool};
