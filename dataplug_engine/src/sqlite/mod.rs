//! SQLite database module for the DataPlug engine.
mod sqlite_impl;

pub mod db;
pub use db::run_migrations;
pub use sqlite_impl::SqliteDatabase;
