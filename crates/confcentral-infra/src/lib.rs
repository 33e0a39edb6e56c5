//! Infrastructure layer for Conference Central.
//!
//! Contains implementations of the repository traits defined in
//! `confcentral-core` (SQLite storage with sqlx) and the configuration loader.

pub mod config;
pub mod sqlite;
