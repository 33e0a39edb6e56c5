//! Shared domain types for Conference Central.
//!
//! Conferences, sessions, speakers and profiles, the request types used to
//! create and update them, configuration, and the error enums shared by the
//! other crates.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod conference;
pub mod config;
pub mod error;
pub mod profile;
pub mod session;
pub mod speaker;
