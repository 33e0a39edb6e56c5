//! Business logic and repository trait definitions for Conference Central.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, the session query planner and result filter, and the
//! services behind every API operation. It depends only on
//! `confcentral-types` -- never on `confcentral-infra` or any database/IO crate.

pub mod query;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
