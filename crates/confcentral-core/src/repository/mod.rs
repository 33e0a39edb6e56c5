//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (confcentral-infra) implements. The core crate never depends on any
//! specific storage technology.
//!
//! Query types handed to repositories follow the store contract the rest of
//! the crate is written against: any number of equality filters, but at most
//! one inequality (range) filter per query. Anything else has to be applied
//! by the caller after retrieval (see [`crate::query`]).

pub mod conference;
pub mod profile;
pub mod session;
pub mod speaker;
