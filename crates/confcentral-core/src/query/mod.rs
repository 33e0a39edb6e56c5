//! Query planning and client-side result filtering.
//!
//! Repositories accept at most one inequality filter per query. The planner
//! picks the one that runs in the store and the residual module filters the
//! store's candidates against everything else.

pub mod conference;
pub mod planner;
pub mod residual;
