//! HTTP request handlers for the REST API.

pub mod announcement;
pub mod conference;
pub mod profile;
pub mod session;
pub mod speaker;
pub mod wishlist;
