//! Business logic services (use cases).
//!
//! Services orchestrate repository calls, query planning, and business
//! rules. They depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod conference;
pub mod profile;
pub mod session;
pub mod speaker;
