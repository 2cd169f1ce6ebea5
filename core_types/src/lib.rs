//! # Core Types
//!
//! Identifiers shared by the simulated kernel, the modules and the host.
//!
//! ## Key Types
//!
//! - [`SessionId`]: Identity of one open handle on a proc entry

pub mod ids;

pub use ids::SessionId;
