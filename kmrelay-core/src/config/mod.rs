//! Configuration types
//!
//! Board-agnostic relay configuration. The firmware validates its
//! `relay.toml` against these types at build time.

pub mod types;

pub use types::*;
