//! Relay configuration
//!
//! Generated by build.rs from the validated relay.toml.

include!(concat!(env!("OUT_DIR"), "/relay_config.rs"));
