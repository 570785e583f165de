//! htmlcard Core
//!
//! Ambient utilities shared by the htmlcard crates: collections, logging,
//! runtime configuration and profiling.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod profiling;
