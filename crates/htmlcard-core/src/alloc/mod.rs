//! Collection types used across htmlcard.
//!
//! Re-exports of the AHash-backed hash collections so every crate hashes the
//! same way without naming `ahash` directly.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
