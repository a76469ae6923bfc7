//! Integration test crate for AquaKeeper.
//!
//! This crate has no library code. Its tests drive the storage layer and
//! the chemistry helpers together, the way the daemon does.
//!
//! ```sh
//! cargo test -p aqua-integration-tests
//! ```
