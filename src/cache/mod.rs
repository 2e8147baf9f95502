//! Cache module for storing API responses locally
//!
//! This module provides a time-boxed cache over a [`KeyValueStore`](crate::storage::KeyValueStore).
//! Every entry records when it was written; freshness is decided at read time
//! against a maximum age supplied by the caller, so one entry can serve
//! callers with different freshness needs.

mod manager;

pub use manager::{system_clock, CacheError, CacheManager, Clock};
