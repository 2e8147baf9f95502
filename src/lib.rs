//! eSIM Store library
//!
//! This module exposes the storage, cache, preferences and catalog layers,
//! plus the terminal app, for use by the binary and integration tests.

pub mod api;
pub mod app;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod logging;
pub mod prefs;
pub mod storage;
pub mod ui;
