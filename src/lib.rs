//! Admin Console - client for the admin dashboard backend
//!
//! This library provides the session handling, the authenticated HTTP client, the
//! per-resource API modules with their mock backend, and the list query helpers.

pub mod api;
pub mod config;
pub mod console;
pub mod http;
pub mod mock;
pub mod models;
pub mod query;
pub mod session;
pub mod storage;
pub mod stores;

pub use console::Console;
