//! Storage infrastructure: configuration file persistence.
//!
//! - `config` reads and writes `cpcready.toml` under the per-user config
//!   root, creating it with defaults on first run and replacing it
//!   atomically on every save.
//! - `mock` is an in-memory repository with injectable failures, used by
//!   tests of the application layer.

pub mod config;
pub mod mock;
