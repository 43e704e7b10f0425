//! cpcready-config library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! ```text
//! presentation (form UI / launcher)
//!         │  ui_bridge commands
//!         ▼
//! application::edit_session   EditSession<R: ConfigRepository>
//!         │  ensure_exists / load / save
//!         ▼
//! infrastructure::storage     ConfigStore  →  <config root>/cpcready/cpcready.toml
//! ```

pub mod application;
pub mod infrastructure;
