//! Infrastructure layer for the configuration editor.
//!
//! Contains the OS-facing adapters: the TOML file store and the command
//! bridge called by a presentation layer.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `cpcready_core`, but MUST NOT be imported by the `application` layer.

pub mod storage;
pub mod ui_bridge;
