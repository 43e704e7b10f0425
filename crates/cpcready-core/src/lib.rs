//! # cpcready-core
//!
//! Shared library for CPCReady containing the configuration document model
//! and the validation rules applied before a document is saved.
//!
//! This crate has zero dependencies on the file system, UI frameworks, or
//! platform directories.  Persistence lives in the `cpcready-config` crate.
//!
//! # Architecture overview
//!
//! CPCReady is a toolchain for Amstrad CPC development.  Its tools share one
//! small TOML file that records which disk images are mounted in the virtual
//! drives, which emulator to launch, and which CPC model, video mode and
//! user number to target.
//!
//! - **`domain::document`** – The three-table [`ConfigurationDocument`] and
//!   its closed-set enums.  Missing keys are filled from defaults when the
//!   document is deserialized.
//!
//! - **`domain::field`** – [`ConfigField`], the nine `section.key` paths, and
//!   the helpers that read or replace a single field as text.
//!
//! - **`domain::validation`** – Semantic checks (IP shape, integer ranges)
//!   that callers run before handing a document to the store.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `cpcready_core::ConfigurationDocument` instead of the full module path.
pub use domain::document::{
    ConfigurationDocument, CpcModel, DriveLetter, DriveSection, Emulator, EmulatorSection,
    SystemSection, UnknownVariant,
};
pub use domain::field::ConfigField;
pub use domain::validation::{
    validate_ip, validate_mode, validate_user, ValidationError, MAX_MODE, MAX_USER,
};
