//! Application layer use cases for the configuration editor.
//!
//! Use cases in this layer orchestrate the domain types from `cpcready-core`
//! and depend on the [`ConfigRepository`](edit_session::ConfigRepository)
//! abstraction rather than on the file system, so they can be tested with an
//! in-memory repository.
//!
//! # Sub-modules
//!
//! - **`edit_session`** – Holds the saved document and the working draft,
//!   validates before saving, and implements reload/discard.

pub mod edit_session;
