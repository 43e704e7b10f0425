//! Domain layer: pure configuration types and rules.
//!
//! Nothing in this module performs I/O.  Deserialization from TOML is driven
//! by the `serde` derives on these types; the caller owns the bytes.

pub mod document;
pub mod field;
pub mod validation;
