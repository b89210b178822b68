//! Core types, alignment vocabulary, and errors for the Bento layout engine.
//!
//! This crate provides the foundational types used by the layout solvers:
//! - Axis abstraction ([`Orientation`], [`PerAxis`])
//! - Geometry ([`Bounds`])
//! - Alignment and justification, with axis-relative names
//! - Error types

pub mod align;
pub mod errors;
pub mod types;

pub use align::*;
pub use errors::*;
pub use types::*;
