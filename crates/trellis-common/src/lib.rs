//! Common utilities for the Trellis layout engine.
//!
//! This crate provides shared infrastructure used by the DOM and layout crates:
//! - **Warning System** - deduplicated warnings for unsupported input

pub mod warning;
