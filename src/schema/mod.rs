//! Schema inference module for automatic API schema discovery
//!
//! This module provides schema inference capabilities for JSON payloads,
//! automatically learning API structure from observed traffic and unifying
//! repeated observations of the same endpoint into a single stable schema.

pub mod inference;

pub use inference::{infer, merge, ScalarKind, Schema};
