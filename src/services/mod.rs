//! Service layer of the documentation engine

pub mod accumulator;

pub use accumulator::{DocumentAccumulator, Exchange};
