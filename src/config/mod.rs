//! # Configuration Management
//!
//! Construction-time configuration for the documentation engine. The engine
//! consumes these settings once, at construction; configuration problems
//! surface immediately and loudly, never lazily per exchange.

mod settings;

pub use settings::{
    DocumentationSettings, LocalDriverSettings, ObservabilityConfig, SUPPORTED_CONFIG_MAJOR,
};
