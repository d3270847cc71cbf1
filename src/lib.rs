//! # Docplane
//!
//! Docplane watches live HTTP request/response exchanges and incrementally
//! builds a single persisted OpenAPI-style specification document. Schemas
//! are inferred from example payloads and merged across repeated
//! observations of the same endpoint into stable, non-exploding shapes.
//!
//! ## Architecture
//!
//! The engine sits between the hosting framework's middleware hook and a
//! pluggable storage driver:
//!
//! ```text
//! Middleware Hook → Document Accumulator → Storage Driver
//!                        ↓
//!       Parameter Extractor / Security Resolver
//!                        ↓
//!            Schema Inference & Merge
//! ```
//!
//! ## Core Components
//!
//! - **Schema Inference & Merge**: converts raw JSON values into schema
//!   fragments and unifies them across observations
//! - **Parameter Extractor**: derives path/query/body parameters from one
//!   exchange and rejects duplicates
//! - **Security Resolver**: maps the configured mode to a security
//!   requirement and scheme definition
//! - **Document Accumulator**: orchestrates the above per exchange and moves
//!   the document through the storage driver
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use docplane::{DocumentAccumulator, DocumentationSettings, Exchange};
//!
//! #[tokio::main]
//! async fn main() -> docplane::Result<()> {
//!     let settings = DocumentationSettings::from_env()?;
//!     let accumulator = DocumentAccumulator::from_settings(&settings)?;
//!
//!     let exchange = Exchange {
//!         path_template: "/users/{id}".to_string(),
//!         method: http::Method::GET,
//!         path_values: vec![("id".to_string(), serde_json::json!(1))],
//!         query_values: vec![],
//!         request_body: None,
//!         status: http::StatusCode::OK,
//!         content_type: "application/json".to_string(),
//!         response_body: Some(r#"{"id": 1, "name": "a"}"#.to_string()),
//!     };
//!
//!     accumulator.add_data(&exchange).await?;
//!     accumulator.publish().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod observability;
pub mod openapi;
pub mod schema;
pub mod services;
pub mod storage;

// Re-export commonly used types and traits
pub use config::{DocumentationSettings, ObservabilityConfig};
pub use errors::{Error, Result};
pub use observability::init_logging;
pub use openapi::{AccumulatedDocument, Document, SecurityMode};
pub use schema::{infer, merge, Schema};
pub use services::{DocumentAccumulator, Exchange};
pub use storage::{DocumentationDriver, LocalDriver, MemoryDriver};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
