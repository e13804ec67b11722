//! Rivet Config provides the property sources the container's value
//! injection step reads externally configured fields from.
//!
//! The engine only knows the [`rivet_di::PropertySource`] contract (a key →
//! string mapping); this crate ships the implementations:
//!
//! 1. [`MapSource`] - an in-memory mapping, handy for tests and composition
//! 2. [`PropertiesFile`] - a loader for `key=value` properties files
//!
//! # Examples
//!
//! ```rust
//! use rivet_config::PropertiesFile;
//!
//! let source = PropertiesFile::parse("app.name=demo\nport=8080");
//! ```

pub mod errors;
pub mod provider;

pub use errors::PropertiesError;
pub use provider::{MapSource, PropertiesFile};
