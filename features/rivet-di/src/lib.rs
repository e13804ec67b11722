//! Rivet DI builds a fully-wired object graph from declared blueprints and
//! exposes typed/named lookup over it.
//!
//! Boot is a single sequential pass: the blueprint set becomes a dependency
//! graph, the graph is checked for unresolved references and cycles (every
//! independent cycle is reported at once), blueprints are ordered so each
//! dependency precedes its dependents, and each bean is constructed exactly
//! once and run through the post-processing pipeline before it reaches the
//! registry. A failed boot leaves no container behind.
//!
//! # Examples
//!
//! ```rust
//! use rivet_di::{Blueprint, ContainerBuilder};
//! use std::sync::Arc;
//!
//! struct Repository;
//! struct Service {
//!     repository: Arc<Repository>,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let container = ContainerBuilder::new()
//!     .add_blueprint(
//!         Blueprint::component::<Repository>("repository")
//!             .constructor(&[], |_| Ok(Repository))
//!             .build()?,
//!     )
//!     .add_blueprint(
//!         Blueprint::component::<Service>("service")
//!             .constructor(&["repository"], |args| {
//!                 Ok(Service {
//!                     repository: args.get::<Repository>(0)?,
//!                 })
//!             })
//!             .build()?,
//!     )
//!     .build()?;
//!
//! let service = container.get_by_type::<Service>()?;
//! let _ = &service.repository;
//! # Ok(())
//! # }
//! ```
//!
//! The crate consists of the following components:
//!
//! 1. Blueprint - the data model for one producible object and its builders
//! 2. DependencyGraph - adjacency build, unresolved-reference and cycle checks
//! 3. Initiator - ordered, memoized construction of every bean
//! 4. Processors - the pluggable post-construction pipeline
//! 5. Container - the frozen registry with by-type and by-name lookup

pub mod blueprint;
pub mod builder;
pub mod container;
pub mod dependency_graph;
pub mod errors;
pub mod late;
pub mod processors;
pub mod types;

mod initiator;
mod resolver;

pub use blueprint::{Args, Blueprint, ComponentBuilder, FactoryBuilder, Provenance, Scope};
pub use builder::ContainerBuilder;
pub use container::{Container, RegistryView};
pub use errors::{BlueprintError, BootError, ConvertError, GraphError, GraphErrors, LookupError};
pub use late::{Late, LateError};
pub use processors::{
    FieldInjectionProcessor, InterceptionProcessor, Interceptor, PostProcessor, PropertySource,
    ValueInjectionProcessor,
};
pub use types::{DynError, Injectable, Instance, TypeInfo};
