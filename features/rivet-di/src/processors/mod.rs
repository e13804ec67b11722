//! Post-construction pipeline
//!
//! An ordered chain of processors folds over every freshly constructed bean
//! before it reaches the registry. Each step may mutate the bean in place or
//! replace it entirely; only the final instance is registered.

mod fields;
mod proxy;
mod values;

pub use fields::FieldInjectionProcessor;
pub use proxy::{InterceptionProcessor, Interceptor};
pub use values::{PropertySource, ValueInjectionProcessor};

use crate::{blueprint::Blueprint, container::RegistryView, errors::BootError, types::Instance};

/// One step of the post-construction pipeline
///
/// A processor may mutate the bean and return it unchanged, or return a
/// replacement; later steps and the registry only ever see the returned
/// instance. Processors needing other beans take them from the registry
/// view, never from pipeline internals.
pub trait PostProcessor: Send + Sync {
    /// Short name used in boot logs
    fn name(&self) -> &'static str;

    fn process(
        &self,
        instance: Instance,
        blueprint: &Blueprint,
        registry: &RegistryView<'_>,
    ) -> Result<Instance, BootError>;
}
