use std::sync::Arc;

use crate::{
    blueprint::Blueprint,
    container::RegistryView,
    errors::BootError,
    processors::PostProcessor,
    types::{DynError, Instance},
};

/// Opaque interception capability
///
/// Given a bean, returns a same-contract bean with extra behavior around
/// designated operations, typically a decorator holding the original. The
/// replacement must keep the produced payload type: lookups observe only the
/// public contract, so the concrete representation inside the handle is free
/// to change.
pub trait Interceptor: Send + Sync {
    /// Short name used in boot logs and error messages
    fn name(&self) -> &'static str;

    fn wrap(&self, blueprint: &Blueprint, instance: Instance) -> Result<Instance, DynError>;
}

/// Runs every registered interceptor over the bean, in registration order
pub struct InterceptionProcessor {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptionProcessor {
    pub fn new(interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        InterceptionProcessor { interceptors }
    }
}

impl PostProcessor for InterceptionProcessor {
    fn name(&self) -> &'static str {
        "interception"
    }

    fn process(
        &self,
        instance: Instance,
        blueprint: &Blueprint,
        _registry: &RegistryView<'_>,
    ) -> Result<Instance, BootError> {
        let mut current = instance;

        for interceptor in &self.interceptors {
            let before = current.info;

            current = interceptor.wrap(blueprint, current).map_err(|source| {
                BootError::Configuration {
                    identity: blueprint.identity.clone(),
                    source,
                }
            })?;

            // The wrapper must stay retrievable under the produced type.
            if current.info.type_id != before.type_id {
                return Err(BootError::Configuration {
                    identity: blueprint.identity.clone(),
                    source: format!(
                        "interceptor '{}' replaced '{}' with '{}'",
                        interceptor.name(),
                        before.type_name,
                        current.info.type_name
                    )
                    .into(),
                });
            }

            tracing::debug!(
                "interceptor '{}' wrapped '{}'",
                interceptor.name(),
                blueprint.identity
            );
        }

        Ok(current)
    }
}
