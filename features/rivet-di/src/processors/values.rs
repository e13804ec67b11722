use std::sync::Arc;

use crate::{
    blueprint::Blueprint, container::RegistryView, errors::BootError, processors::PostProcessor,
    types::Instance,
};

/// External key → string mapping queried during value injection
///
/// Absent keys yield `None`; the pipeline treats that as a configuration
/// error when the target field is non-optional.
pub trait PropertySource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Assigns externally configured values to their field slots
///
/// The lookup key is the binding's explicit key when present, otherwise the
/// field name. A missing key or an unconvertible value fails the boot.
pub struct ValueInjectionProcessor {
    source: Option<Arc<dyn PropertySource>>,
}

impl ValueInjectionProcessor {
    pub fn new(source: Option<Arc<dyn PropertySource>>) -> Self {
        ValueInjectionProcessor { source }
    }
}

impl PostProcessor for ValueInjectionProcessor {
    fn name(&self) -> &'static str {
        "value-injection"
    }

    fn process(
        &self,
        instance: Instance,
        blueprint: &Blueprint,
        _registry: &RegistryView<'_>,
    ) -> Result<Instance, BootError> {
        for binding in &blueprint.values {
            let key = binding.key.as_deref().unwrap_or(binding.field);

            let source = self.source.as_deref().ok_or_else(|| configuration(
                blueprint,
                format!(
                    "field '{}' needs property '{key}' but no property source is installed",
                    binding.field
                ),
            ))?;

            let raw = source.get(key).ok_or_else(|| {
                configuration(blueprint, format!("property '{key}' not found"))
            })?;

            (binding.assign)(&instance, &raw).map_err(|source| BootError::Configuration {
                identity: blueprint.identity.clone(),
                source,
            })?;

            tracing::debug!(
                "assigned property '{key}' to field '{}' of '{}'",
                binding.field,
                blueprint.identity
            );
        }

        Ok(instance)
    }
}

fn configuration(blueprint: &Blueprint, message: String) -> BootError {
    BootError::Configuration {
        identity: blueprint.identity.clone(),
        source: message.into(),
    }
}
