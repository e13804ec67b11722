use crate::{
    blueprint::{Blueprint, Provenance},
    container::RegistryView,
    errors::BootError,
    processors::PostProcessor,
    types::Instance,
};

/// Fills every declared field slot with its live dependency
///
/// Field dependencies are not constructor inputs; they land on the already
/// constructed bean, which is what allows two components to reference each
/// other through fields without a constructor cycle.
pub struct FieldInjectionProcessor;

impl PostProcessor for FieldInjectionProcessor {
    fn name(&self) -> &'static str {
        "field-injection"
    }

    fn process(
        &self,
        instance: Instance,
        blueprint: &Blueprint,
        registry: &RegistryView<'_>,
    ) -> Result<Instance, BootError> {
        let Provenance::Component { fields, .. } = &blueprint.provenance else {
            return Ok(instance);
        };

        for binding in fields {
            let dependency = registry.instance(&binding.dependency).ok_or_else(|| {
                BootError::Configuration {
                    identity: blueprint.identity.clone(),
                    source: format!(
                        "field dependency '{}' is not present in the registry",
                        binding.dependency
                    )
                    .into(),
                }
            })?;

            (binding.inject)(&instance, dependency).map_err(|source| {
                BootError::Configuration {
                    identity: blueprint.identity.clone(),
                    source,
                }
            })?;

            tracing::debug!(
                "injected '{}' into a field of '{}'",
                binding.dependency,
                blueprint.identity
            );
        }

        Ok(instance)
    }
}
