use std::{
    any::TypeId,
    collections::{BTreeMap, HashMap},
};

use crate::{
    blueprint::{Args, Blueprint, Provenance},
    container::{Container, RegistryView},
    dependency_graph::DependencyGraph,
    errors::BootError,
    processors::PostProcessor,
    resolver::resolve_order,
    types::Instance,
};

/// Boots the container
///
/// Strictly sequential: graph build, cycle check, topological order, then
/// memoized construction with the pipeline folding over each fresh bean.
/// Any failure aborts the boot and no partial registry escapes.
pub(crate) struct Initiator<'a> {
    blueprints: &'a [Blueprint],
    by_identity: HashMap<&'a str, usize>,
    pipeline: &'a [Box<dyn PostProcessor>],
    instances: BTreeMap<String, Instance>,
    types: HashMap<TypeId, Vec<String>>,
}

impl<'a> Initiator<'a> {
    pub(crate) fn initiate(
        blueprints: &'a [Blueprint],
        pipeline: &'a [Box<dyn PostProcessor>],
    ) -> Result<Container, BootError> {
        tracing::info!("booting container with {} blueprints", blueprints.len());

        let graph = DependencyGraph::build(blueprints)?;
        graph.check_cycles()?;
        let order = resolve_order(blueprints, &graph);
        tracing::debug!("resolved construction order for {} blueprints", order.len());

        let mut initiator = Initiator {
            blueprints,
            by_identity: blueprints
                .iter()
                .enumerate()
                .map(|(index, blueprint)| (blueprint.identity.as_str(), index))
                .collect(),
            pipeline,
            instances: BTreeMap::new(),
            types: HashMap::new(),
        };

        for index in order {
            initiator.build_bean(index)?;
        }

        tracing::info!("container booted with {} beans", initiator.instances.len());
        Ok(Container::new(initiator.instances, initiator.types))
    }

    /// Builds one bean, reusing the registered instance if present
    ///
    /// The registry check is what gives singleton semantics: a dependency
    /// shared by any number of consumers constructs exactly once.
    fn build_bean(&mut self, index: usize) -> Result<Instance, BootError> {
        let blueprints = self.blueprints;
        let blueprint = &blueprints[index];

        if let Some(existing) = self.instances.get(&blueprint.identity) {
            return Ok(existing.clone());
        }

        tracing::debug!("constructing bean '{}'", blueprint.identity);
        let raw = self.instantiate(blueprint)?;

        if raw.info.type_id != blueprint.produced.type_id {
            return Err(BootError::Instantiation {
                identity: blueprint.identity.clone(),
                source: format!(
                    "invocable returned '{}', blueprint declares '{}'",
                    raw.info.type_name, blueprint.produced.type_name
                )
                .into(),
            });
        }

        let finished = self.run_pipeline(blueprint, raw)?;

        if finished.info.type_id != blueprint.produced.type_id {
            return Err(BootError::Configuration {
                identity: blueprint.identity.clone(),
                source: format!(
                    "pipeline replaced the produced type '{}' with '{}'",
                    blueprint.produced.type_name, finished.info.type_name
                )
                .into(),
            });
        }

        self.types
            .entry(finished.info.type_id)
            .or_default()
            .push(blueprint.identity.clone());
        self.instances
            .insert(blueprint.identity.clone(), finished.clone());

        Ok(finished)
    }

    fn instantiate(&mut self, blueprint: &'a Blueprint) -> Result<Instance, BootError> {
        match &blueprint.provenance {
            Provenance::Component {
                constructor,
                constructor_deps,
                ..
            } => {
                let resolved = self.resolve_args(constructor_deps)?;
                constructor(&Args::new(&resolved)).map_err(|source| BootError::Instantiation {
                    identity: blueprint.identity.clone(),
                    source,
                })
            }
            Provenance::Factory {
                owner,
                producer,
                producer_deps,
                init_hook,
            } => {
                let owner_instance = self.build_identity(owner)?;
                let resolved = self.resolve_args(producer_deps)?;

                let product = producer(&owner_instance, &Args::new(&resolved)).map_err(
                    |source| BootError::Instantiation {
                        identity: blueprint.identity.clone(),
                        source,
                    },
                )?;

                if let Some(hook) = init_hook {
                    (hook.invoke)(&product).map_err(|source| BootError::Instantiation {
                        identity: blueprint.identity.clone(),
                        source,
                    })?;
                    tracing::debug!(
                        "ran init hook '{}' on '{}'",
                        hook.name,
                        blueprint.identity
                    );
                }

                Ok(product)
            }
        }
    }

    fn resolve_args(&mut self, dependencies: &[String]) -> Result<Vec<Instance>, BootError> {
        dependencies
            .iter()
            .map(|dependency| self.build_identity(dependency))
            .collect()
    }

    fn build_identity(&mut self, identity: &str) -> Result<Instance, BootError> {
        if let Some(existing) = self.instances.get(identity) {
            return Ok(existing.clone());
        }

        let index = *self
            .by_identity
            .get(identity)
            .expect("dependency identities are validated during graph build");

        self.build_bean(index)
    }

    fn run_pipeline(
        &self,
        blueprint: &Blueprint,
        instance: Instance,
    ) -> Result<Instance, BootError> {
        let view = RegistryView::new(&self.instances, &self.types);
        let mut current = instance;

        for processor in self.pipeline {
            current = processor.process(current, blueprint, &view)?;
            tracing::debug!(
                "processor '{}' finished for '{}'",
                processor.name(),
                blueprint.identity
            );
        }

        Ok(current)
    }
}
