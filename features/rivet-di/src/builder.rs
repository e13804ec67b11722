use std::sync::Arc;

use crate::{
    blueprint::Blueprint,
    container::Container,
    errors::BootError,
    initiator::Initiator,
    processors::{
        FieldInjectionProcessor, InterceptionProcessor, Interceptor, PostProcessor,
        PropertySource, ValueInjectionProcessor,
    },
};

/// Registers blueprints and external collaborators, then boots
///
/// The single boot entry point of the engine: `build` runs graph build →
/// cycle check → topological order → construction with the post-processing
/// pipeline, and returns the frozen [`Container`] or the first fatal error.
pub struct ContainerBuilder {
    blueprints: Vec<Blueprint>,
    property_source: Option<Arc<dyn PropertySource>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    extra_processors: Vec<Box<dyn PostProcessor>>,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    pub fn new() -> Self {
        ContainerBuilder {
            blueprints: Vec::new(),
            property_source: None,
            interceptors: Vec::new(),
            extra_processors: Vec::new(),
        }
    }

    pub fn add_blueprint(mut self, blueprint: Blueprint) -> Self {
        self.blueprints.push(blueprint);
        self
    }

    pub fn add_blueprints(mut self, blueprints: impl IntoIterator<Item = Blueprint>) -> Self {
        self.blueprints.extend(blueprints);
        self
    }

    /// Installs the external value source queried during value injection
    pub fn with_property_source(mut self, source: impl PropertySource + 'static) -> Self {
        self.property_source = Some(Arc::new(source));
        self
    }

    /// Registers an interception capability, applied in registration order
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Appends a custom processor behind the shipped pipeline stages
    pub fn with_processor(mut self, processor: impl PostProcessor + 'static) -> Self {
        self.extra_processors.push(Box::new(processor));
        self
    }

    pub fn build(self) -> Result<Container, BootError> {
        let mut pipeline: Vec<Box<dyn PostProcessor>> = vec![
            Box::new(FieldInjectionProcessor),
            Box::new(ValueInjectionProcessor::new(self.property_source)),
        ];
        if !self.interceptors.is_empty() {
            pipeline.push(Box::new(InterceptionProcessor::new(self.interceptors)));
        }
        pipeline.extend(self.extra_processors);

        Initiator::initiate(&self.blueprints, &pipeline)
    }
}
