use thiserror::Error;

use crate::types::DynError;

/// Errors found while assembling the dependency graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("blueprint identity '{0}' is registered twice")]
    DuplicateIdentity(String),
    #[error("'{required_by}' needs '{dependency}' but no blueprint provides it")]
    MissingDependency {
        dependency: String,
        required_by: String,
    },
}

/// All graph errors from one build, reported together
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct GraphErrors {
    pub errors: Vec<GraphError>,
}
impl std::fmt::Display for GraphErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The blueprint set has one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

/// Errors while booting the container
///
/// Every variant is fatal for the boot attempt; a failed boot leaves no
/// observable container behind.
#[derive(Error, Debug)]
pub enum BootError {
    /// The blueprint set references unknown identities or repeats one
    #[error(transparent)]
    Graph(#[from] GraphErrors),

    /// One or more dependency cycles, each as an arrow-joined identity chain
    #[error(
        "The dependencies of some blueprints form a cycle:\n{}",
        enumerate_cycles(.cycles)
    )]
    CircularDependency { cycles: Vec<String> },

    /// A constructor, producer or init hook failed
    #[error("instantiation of '{identity}' failed: {source}")]
    Instantiation { identity: String, source: DynError },

    /// A post-processing step failed
    #[error("configuring '{identity}' failed: {source}")]
    Configuration { identity: String, source: DynError },
}

fn enumerate_cycles(cycles: &[String]) -> String {
    cycles
        .iter()
        .enumerate()
        .map(|(i, chain)| format!("{}: {}", i, chain))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors when finishing a blueprint builder
///
/// These surface the upstream "no usable constructor/producer" conditions at
/// composition time, before the blueprint ever reaches the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlueprintError {
    #[error("blueprint '{0}' declares no usable constructor")]
    NoViableConstructor(String),
    #[error("blueprint '{0}' declares no usable producer")]
    NoViableProducer(String),
}

/// Errors when looking beans up on the finished container
///
/// These are local to the calling code, never fatal for the container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No bean matches the request
    #[error("required a single '{type_name}' bean, but 0 were found")]
    NoSuchBean { type_name: &'static str },
    /// More than one bean matches a by-type request
    #[error("required a single '{type_name}' bean, but {count} were found")]
    NoUniqueBean {
        type_name: &'static str,
        count: usize,
    },
    /// A bean holds a different payload than the requested type
    #[error("bean '{identity}' holds '{actual}', not the required '{required}'")]
    Downcast {
        identity: String,
        required: &'static str,
        actual: &'static str,
    },
}

/// Raised when an external value cannot be converted to the field's type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("can't convert value \"{value}\" to {target}")]
pub struct ConvertError {
    pub value: String,
    pub target: &'static str,
}
