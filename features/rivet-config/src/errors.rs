use thiserror::Error;

/// Errors while loading a properties file
#[derive(Error, Debug)]
pub enum PropertiesError {
    #[error("failed to read properties file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
