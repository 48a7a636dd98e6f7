use thiserror::Error;

/// Failures surfaced by the strict variants of the engine's lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unknown dimension '{0}': no values and no breakdown category")]
    UnknownDimension(String),

    #[error("Variable reference cycle: {}", .0.join(" -> "))]
    VariableCycle(Vec<String>),

    #[error("Variable '{key}' exceeds the resolution depth of {max_depth}")]
    ResolutionDepthExceeded { key: String, max_depth: usize },
}
