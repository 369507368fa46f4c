use thiserror::Error;

/// Top-level error type for B-Rep joint analysis.
#[derive(Debug, Error)]
pub enum BrepJointError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors related to geometric construction and evaluation.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Errors related to topological lookups and construction.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not connected at edge {0}")]
    DisconnectedWire(usize),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Rejection of an input shape before any entity is extracted.
///
/// These abort the whole extraction. Per-entity failures are not errors;
/// they are counted in the document diagnostics instead.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("shape root {0} does not exist")]
    MissingRoot(String),

    #[error("shape contains no faces, edges or vertices")]
    EmptyShape,
}

/// Errors in analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid angle window {name}: [{min}, {max}]")]
    InvalidWindow {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{name} must be non-negative, got {value}")]
    NegativeLength { name: &'static str, value: f64 },

    #[error("unknown classification mode {0:?}")]
    UnknownMode(String),

    #[error("invalid value {value:?} for {variable}")]
    InvalidEnv { variable: &'static str, value: String },
}

/// Convenience type alias for results using [`BrepJointError`].
pub type Result<T> = std::result::Result<T, BrepJointError>;
