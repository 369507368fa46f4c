pub mod adjacency;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod kernel;
pub mod math;
pub mod operations;
pub mod schema;
pub mod topology;

#[cfg(test)]
mod test_support;

pub use adjacency::AdjacencyGraph;
pub use classify::{Classifier, JointCandidate, JointLabel};
pub use config::{AnalysisConfig, ClassificationMode};
pub use error::{BrepJointError, Result};
pub use extract::analyze;
pub use kernel::{BrepKernel, EntityKey, StoreShape};
pub use schema::GeometryDocument;
