//! Construction-time failures
//!
//! Runtime inconsistencies (double release, unknown entity) are logged and
//! ignored; only building a simulation can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A collaborator the simulation cannot run without was not supplied
    #[error("missing dependency: {0}")]
    MissingDependency(&'static str),
    /// Settings failed validation
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// Settings JSON could not be parsed
    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),
}
