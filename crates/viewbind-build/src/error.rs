use crate::sink::ArtifactError;
use thiserror::Error as ThisError;

///
/// Error
///
/// Failures that stop a build step outright. Per-site and per-host problems
/// are reported as diagnostics instead.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("environment variable `{name}` has invalid value `{value}`: {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("binder generation reported {0} error(s)")]
    Failed(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("environment variable `{0}` is not set")]
    MissingEnv(&'static str),

    #[error("no crate root found under `{0}` (expected src/lib.rs or src/main.rs)")]
    MissingCrateRoot(String),

    #[error("invalid runtime crate path `{0}`")]
    RuntimePath(String),
}
