//! Scenario construction errors.

use thiserror::Error;

use crate::core::registry::PolicyKind;

/// Errors raised while reading or building a scenario.
///
/// Any error aborts the construction of the scenario being built, but not the
/// rest of the batch (see [`crate::batch`]).
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// An alias could not be resolved to a policy implementation,
    /// or its options were rejected by the implementation's constructor.
    #[error("cannot resolve {kind} alias `{alias}`: {cause}")]
    Resolution {
        kind: PolicyKind,
        alias: String,
        cause: String,
    },
    #[error("cannot read scenario file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse scenario file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ScenarioError {
    pub fn resolution<S: Into<String>>(kind: PolicyKind, alias: &str, cause: S) -> Self {
        Self::Resolution {
            kind,
            alias: alias.to_string(),
            cause: cause.into(),
        }
    }
}
