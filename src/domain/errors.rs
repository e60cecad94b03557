use crate::domain::value_objects::ProfileId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    /// The id is not among the known profiles
    #[error("unknown profile '{id}'")]
    NotFound { id: ProfileId },

    #[error("settings store failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

pub type ResolverResult<T> = Result<T, ResolverError>;
