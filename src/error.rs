use crate::api::error::ApiError;
use crate::models::PropertyId;
use crate::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No property with id {0}")]
    UnknownProperty(PropertyId),

    #[error("Please select the date when rent was received")]
    MissingReceivedDate,

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize backup: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl TrackerError {
    /// Errors caught before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TrackerError::Validation(_) | TrackerError::MissingReceivedDate
        )
    }
}
