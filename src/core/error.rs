//! Failure kinds surfaced by rate fetches and conversions

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    /// Transport failure, non-success HTTP status or an unreadable body.
    #[error("Failed to fetch {resource}: {detail}")]
    Network {
        resource: &'static str,
        detail: String,
    },

    /// The provider answered but omitted the requested quote currency.
    #[error("Currency rate not found for {from}/{to}")]
    RateNotFound { from: String, to: String },
}

impl FxError {
    pub fn network(resource: &'static str, detail: impl ToString) -> Self {
        FxError::Network {
            resource,
            detail: detail.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FxError>;
