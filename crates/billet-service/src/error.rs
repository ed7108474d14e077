//! Service error types

use thiserror::Error;

/// Errors that can occur during service operations
#[derive(Error, Debug, PartialEq)]
pub enum ServiceError {
    /// A referenced person, supervisor or assignment does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// The identifier that was not found
        id: String,
    },

    /// Request failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend failure
    #[error("Store error: {0}")]
    Store(String),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn store<E: std::fmt::Display>(err: E) -> Self {
        ServiceError::Store(err.to_string())
    }
}

impl From<billet_domain::ValidationError> for ServiceError {
    fn from(err: billet_domain::ValidationError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}
