use thiserror::Error;

/// Outcome classification surfaced to the HTTP boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn invalid(msg: impl Into<String>) -> Self { Self::InvalidInput(msg.into()) }

    /// Text without the classification prefix, for response bodies.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m) | Self::NotFound(m) | Self::Storage(m) => m,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(m) => Self::InvalidInput(m),
            models::errors::ModelError::Db(m) => Self::Storage(m),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Storage(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn model_errors_keep_their_class() {
        assert!(matches!(ServiceError::from(ModelError::Validation("x".into())), ServiceError::InvalidInput(_)));
        assert!(matches!(ServiceError::from(ModelError::Db("x".into())), ServiceError::Storage(_)));
    }

    #[test]
    fn message_strips_prefix() {
        let e = ServiceError::not_found("subscription");
        assert_eq!(e.to_string(), "not found: subscription not found");
        assert_eq!(e.message(), "subscription not found");
    }
}
