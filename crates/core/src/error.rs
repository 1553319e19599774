use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Validation failure attributable to a single input field.
    #[error("Validation failed on {field}: {message}")]
    FieldValidation {
        field: &'static str,
        message: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::FieldValidation`].
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::FieldValidation {
            field,
            message: message.into(),
        }
    }
}
