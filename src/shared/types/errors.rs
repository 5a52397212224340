use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} {value} not found")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Charger current status {status} does not allow operation {action}")]
    InvalidTransition { status: String, action: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    /// Stable machine-readable kind, surfaced to API clients next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Storage(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_entity() {
        let err = DomainError::not_found("Charger", "charger_id", "CHARGER_X");
        assert_eq!(err.to_string(), "Charger CHARGER_X not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn transition_message_names_status_and_action() {
        let err = DomainError::InvalidTransition {
            status: "CHARGING".to_string(),
            action: "TURN_ON".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Charger current status CHARGING does not allow operation TURN_ON"
        );
        assert_eq!(err.code(), "INVALID_TRANSITION");
    }
}
