//! Integer error codes attached to log events for monitoring.

/// Error codes used in structured log fields.
///
/// The wire envelope never exposes these; they exist so alerts can key on
/// a stable integer instead of a message string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InternalError,
    ValidationError,
    JsonExtraction,
    InvalidUuid,
    NotFound,
    Conflict,
    UnprocessableEntity,
    DatabaseError,
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::InternalError => 1000,
            ErrorCode::ValidationError => 1001,
            ErrorCode::JsonExtraction => 1002,
            ErrorCode::InvalidUuid => 1003,
            ErrorCode::NotFound => 1004,
            ErrorCode::Conflict => 1008,
            ErrorCode::UnprocessableEntity => 1009,
            ErrorCode::DatabaseError => 1010,
            ErrorCode::ServiceUnavailable => 1011,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::JsonExtraction => "JSON_EXTRACTION",
            ErrorCode::InvalidUuid => "INVALID_UUID",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::NotFound.code(), 1004);
        assert_eq!(ErrorCode::DatabaseError.as_str(), "DATABASE_ERROR");
    }
}
