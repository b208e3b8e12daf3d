//! Success envelope shared by all API responses.

use serde::Serialize;
use utoipa::ToSchema;

/// Standard success envelope.
///
/// Every successful response carries `success: true` plus either a `data`
/// payload or a human-readable `message` (deletes and stock confirmations
/// use the latter alongside data).
///
/// # JSON Examples
///
/// ```json
/// { "success": true, "data": { "id": "..." } }
/// { "success": true, "message": "Medicamento eliminado exitosamente" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Envelope with a data payload.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Envelope with a message and a data payload.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope with only a message, for operations that return no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_envelope_omits_message() {
        let body = serde_json::to_value(ApiResponse::data(json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn test_message_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("eliminado")).unwrap();
        assert_eq!(body, json!({"success": true, "message": "eliminado"}));
    }

    #[test]
    fn test_message_with_data() {
        let body =
            serde_json::to_value(ApiResponse::with_message("actualizado", json!([1, 2]))).unwrap();
        assert_eq!(
            body,
            json!({"success": true, "message": "actualizado", "data": [1, 2]})
        );
    }
}
