use axum::Json;
use serde::Serialize;

/// Success envelope: `{ "success": true, "data": ... }`.
/// Failures are rendered by `AppError` with the same `success` flag.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shape() {
        let Json(body) = ApiResponse::ok(json!({"currentRole": "Engineer"}));
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"currentRole": "Engineer"}}));
    }
}
