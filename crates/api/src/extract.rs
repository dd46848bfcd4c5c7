//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use covenant_shared::AppError;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// JSON body accepted either flat or wrapped as `{"data": {...}}`.
///
/// Clients written against callable functions send the envelope; plain HTTP
/// clients send the object directly.
#[derive(Debug)]
pub struct Payload<T>(pub T);

/// Returns the enveloped object if present, otherwise the body itself.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;
        serde_json::from_value(unwrap_envelope(body))
            .map(Payload)
            .map_err(|e| ApiError(AppError::Validation(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(
            unwrap_envelope(json!({"data": {"titulo": "Salmos"}})),
            json!({"titulo": "Salmos"})
        );
        assert_eq!(
            unwrap_envelope(json!({"titulo": "Salmos"})),
            json!({"titulo": "Salmos"})
        );
        // A non-object `data` field is an ordinary field.
        assert_eq!(
            unwrap_envelope(json!({"data": "x", "titulo": "Salmos"})),
            json!({"data": "x", "titulo": "Salmos"})
        );
    }
}
