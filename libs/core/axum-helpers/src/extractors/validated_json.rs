//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor with automatic validation.
///
/// Validates the request body using the `validator` crate's `Validate` trait
/// and rejects with the first failing field message in the uniform
/// `{"error": ...}` body.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateTask {
///     #[validate(required(message = "Title is required"))]
///     title: Option<String>,
/// }
///
/// async fn create_task(ValidatedJson(payload): ValidatedJson<CreateTask>) {
///     // payload passed validation
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Pick the first field-level message out of a validation failure.
///
/// Only explicit `message = "..."` annotations are surfaced; constraint
/// codes stay internal.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Validation failed".to_string())
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::JsonExtractorRejection(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::BadRequest(first_validation_message(&e)).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(required(message = "Title is required"))]
        title: Option<String>,
    }

    #[test]
    fn test_first_validation_message_uses_annotation() {
        let payload = Payload { title: None };
        let errors = payload.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Title is required");
    }
}
