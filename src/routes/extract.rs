// src/routes/extract.rs
//! Request extractors that report failures as 422 `{"detail": [...]}` bodies.
//!
//! axum's stock rejections answer with plain-text 400/415/422 responses.
//! These wrappers fold them into [`ApiError::Validation`] so every client
//! error shares one body shape.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, Request,
    },
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::validate::Validate;

// ---

/// JSON body that has been decoded and then passed [`Validate`].
pub struct ValidatedJson<T: Validate>(pub T::Validated);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // ---
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(ValidatedJson(body.validate()?))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    // ---
    let kind = match &rejection {
        JsonRejection::JsonDataError(_) => "value_error",
        JsonRejection::JsonSyntaxError(_) => "json_invalid",
        JsonRejection::MissingJsonContentType(_) => "content_type",
        _ => "body_error",
    };
    ApiError::validation(&["body"], rejection.body_text(), kind)
}

/// Map a query-string rejection onto a 422.
pub fn query_rejection(rejection: QueryRejection) -> ApiError {
    ApiError::validation(&["query"], rejection.body_text(), "value_error")
}

/// Map a path-parameter rejection onto a 422 naming `param`.
pub fn path_rejection(param: &str, rejection: PathRejection) -> ApiError {
    ApiError::validation(&["path", param], rejection.body_text(), "int_parsing")
}
