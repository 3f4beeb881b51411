use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use crate::swapi::SwapiError;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";
pub const MSG_INVALID_NUMBER: &str = "Enter a number.";
pub const MSG_TOO_LONG: &str = "Ensure this field has no more than 255 characters.";
pub const MSG_NULL_CHAR: &str = "Null characters are not allowed.";

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Per-field validation messages, serialized as `{"field": ["msg", ...]}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> ApiResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("{message}")]
    Duplicate { field: &'static str, message: String },

    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,

    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,

    #[error("{0}")]
    InvalidToken(&'static str),

    #[error("You do not have permission to perform this action.")]
    PermissionDenied,

    #[error("Not found.")]
    NotFound,

    #[error("JSON parse error - {0}")]
    MalformedBody(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("upstream planet service failed: {0}")]
    Upstream(#[from] SwapiError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::Duplicate { .. }
            | ApiError::InvalidCredentials
            | ApiError::MalformedBody(_)
            | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::NotAuthenticated | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { entity, field } => ApiError::Duplicate {
                field,
                message: format!("{entity} with this {field} already exists."),
            },
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(r) => ApiError::UnsupportedMediaType(r.body_text()),
            other => ApiError::MalformedBody(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errors) => json!(errors),
            ApiError::Duplicate { field, message } => json!({ *field: [message] }),
            ApiError::InvalidCredentials => json!({ "non_field_errors": [self.to_string()] }),
            ApiError::Upstream(e) => {
                tracing::error!(error = %e, "swapi lookup failed");
                json!({ "detail": "Planet data service is unavailable." })
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                json!({ "detail": "A server error occurred." })
            }
            _ => json!({ "detail": self.to_string() }),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
        }
        response
    }
}
