use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::multipart::MultipartRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// Error body shared by every endpoint: `{"error": <title>, "detail": <message>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, detail) }
    pub fn unauthorized(detail: impl Into<String>) -> Self { Self::new(StatusCode::UNAUTHORIZED, detail) }
    pub fn forbidden(detail: impl Into<String>) -> Self { Self::new(StatusCode::FORBIDDEN, detail) }
    pub fn not_found(detail: impl Into<String>) -> Self { Self::new(StatusCode::NOT_FOUND, detail) }

    fn internal(detail: String) -> Self {
        error!(error = %detail, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let title = self.status.canonical_reason().unwrap_or("Error");
        let body = Json(serde_json::json!({"error": title, "detail": self.detail}));
        let mut resp = (self.status, body).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            resp.headers_mut().insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}

/// Extractor rejections keep their status and text but use the shared body.
macro_rules! from_rejection {
    ($($rejection:ty),+ $(,)?) => {
        $(impl From<$rejection> for JsonApiError {
            fn from(r: $rejection) -> Self {
                Self::new(r.status(), r.body_text())
            }
        })+
    };
}

from_rejection!(JsonRejection, PathRejection, QueryRejection, MultipartRejection);

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => Self::bad_request(m),
            ServiceError::NotFound(m) => Self::not_found(m),
            ServiceError::Conflict(m) => Self::new(StatusCode::CONFLICT, m),
            ServiceError::Forbidden(m) => Self::forbidden(m),
            ServiceError::Storage(m) | ServiceError::Db(m) | ServiceError::Internal(m) => Self::internal(m),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let code = e.code();
        match e {
            AuthError::Validation(m) => Self::bad_request(m),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, "Email already registered"),
            AuthError::Unauthorized => Self::unauthorized("Could not validate credentials"),
            AuthError::Inactive => Self::forbidden("Inactive user"),
            AuthError::HashError(m) | AuthError::TokenError(m) | AuthError::Repository(m) => {
                Self::internal(format!("auth error {code}: {m}"))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("c".into()), StatusCode::CONFLICT),
            (ServiceError::Forbidden("f".into()), StatusCode::FORBIDDEN),
            (ServiceError::Db("d".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[tokio::test]
    async fn json_rejection_keeps_status() {
        use axum::extract::{FromRequest, Request};
        let req = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let rejection = axum::Json::<serde_json::Value>::from_request(req, &()).await.unwrap_err();
        let err = JsonApiError::from(rejection);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(!err.detail.is_empty());
    }

    #[test]
    fn unauthorized_carries_challenge() {
        let resp = JsonApiError::from(AuthError::Unauthorized).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
        assert_eq!(JsonApiError::from(AuthError::Inactive).status, StatusCode::FORBIDDEN);
    }
}
