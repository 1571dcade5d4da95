//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. The status code tells the delivering
//! trigger what to do: 4xx bodies are never redelivered, 5xx bodies are.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mediaguard_core::{AppError, ErrorMetadata};
use serde::Serialize;
use std::error::Error as StdError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether redelivering the same event may succeed
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from mediaguard-core)
///
/// The cause chain is left out of the body unless `expose_details` is set.
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub expose_details: bool,
}

impl HttpAppError {
    /// Include the cause chain in the body. Handlers enable this outside production.
    pub fn with_details(mut self, expose: bool) -> Self {
        self.expose_details = expose;
        self
    }
}

impl From<AppError> for HttpAppError {
    fn from(error: AppError) -> Self {
        HttpAppError {
            error,
            expose_details: false,
        }
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err)).into()
    }
}

/// Full cause chain, outermost first.
fn source_chain(error: &AppError) -> Option<String> {
    let mut causes = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    if causes.is_empty() {
        None
    } else {
        Some(causes.join(": "))
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // The dispatcher has already logged workflow failures inside the invocation span
        if matches!(app_error, AppError::InvalidInput(_)) {
            tracing::debug!(error = %app_error, "Rejected request body");
        }

        let details = if self.expose_details {
            source_chain(app_error)
        } else {
            None
        };

        let body = Json(ErrorResponse {
            error: app_error.to_string(),
            details,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaguard_core::RemediationStep;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = HttpAppError::from(AppError::InvalidInput("not json".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_remediation_failure_is_server_error() {
        let response = HttpAppError::from(AppError::remediation(
            RemediationStep::FetchPlaceholder,
            anyhow::anyhow!("placeholder missing"),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_classification_failure_is_bad_gateway() {
        let response =
            HttpAppError::from(AppError::classification(anyhow::anyhow!("quota"))).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_source_chain() {
        let err = AppError::pass_through(
            anyhow::anyhow!("connection refused").context("Failed to send request"),
        );
        let chain = source_chain(&err).unwrap();
        assert!(chain.contains("Failed to send request"), "got: {}", chain);
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let HttpAppError { error, .. } = anyhow::anyhow!("boom").into();
        assert!(matches!(error, AppError::Internal(_)));
    }

    async fn body_json(error: HttpAppError) -> serde_json::Value {
        let bytes = axum::body::to_bytes(error.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_details_only_when_exposed() {
        let error = || {
            AppError::pass_through(
                anyhow::anyhow!("connection refused").context("Failed to send request"),
            )
        };

        let hidden = body_json(HttpAppError::from(error())).await;
        assert!(hidden.get("details").is_none());
        assert_eq!(hidden["code"], "PASS_THROUGH_FAILED");

        let shown = body_json(HttpAppError::from(error()).with_details(true)).await;
        let details = shown["details"].as_str().unwrap();
        assert!(details.contains("Failed to send request"), "got: {}", details);
    }
}
