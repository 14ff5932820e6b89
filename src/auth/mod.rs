//! Access control.
//!
//! Two independent layers:
//! - a pre-shared key that the trusted frontend/proxy presents on every `/api`
//!   request, compared in constant time to mitigate timing attacks;
//! - the admin gate, which maps the viewer's email (supplied by the external
//!   identity provider through the `x-viewer-email` header) to admin rights.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, AppError, ErrorDetails, ErrorResponse};

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the authenticated viewer's email.
pub const VIEWER_EMAIL_HEADER: &str = "x-viewer-email";

/// Returns true when `email` is the administrator address (case-insensitive).
pub fn is_admin(email: Option<&str>, admin_email: &str) -> bool {
    match email.map(str::trim) {
        Some(email) if !email.is_empty() => {
            email.to_lowercase() == admin_email.trim().to_lowercase()
        }
        _ => false,
    }
}

/// The viewer making a request, as reported by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub email: Option<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self { email: None }
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(VIEWER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Viewer { email })
    }
}

/// Admin gate bound to the configured administrator address.
#[derive(Debug, Clone)]
pub struct AdminGate {
    admin_email: String,
}

impl AdminGate {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }

    pub fn is_admin(&self, viewer: &Viewer) -> bool {
        is_admin(viewer.email.as_deref(), &self.admin_email)
    }

    /// Fail with an authorization error unless the viewer is the admin.
    pub fn require_admin(&self, viewer: &Viewer) -> Result<(), AppError> {
        if self.is_admin(viewer) {
            Ok(())
        } else {
            tracing::warn!(email = ?viewer.email, "Rejected admin-only operation");
            Err(AppError::admin_required())
        }
    }
}

/// PSK authentication layer function that takes the expected PSK as a parameter.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // If no PSK is configured, allow all requests (dev mode)
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    match provided {
        Some(provided_key) => {
            if constant_time_compare(&provided_key, &expected) {
                next.run(request).await
            } else {
                unauthorized_response("Invalid API key")
            }
        }
        None => {
            // Also check Authorization header as bearer token
            let bearer = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.to_string());

            match bearer {
                Some(bearer_key) if constant_time_compare(&bearer_key, &expected) => {
                    next.run(request).await
                }
                _ => unauthorized_response("Missing or invalid API key"),
            }
        }
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
