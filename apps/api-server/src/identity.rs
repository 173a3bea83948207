//! # Request Identity
//!
//! Extracts the caller's identity from plain `X-User-Email` and
//! `X-User-Role` headers, trusted at face value. This is explicitly NOT an
//! auth boundary: the client is expected to set the headers after its mock
//! login, and nothing verifies them. Role gating here filters responses
//! (cost prices) and guards soft deletes, no more.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use billbook_core::Role;

/// Header carrying the caller's email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Header carrying the caller's role (`admin` or `staff`).
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The caller, as claimed by the request headers.
#[derive(Debug, Clone)]
pub struct Identity {
    pub email: String,
    pub role: Role,
}

impl Identity {
    /// Admin gate for destructive routes (soft deletes).
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Admin role required"))
        }
    }
}

/// Injects an [`Identity`] extension into every request.
///
/// Absent or unknown headers degrade to an anonymous staff identity;
/// nothing is rejected here.
pub async fn identity_middleware(mut request: Request<Body>, next: Next) -> Response {
    let email = request
        .headers()
        .get(USER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("anonymous")
        .to_string();

    let role = match request
        .headers()
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) if value.trim().eq_ignore_ascii_case("admin") => Role::Admin,
        _ => Role::Staff,
    };

    request.extensions_mut().insert(Identity { email, role });

    next.run(request).await
}

// =============================================================================
// Unit Tests
// =============================================================================
