//! # Auth Handlers
//!
//! Mock login against the seeded users table: plaintext comparison, no
//! session, no token. The client stores the returned user and sends its
//! email/role back as plain headers, which the server trusts at face
//! value. Explicitly not an auth boundary.

use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::dto::{LoginRequest, UserResponse};
use crate::error::ApiError;
use crate::AppState;

/// `POST /auth/login` with `{email, password}`.
///
/// Unknown email or wrong password → 401; a soft-deleted account → 403.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.db.users().get_by_email(request.email.trim()).await?;

    let Some(user) = user else {
        warn!(email = %request.email, "Login failed: unknown email");
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    if user.password != request.password {
        warn!(email = %user.email, "Login failed: wrong password");
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    if user.is_deleted {
        warn!(email = %user.email, "Login rejected: account disabled");
        return Err(ApiError::forbidden("Account is disabled"));
    }

    info!(email = %user.email, role = ?user.role, "User logged in");
    Ok(Json(user.into()))
}
