//! # User Repository
//!
//! Login lookups for the mock auth endpoint. Users are seeded by migration;
//! there is no CRUD surface.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use billbook_core::User;

pub(crate) const USER_COLUMNS: &str = "id, name, email, password, role, is_deleted";

/// Repository for user lookups.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by email - the login key. Returns soft-deleted users
    /// too; the auth endpoint turns those into a 403.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        debug!(email = %email, "Looking up user");

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
