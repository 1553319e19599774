//! First-run account creation.
//!
//! A fresh database has no users, and there is no sign-up endpoint. When
//! `BOOTSTRAP_USERNAME` and `BOOTSTRAP_PASSWORD` are set, [`ensure_bootstrap_user`]
//! creates that account on startup, but only while the users table is empty.

use taskboard_db::models::user::CreateUser;
use taskboard_db::repositories::UserRepo;
use taskboard_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};

/// Credentials for the first account.
#[derive(Clone)]
pub struct BootstrapAccount {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl std::fmt::Debug for BootstrapAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

impl BootstrapAccount {
    /// Read `BOOTSTRAP_USERNAME`, `BOOTSTRAP_PASSWORD` and the optional
    /// `BOOTSTRAP_EMAIL`. Returns `None` unless both required values are set.
    pub fn from_env() -> Option<Self> {
        let username = non_empty_var("BOOTSTRAP_USERNAME")?;
        let password = non_empty_var("BOOTSTRAP_PASSWORD")?;
        let email = non_empty_var("BOOTSTRAP_EMAIL").unwrap_or_default();
        Some(Self {
            username,
            password,
            email,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Bootstrap password rejected: {0}")]
    WeakPassword(String),

    #[error("Failed to hash bootstrap password: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create `account` if no user exists yet.
///
/// Returns `true` when a user was created.
pub async fn ensure_bootstrap_user(
    pool: &DbPool,
    account: &BootstrapAccount,
) -> Result<bool, BootstrapError> {
    if UserRepo::count(pool).await? > 0 {
        tracing::debug!("Users already present, skipping bootstrap account");
        return Ok(false);
    }

    validate_password_strength(&account.password, MIN_PASSWORD_LENGTH)
        .map_err(BootstrapError::WeakPassword)?;
    let password_hash =
        hash_password(&account.password).map_err(|e| BootstrapError::Hash(e.to_string()))?;

    let input = CreateUser {
        username: account.username.clone(),
        first_name: String::new(),
        last_name: String::new(),
        email: account.email.clone(),
        password_hash,
    };
    let user = UserRepo::create(pool, &input).await?;
    tracing::info!(user_id = user.id, username = %user.username, "Created bootstrap account");
    Ok(true)
}
