use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, warn};
use uuid::Uuid;

use super::{dto::RegisterRequest, password::PasswordStorage, repo_types::User};
use crate::{
    error::ApiError,
    store::{StoreError, UserStore},
};

pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_INVALID_EMAIL: &str = "Invalid email format";
pub const MSG_EMAIL_TAKEN: &str = "Email already registered";
pub const MSG_SERVER_ERROR: &str = "Server error occurred";
pub const MSG_LIST_FAILED: &str = "Error fetching users";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Input that passed validation, trimmed and ready to persist.
#[derive(Debug, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate(req: &RegisterRequest) -> Result<Registration, ApiError> {
    let name = req.name.trim();
    let email = req.email.trim();

    if name.is_empty() || email.is_empty() || req.password.trim().is_empty() {
        return Err(ApiError::InvalidInput(MSG_FIELDS_REQUIRED));
    }
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::InvalidInput(MSG_INVALID_EMAIL));
    }

    Ok(Registration {
        name: name.to_string(),
        email: email.to_string(),
        password: req.password.clone(),
    })
}

/// Duplicate check followed by insert. The two steps are not atomic; a
/// concurrent insert of the same email is caught by the store's uniqueness
/// guarantee and reported as the same conflict.
pub async fn register_user(
    store: &dyn UserStore,
    passwords: PasswordStorage,
    reg: Registration,
) -> Result<User, ApiError> {
    match store.find_by_email(&reg.email).await {
        Ok(Some(_)) => {
            warn!(email = %reg.email, "email already registered");
            return Err(ApiError::Conflict(MSG_EMAIL_TAKEN));
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(ApiError::Internal(MSG_SERVER_ERROR));
        }
    }

    let password = passwords.seal(&reg.password).map_err(|e| {
        error!(error = %e, "sealing password failed");
        ApiError::Internal(MSG_SERVER_ERROR)
    })?;

    let user = User {
        id: Uuid::new_v4(),
        name: reg.name,
        email: reg.email,
        password,
        created_at: OffsetDateTime::now_utc(),
    };

    match store.insert(&user).await {
        Ok(u) => Ok(u),
        Err(StoreError::DuplicateEmail) => {
            warn!(email = %user.email, "email registered concurrently");
            Err(ApiError::Conflict(MSG_EMAIL_TAKEN))
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            Err(ApiError::Internal(MSG_SERVER_ERROR))
        }
    }
}

pub async fn list_users(store: &dyn UserStore) -> Result<Vec<User>, ApiError> {
    store.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        ApiError::Internal(MSG_LIST_FAILED)
    })
}
