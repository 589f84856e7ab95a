use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::User;

/// Request body for user registration, JSON or urlencoded. Missing and
/// `null` fields arrive as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 201 body for a successful registration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user_id: Uuid,
}

/// Public part of the user returned by the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            name: u.name,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub success: bool,
    pub count: usize,
    pub users: Vec<PublicUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_fields_become_empty() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"name":null,"email":"a@b.com"}"#).unwrap();
        assert_eq!(req.name, "");
        assert_eq!(req.email, "a@b.com");
        assert_eq!(req.password, "");
    }

    #[test]
    fn non_string_field_is_rejected() {
        assert!(serde_json::from_str::<RegisterRequest>(r#"{"name":5}"#).is_err());
    }
}
