use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the store.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,                   // generated on registration
    pub name: String,               // trimmed
    pub email: String,              // trimmed, case preserved, unique
    pub password: String,           // sealed by PasswordStorage, never serialized
    pub created_at: OffsetDateTime, // registration time (UTC)
}
