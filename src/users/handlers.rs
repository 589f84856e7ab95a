use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{PublicUser, RegisterResponse, UserListResponse},
        extractors::RegisterBody,
        services::{self, MSG_LIST_FAILED, MSG_SERVER_ERROR},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    RegisterBody(payload): RegisterBody,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let reg = services::validate(&payload)?;

    let store = state.store.acquire().await.map_err(|e| {
        error!(error = %e, "store unavailable");
        ApiError::Connection(MSG_SERVER_ERROR)
    })?;

    let user = services::register_user(store.as_ref(), state.passwords, reg).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully".into(),
            user_id: user.id,
        }),
    ))
}

/// Unpaginated listing, intended for manual testing.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, ApiError> {
    let store = state.store.acquire().await.map_err(|e| {
        error!(error = %e, "store unavailable");
        ApiError::Connection(MSG_LIST_FAILED)
    })?;

    let users: Vec<PublicUser> = services::list_users(store.as_ref())
        .await?
        .into_iter()
        .map(PublicUser::from)
        .collect();

    Ok(Json(UserListResponse {
        success: true,
        count: users.len(),
        users,
    }))
}
