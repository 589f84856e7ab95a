pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod password;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
