//! User registration service: a validate-then-insert REST handler over a
//! lazily managed store session, plus a terminal form client.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod users;
