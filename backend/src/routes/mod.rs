//! Wire types and paths of the dashboard API.
//!
//! Everything here is plain serde data so it can be shared by the HTTP layer,
//! background jobs and tests without pulling in axum.

pub mod forecast;
pub mod history;
pub mod settings;
pub mod training;

pub const GET_HEALTH: &str = "/health";
pub const GET_TEST: &str = "/api/test";
