#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "Authentication (registration, login, JWT sessions, route guard), task"]
#![doc = "storage and the HTTP routes of the task management API. The binary"]
#![doc = "(`main.rs`) loads configuration, picks a store and runs the server."]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use app::AppState;
pub use error::AppError;
