#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "Personal task management over HTTP: account registration and login with signed"]
#![doc = "session tokens, and owner-scoped CRUD on tasks. The binary (`main.rs`) wires"]
#![doc = "configuration, the storage backend and the routes defined here into a server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
