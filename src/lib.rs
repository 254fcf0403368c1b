pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod input;
pub mod middleware;
pub mod testing;

pub use app::{app, AppState};
