// handlers/public/mod.rs - Handlers that never require authentication
//
// Token acquisition and liveness. Static pages are served straight from disk
// by the router and have no handler here.

pub mod health;
pub mod login;

pub use health::health;
pub use login::login;
