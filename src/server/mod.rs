//! HTTP server implementation
//!
//! Demo actix-web application putting the authentication middleware in
//! front of a handful of routes.

pub mod builder;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use builder::{ServerBuilder, run_server};
pub use server::HttpServer;
pub use state::AppState;
