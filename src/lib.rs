// Root of the `footpath` crate: metro footpath allocation.
// The store feeds the route generator and the session stages; the engine
// freezes one assignment per session; the server exposes it all over HTTP.
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod models;
pub mod server;
mod server_handlers;
pub mod session;
pub mod store;

pub use error::{FootpathError, Result};
/// HTTP server entry point (reexport for `main`)
pub use server::run_server;
