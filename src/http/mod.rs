//! HTTP server module.
//!
//! Plain HTTP only: health checks come from load balancers on a private
//! network. The server drains in-flight checks on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
