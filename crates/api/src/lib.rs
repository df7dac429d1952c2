//! Hall pass API server library.
//!
//! Exposes the building blocks (config, state, error handling, the pass
//! actor, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod actor;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
