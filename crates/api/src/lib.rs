//! HTTP API layer for ajoclub.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: uploads, contributions, investments, users, support
//! - **Extractors**: identity context, admin gating
//! - **Middleware**: actor resolution, application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, identity_middleware};
