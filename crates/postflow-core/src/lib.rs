//! Core library for postflow.
//!
//! Provides the authenticated API client for the content automation
//! backend, the session storage port and its implementations, route
//! exemption handling, configuration and the API data models.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod routing;
pub mod utils;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{AuthState, Session, SessionStore};
pub use config::Config;
pub use routing::{Location, MemoryLocation, Navigate, RouteExemptions, LOGIN_ROUTE};
