//! REST API client module for the content automation backend.
//!
//! This module provides the `ApiClient` for talking to the backend:
//! accounts, social connections, topics, schedules, generated posts,
//! plans and the dashboard overview.
//!
//! Requests carry a bearer token read from the session store. A 401 on a
//! route that requires a session clears the store and sends the user to
//! the login route.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::{ApiClient, ApiClientBuilder, RequestOptions};
pub use error::{ApiError, FALLBACK_ERROR_MESSAGE};
pub use reqwest::Method;
