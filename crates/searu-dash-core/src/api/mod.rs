//! REST API client module for the searu API.
//!
//! This module provides the `ApiClient` for talking to the API server:
//! a single lenient `request` primitive, the verb helpers built on it,
//! and typed helpers for the resource endpoints the dashboard pages use.
//!
//! Authenticated calls carry `Authorization: Token <token>`.

pub mod client;
pub mod error;
pub mod resources;
pub mod response;

pub use client::{ApiClient, RequestSpec};
pub use error::ApiError;
pub use response::ApiResponse;
