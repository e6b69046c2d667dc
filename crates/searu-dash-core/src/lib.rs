//! Core library for searu-dash.
//!
//! The session and request layer of the searu admin dashboard:
//!
//! - `api`: the `ApiClient` request primitive and typed resource helpers
//! - `session`: the `jwt` cookie and the per-request `Session` derived from it
//! - `login`: `LoginFlow`, turning credentials into a session cookie
//! - `models`: API resource types
//! - `config`: base address and cookie policy

pub mod api;
pub mod config;
pub mod login;
pub mod models;
pub mod session;
pub mod token;

pub use api::{ApiClient, ApiError, ApiResponse, RequestSpec};
pub use config::Config;
pub use login::{Credentials, LoginFlow, LoginOutcome, LogoutOutcome};
pub use session::{derive_session, Session, SessionError};
pub use token::Token;
