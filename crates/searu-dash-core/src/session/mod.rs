//! Session cookie handling.
//!
//! This module provides:
//! - `cookie`: parsing `Cookie` headers and building `Set-Cookie` values
//! - `codec`: deriving the per-request `Session` from inbound headers
//!
//! The `jwt` cookie is the only signal of authentication state. There is no
//! server-side session store and no local expiry check.

pub mod codec;
pub mod cookie;
pub mod error;

pub use codec::{
    decode_cookie_token, derive_session, session_from_cookie_header, try_derive_session,
    try_session_from_cookie_header, Session,
};
pub use cookie::{
    clear_session_cookie, parse_cookie_header, session_cookie, CookieEncoding, SESSION_COOKIE_NAME,
};
pub use error::SessionError;
