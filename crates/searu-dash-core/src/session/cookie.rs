use std::collections::HashMap;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::SessionError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "jwt";

/// How the token is written into the cookie value.
///
/// The session reader always Base64-decodes, so only `Base64` round-trips.
/// `Raw` reproduces the older dashboard, which stored the token as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookieEncoding {
    #[default]
    Base64,
    Raw,
}

impl CookieEncoding {
    pub fn encode(&self, token: &str) -> String {
        match self {
            CookieEncoding::Base64 => STANDARD.encode(token),
            CookieEncoding::Raw => token.to_string(),
        }
    }
}

impl FromStr for CookieEncoding {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(CookieEncoding::Base64),
            "raw" => Ok(CookieEncoding::Raw),
            _ => Err(SessionError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Build the `Set-Cookie` value establishing a session.
///
/// No `Secure`, `SameSite` or lifetime attributes: the cookie lives for the
/// browser session.
pub fn session_cookie(value: &str) -> String {
    format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE_NAME, value)
}

/// Build the `Set-Cookie` value that expires the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE_NAME)
}

/// Parse a `Cookie` request header into name -> value.
///
/// Pairs are `;`-separated and split on the first `=`. Names and values are
/// trimmed, a quoted value loses its quotes, and percent-escapes are decoded
/// when they form valid UTF-8. The first occurrence of a name wins; pairs
/// without `=` are skipped.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    for pair in header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || cookies.contains_key(name) {
            continue;
        }

        let mut value = value.trim();
        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            value = &value[1..value.len() - 1];
        }

        cookies.insert(name.to_string(), unescape(value));
    }

    cookies
}

fn unescape(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}
