//! On-disk cookie jar.
//!
//! The terminal front end stands in for the browser: `Set-Cookie` values
//! produced by the login flow are stored here, and replayed as a `Cookie`
//! header on the next invocation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Jar file name in cache directory
const JAR_FILE: &str = "cookies.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub stored_at: DateTime<Utc>,
}

/// A `Set-Cookie` value reduced to what the jar cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    /// `Max-Age` of zero or less
    pub expired: bool,
}

impl SetCookie {
    pub fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let expired = parts.any(|attr| match attr.split_once('=') {
            Some((key, age)) if key.trim().eq_ignore_ascii_case("max-age") => {
                age.trim().parse::<i64>().map(|age| age <= 0).unwrap_or(false)
            }
            _ => false,
        });

        Some(Self {
            name: name.to_string(),
            value: value.trim().to_string(),
            expired,
        })
    }
}

pub struct CookieJar {
    cache_dir: PathBuf,
    cookies: Vec<StoredCookie>,
}

impl CookieJar {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            cookies: Vec::new(),
        }
    }

    /// Load the jar from disk. Returns false when there was nothing saved.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.jar_path();
        if !path.exists() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read cookie jar")?;
        self.cookies = serde_json::from_str(&contents).context("Failed to parse cookie jar")?;
        debug!(count = self.cookies.len(), "Loaded cookie jar");
        Ok(true)
    }

    pub fn save(&self) -> Result<()> {
        let path = self.jar_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.cookies)?;
        std::fs::write(path, contents).context("Failed to write cookie jar")?;
        Ok(())
    }

    /// Store or expire a cookie the way a browser would.
    pub fn apply(&mut self, set_cookie: &str) -> Result<()> {
        let cookie = SetCookie::parse(set_cookie)
            .ok_or_else(|| anyhow::anyhow!("Malformed Set-Cookie value"))?;

        self.cookies.retain(|c| c.name != cookie.name);
        if cookie.expired {
            debug!(name = %cookie.name, "Cookie expired");
        } else {
            self.cookies.push(StoredCookie {
                name: cookie.name,
                value: cookie.value,
                stored_at: Utc::now(),
            });
        }
        Ok(())
    }

    /// The `Cookie` request header for everything in the jar.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn get(&self, name: &str) -> Option<&StoredCookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    fn jar_path(&self) -> PathBuf {
        self.cache_dir.join(JAR_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searu_dash_core::session::{clear_session_cookie, session_cookie, session_from_cookie_header};
    use searu_dash_core::Token;

    #[test]
    fn test_parse_set_cookie() {
        let cookie = SetCookie::parse("jwt=YWJjMTIz; Path=/; HttpOnly").unwrap();
        assert_eq!(cookie.name, "jwt");
        assert_eq!(cookie.value, "YWJjMTIz");
        assert!(!cookie.expired);

        let cookie = SetCookie::parse("jwt=; Path=/; HttpOnly; Max-Age=0").unwrap();
        assert_eq!(cookie.value, "");
        assert!(cookie.expired);

        assert!(SetCookie::parse("no-equals-sign; Path=/").is_none());
        assert!(SetCookie::parse("=value").is_none());
    }

    #[test]
    fn test_login_then_logout() {
        let dir = tempfile::tempdir().unwrap();
        let mut jar = CookieJar::new(dir.path().to_path_buf());

        jar.apply(&session_cookie("YWJjMTIz")).unwrap();
        jar.apply("theme=dark; Path=/").unwrap();
        assert_eq!(jar.cookie_header(), "jwt=YWJjMTIz; theme=dark");
        let session = session_from_cookie_header(&jar.cookie_header());
        assert_eq!(session.token(), Some(&Token::new("abc123")));

        jar.apply(&clear_session_cookie()).unwrap();
        assert!(jar.get("jwt").is_none());
        assert!(!session_from_cookie_header(&jar.cookie_header()).is_authenticated());
    }

    #[test]
    fn test_new_value_replaces_old() {
        let dir = tempfile::tempdir().unwrap();
        let mut jar = CookieJar::new(dir.path().to_path_buf());
        jar.apply("jwt=first; Path=/").unwrap();
        jar.apply("jwt=second; Path=/").unwrap();
        assert_eq!(jar.cookie_header(), "jwt=second");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut jar = CookieJar::new(dir.path().join("searu-dash"));
        assert!(!jar.load().unwrap());

        jar.apply(&session_cookie("YWJjMTIz")).unwrap();
        jar.save().unwrap();

        let mut reloaded = CookieJar::new(dir.path().join("searu-dash"));
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.get("jwt"), jar.get("jwt"));
        assert_eq!(reloaded.cookie_header(), "jwt=YWJjMTIz");
    }
}
