//! Exchanging credentials for a session cookie.
//!
//! `LoginFlow::login` posts the credentials to `users/login` and turns the
//! `token` field of the reply into a `Set-Cookie` value. It never fails on
//! the shape of the reply: a body without a token still produces a cookie,
//! holding the placeholder `undefined`, which the session reader later
//! treats as anonymous.

use std::fmt;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, ApiResponse, RequestSpec};
use crate::config::Config;
use crate::session::{clear_session_cookie, session_cookie, CookieEncoding};

pub const LOGIN_PATH: &str = "users/login";
pub const LOGOUT_PATH: &str = "users/logout";

/// Cookie value written when the login reply carries no token.
pub const MISSING_TOKEN_VALUE: &str = "undefined";

/// Username and password as typed by the user. Consumed by `login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Value for the page response's `Set-Cookie` header
    pub set_cookie: String,
    /// False when the reply had no token and the placeholder was written
    pub established: bool,
    /// The server's `{"msg": ...}` error, if it sent one
    pub remote_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogoutOutcome {
    /// Expires the session cookie
    pub set_cookie: String,
    pub response: ApiResponse,
}

#[derive(Clone)]
pub struct LoginFlow {
    client: ApiClient,
    encoding: CookieEncoding,
}

impl LoginFlow {
    pub fn new(client: ApiClient, encoding: CookieEncoding) -> Self {
        Self { client, encoding }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(ApiClient::from_config(config)?, config.cookie_encoding))
    }

    /// Submit credentials and build the session cookie from the reply.
    pub async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, ApiError> {
        info!(username = %credentials.username, "Submitting login");
        let response = self.client.post(LOGIN_PATH, &credentials, None).await?;
        drop(credentials);

        // An empty token would read back as a cleared cookie
        let token = response
            .field("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty());

        match token {
            Some(token) => {
                let set_cookie = session_cookie(&self.encoding.encode(token));
                info!(encoding = ?self.encoding, "Login successful, session cookie issued");
                Ok(LoginOutcome {
                    set_cookie,
                    established: true,
                    remote_error: None,
                })
            }
            None => {
                let remote_error = response.error_message().map(str::to_string);
                warn!(
                    raw_body = response.is_raw(),
                    remote_error = remote_error.as_deref().unwrap_or(""),
                    "Login reply has no token, writing placeholder session cookie"
                );
                Ok(LoginOutcome {
                    set_cookie: session_cookie(MISSING_TOKEN_VALUE),
                    established: false,
                    remote_error,
                })
            }
        }
    }

    /// Tell the server we're leaving and expire the session cookie.
    pub async fn logout(&self) -> Result<LogoutOutcome, ApiError> {
        let response = self
            .client
            .request(RequestSpec::new(Method::POST, LOGOUT_PATH))
            .await?;
        info!("Logged out, clearing session cookie");
        Ok(LogoutOutcome {
            set_cookie: clear_session_cookie(),
            response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::session_from_cookie_header;
    use crate::token::Token;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// `name=value` part of a `Set-Cookie` value, as a browser would send it back
    fn cookie_pair(set_cookie: &str) -> &str {
        set_cookie.split(';').next().unwrap_or_default()
    }

    async fn login_server(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"username": "alice", "password": "secret"})))
            .respond_with(response)
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn flow(server: &MockServer, encoding: CookieEncoding) -> LoginFlow {
        LoginFlow::new(ApiClient::new(&server.uri()).unwrap(), encoding)
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("alice", "secret"));
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret"));
    }

    #[tokio::test]
    async fn test_raw_encoding_writes_token_verbatim() {
        let server =
            login_server(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"}))).await;

        let outcome = flow(&server, CookieEncoding::Raw)
            .login(Credentials::new("alice", "secret"))
            .await
            .unwrap();
        assert_eq!(outcome.set_cookie, "jwt=abc123; Path=/; HttpOnly");
        assert!(outcome.established);

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_raw_cookie_does_not_round_trip() {
        // The session reader always Base64-decodes, so a raw cookie is lost
        let server =
            login_server(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"}))).await;

        let outcome = flow(&server, CookieEncoding::Raw)
            .login(Credentials::new("alice", "secret"))
            .await
            .unwrap();
        let session = session_from_cookie_header(cookie_pair(&outcome.set_cookie));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_base64_cookie_round_trips() {
        let server =
            login_server(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"}))).await;

        let outcome = flow(&server, CookieEncoding::Base64)
            .login(Credentials::new("alice", "secret"))
            .await
            .unwrap();
        assert_eq!(outcome.set_cookie, "jwt=YWJjMTIz; Path=/; HttpOnly");

        let session = session_from_cookie_header(cookie_pair(&outcome.set_cookie));
        assert_eq!(session.token(), Some(&Token::new("abc123")));
    }

    #[tokio::test]
    async fn test_non_json_reply_writes_placeholder() {
        for encoding in [CookieEncoding::Raw, CookieEncoding::Base64] {
            let server = login_server(
                ResponseTemplate::new(500).set_body_string("Internal Server Error"),
            )
            .await;

            let outcome = flow(&server, encoding)
                .login(Credentials::new("alice", "secret"))
                .await
                .unwrap();
            assert_eq!(outcome.set_cookie, "jwt=undefined; Path=/; HttpOnly");
            assert!(!outcome.established);
            assert_eq!(outcome.remote_error, None);

            // The placeholder never reads back as a session
            let session = session_from_cookie_header(cookie_pair(&outcome.set_cookie));
            assert!(!session.is_authenticated());
        }
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_remote_error() {
        let server =
            login_server(ResponseTemplate::new(200).set_body_json(json!({"msg": "unauthorized"})))
                .await;

        let outcome = flow(&server, CookieEncoding::Base64)
            .login(Credentials::new("alice", "secret"))
            .await
            .unwrap();
        assert_eq!(outcome.set_cookie, "jwt=undefined; Path=/; HttpOnly");
        assert_eq!(outcome.remote_error.as_deref(), Some("unauthorized"));
    }

    #[tokio::test]
    async fn test_empty_token_writes_placeholder() {
        let server =
            login_server(ResponseTemplate::new(200).set_body_json(json!({"token": ""}))).await;

        let outcome = flow(&server, CookieEncoding::Base64)
            .login(Credentials::new("alice", "secret"))
            .await
            .unwrap();
        assert_eq!(outcome.set_cookie, "jwt=undefined; Path=/; HttpOnly");
        assert!(!outcome.established);
        assert_eq!(outcome.remote_error, None);

        let session = session_from_cookie_header(cookie_pair(&outcome.set_cookie));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_encoding() {
        let server =
            login_server(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"}))).await;
        let config = Config {
            api_base: server.uri(),
            cookie_encoding: CookieEncoding::Raw,
            request_timeout_secs: Some(5),
        };

        let outcome = LoginFlow::from_config(&config)
            .unwrap()
            .login(Credentials::new("alice", "secret"))
            .await
            .unwrap();
        assert_eq!(outcome.set_cookie, "jwt=abc123; Path=/; HttpOnly");
    }

    #[tokio::test]
    async fn test_logout_expires_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = flow(&server, CookieEncoding::Base64).logout().await.unwrap();
        assert_eq!(outcome.set_cookie, "jwt=; Path=/; HttpOnly; Max-Age=0");
        assert_eq!(outcome.response, ApiResponse::Raw(String::new()));

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let flow = LoginFlow::new(ApiClient::new("http://127.0.0.1:1").unwrap(), CookieEncoding::Base64);
        let err = flow.login(Credentials::new("alice", "secret")).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
