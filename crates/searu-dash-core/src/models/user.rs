use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST users`.
#[derive(Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An account as echoed back by the server (its password hash is ignored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}
