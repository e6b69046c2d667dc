use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Malformed session cookie: {0}")]
    MalformedCookie(String),

    #[error("Unknown cookie encoding {0:?} (expected \"base64\" or \"raw\")")]
    UnknownEncoding(String),
}
