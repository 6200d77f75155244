//! Result type and errors related to token stuff.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("token regex did not match")]
    NotAToken,
    #[error("csrf token must be a non empty alphanumeric string")]
    NotACsrf,
    #[error("token does no longer exist")]
    RejectedToken,
    #[error("token payload mismatch")]
    Collision,
    #[error("token is not of the expected kind")]
    WrongToken,
    #[error("{0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("{0}")]
    Cache(#[from] crate::cache::Error),
    #[cfg(test)]
    #[error("unexpected error")]
    Debug,
}
