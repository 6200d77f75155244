//! Result type and errors related to user stuff.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("email regex did not match")]
    NotAnEmail,
    #[error("password shape is not valid")]
    NotAPassword,
    #[error("salt is not alphanumeric")]
    NotASalt,
    #[error("user not found")]
    NotFound,
    #[cfg(feature = "postgres")]
    #[error("{0}")]
    Sql(#[from] sqlx::error::Error),
    #[cfg(test)]
    #[error("unexpected error")]
    Debug,
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}
