//! Result type and errors related to one time passcodes.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("one time passcode must be a non empty alphanumeric string")]
    NotAPasscode,
    #[error("one time passcode not found")]
    NotFound,
    #[error("one time passcode already used")]
    AlreadyUsed,
    #[error("one time passcode collision")]
    Collision,
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
