//! Result type and errors surfaced by the recovery workflows.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("user with this email does not exist")]
    UserNotFound,
    #[error("please, enter valid credentials")]
    WrongCredentials,
    #[error("account needs to be confirmed via email")]
    AccountNotConfirmed,
    #[error("account inactive")]
    AccountInactive,
    #[error("channel slug is missing or not configured")]
    InvalidChannel,
    #[error("redirect url is not allowed")]
    InvalidRedirectUrl,
    #[error("invalid or expired one time passcode supplied")]
    InvalidOrExpiredCode,
    #[error("password does not comply with the policy")]
    PasswordPolicy(Vec<String>),
    #[error("{0}")]
    User(crate::user::error::Error),
    #[error("{0}")]
    Otp(crate::otp::error::Error),
    #[error("{0}")]
    Token(#[from] crate::token::error::Error),
    #[error("{0}")]
    Smtp(#[from] crate::smtp::Error),
    #[error("{0}")]
    Tera(#[from] tera::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "rabbitmq")]
    #[error("{0}")]
    Deadpool(#[from] deadpool_lapin::PoolError),
    #[cfg(feature = "rabbitmq")]
    #[error("{0}")]
    Lapin(#[from] lapin::Error),
    #[cfg(test)]
    #[error("unexpected error")]
    Debug,
}

impl From<crate::user::error::Error> for Error {
    fn from(error: crate::user::error::Error) -> Self {
        if error.is_not_found() {
            return Self::UserNotFound;
        }

        Self::User(error)
    }
}

impl From<crate::otp::error::Error> for Error {
    fn from(error: crate::otp::error::Error) -> Self {
        use crate::otp::error::Error as OtpError;

        // a missing and an already redeemed passcode are indistinguishable on purpose
        match error {
            OtpError::NotFound | OtpError::AlreadyUsed => Self::InvalidOrExpiredCode,
            other => Self::Otp(other),
        }
    }
}

impl Error {
    /// Returns the stable code identifying the error towards the caller.
    pub fn code(&self) -> &'static str {
        match self {
            Error::UserNotFound => "user_not_found",
            Error::WrongCredentials => "wrong_credentials",
            Error::AccountNotConfirmed => "account_not_confirmed",
            Error::AccountInactive => "account_inactive",
            Error::InvalidChannel => "missing_channel_slug",
            Error::InvalidRedirectUrl => "invalid_redirect_url",
            Error::InvalidOrExpiredCode => "invalid_otp_supplied",
            Error::PasswordPolicy(_) => "invalid_password",
            _ => "unknown",
        }
    }
}
