use super::{
    ChannelResolver, EventService, NotifyService, PasswordPolicy, RecoveryApplication,
    RedirectValidator,
};
use crate::otp::repository::OtpRepository;
use crate::recovery::domain::Session;
use crate::recovery::error::{Error, Result};
use crate::token::service::TokenService;
use crate::user::domain::{Email, Password};
use crate::user::repository::UserRepository;
use tracing::instrument;

impl<O, U, T, C, R, N, P, B> RecoveryApplication<O, U, T, C, R, N, P, B>
where
    O: OtpRepository,
    U: UserRepository,
    T: TokenService,
    C: ChannelResolver,
    R: RedirectValidator,
    N: NotifyService,
    P: PasswordPolicy,
    B: EventService,
{
    /// Authenticates the user behind the given email and issues a fresh session.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: Email, password: Password) -> Result<Session> {
        let user = match self.user_repo.find_by_email(&email).await {
            Ok(user) => user,
            Err(error) if error.is_not_found() => return Err(Error::WrongCredentials),
            Err(error) => return Err(error.into()),
        };

        if !user.password_matches(&password) {
            return Err(Error::WrongCredentials);
        }

        if !user.profile.is_active && user.profile.last_login.is_none() {
            return Err(Error::AccountNotConfirmed);
        }

        if !user.profile.is_active {
            return Err(Error::AccountInactive);
        }

        self.issue_session(user).await
    }
}
