use super::{
    ChannelResolver, EventService, NotifyService, PasswordPolicy, RecoveryApplication,
    RedirectValidator,
};
use crate::otp::domain::OtpCode;
use crate::otp::repository::OtpRepository;
use crate::recovery::domain::Session;
use crate::recovery::error::{Error, Result};
use crate::token::service::TokenService;
use crate::user::domain::{Email, Password, PasswordHash, Salt};
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
    /// Redeems the given passcode by setting the given password and issuing a fresh session.
    ///
    /// The passcode is consumed right after the password update and before the session issuance,
    /// so a code never outlives its redemption no matter how the latter ends.
    #[instrument(skip(self, code, new_password))]
    pub async fn set_password_by_code(
        &self,
        email: Email,
        code: OtpCode,
        new_password: Password,
    ) -> Result<Session> {
        let mut user = self.user_repo.find_by_email(&email).await?;
        let otp = self.otp_repo.find(&code, user.id).await?;

        if otp.is_used() {
            return Err(Error::InvalidOrExpiredCode);
        }

        if otp.is_expired(self.otp_timeout) {
            return Err(Error::InvalidOrExpiredCode);
        }

        self.policy_srv.validate(&new_password, &user)?;

        let salt = Salt::with_length(self.salt_length)?;
        user.credentials.password = PasswordHash::with_salt(&new_password, &salt);
        self.user_repo.save(&user).await?;

        self.event_srv.emit_password_reset(&user).await?;

        self.otp_repo.mark_used(&otp).await?;

        self.issue_session(user).await
    }
}
