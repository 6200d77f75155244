pub mod login;
pub mod redeem;
pub mod request;

use super::domain::{ChannelSlug, NotifyEvent, RedirectUrl, ResetPayload, Session, SiteContext};
use super::error::Result;
use crate::otp::repository::OtpRepository;
use crate::token::domain::{Csrf, TokenKind};
use crate::token::service::TokenService;
use crate::user::domain::{Password, User};
use crate::user::repository::UserRepository;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::instrument;

/// Resolves the channel a recovery notification must be delivered through.
pub trait ChannelResolver {
    fn resolve(&self, slug: Option<ChannelSlug>, is_staff: bool) -> Result<Option<ChannelSlug>>;
}

/// Decides whether a redirect url is an acceptable destination for a recovery email.
pub trait RedirectValidator {
    fn validate(&self, url: &RedirectUrl) -> Result<()>;
}

/// Delivers recovery notifications to their recipient.
pub trait NotifyService {
    fn notify(
        &self,
        event: NotifyEvent,
        payload: &ResetPayload,
        channel: Option<&ChannelSlug>,
    ) -> Result<()>;
}

/// Performs user aware validations over a new password.
pub trait PasswordPolicy {
    fn validate(&self, password: &Password, user: &User) -> Result<()>;
}

/// Records domain events for auditing purposes.
#[async_trait]
pub trait EventService {
    async fn emit_password_reset(&self, user: &User) -> Result<()>;
}

pub struct RecoveryApplication<O, U, T, C, R, N, P, B> {
    pub otp_repo: Arc<O>,
    pub user_repo: Arc<U>,
    pub token_srv: Arc<T>,
    pub channel_srv: Arc<C>,
    pub redirect_srv: Arc<R>,
    pub notify_srv: Arc<N>,
    pub policy_srv: Arc<P>,
    pub event_srv: Arc<B>,
    pub site: SiteContext,
    pub otp_length: usize,
    pub otp_timeout: Duration,
    pub csrf_length: usize,
    pub salt_length: usize,
}

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
    /// Mints the access, refresh and csrf tokens for the given user and stamps its last login.
    #[instrument(skip(self, user))]
    pub(super) async fn issue_session(&self, mut user: User) -> Result<Session> {
        let csrf = Csrf::with_length(self.csrf_length)?;
        let subject = user.id.to_string();

        let access = self.token_srv.issue(TokenKind::Access, &subject, None).await?;
        let refresh = self
            .token_srv
            .issue(TokenKind::Refresh, &subject, Some(&csrf))
            .await?;

        user.profile.last_login = Some(SystemTime::now());
        self.user_repo.save(&user).await?;

        Ok(Session {
            user,
            access_token: access.into(),
            refresh_token: refresh.into(),
            csrf_token: csrf,
        })
    }
}
