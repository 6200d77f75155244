use super::{
    ChannelResolver, EventService, NotifyService, PasswordPolicy, RecoveryApplication,
    RedirectValidator,
};
use crate::otp::domain::Otp;
use crate::otp::repository::OtpRepository;
use crate::recovery::domain::{ChannelSlug, NotifyEvent, RedirectUrl, ResetPayload};
use crate::recovery::error::Result;
use crate::token::service::TokenService;
use crate::user::domain::Email;
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
    /// Issues a brand new passcode for the user behind the given email and hands it to the
    /// notification service, embedded in the redirect url. The passcode is never returned to
    /// the caller.
    #[instrument(skip(self))]
    pub async fn request_recovery(
        &self,
        email: Email,
        redirect_to: RedirectUrl,
        channel: Option<ChannelSlug>,
    ) -> Result<()> {
        let user = self.user_repo.find_by_email(&email).await?;

        let channel = self.channel_srv.resolve(channel, user.profile.is_staff)?;
        self.redirect_srv.validate(&redirect_to)?;

        let otp = Otp::new(user.id, self.otp_length)?;
        self.otp_repo.create(&otp).await?;

        let reset_url = redirect_to.with_code(otp.code());
        let payload = ResetPayload::new(&user, otp.code(), channel.as_ref(), reset_url, &self.site);

        self.notify_srv
            .notify(NotifyEvent::for_user(&user), &payload, channel.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use crate::recovery::application::tests::{
        new_recovery_application, new_user, TEST_USER_EMAIL, TEST_USER_ID,
    };
    use crate::recovery::domain::{ChannelSlug, NotifyEvent, RedirectUrl};
    use crate::recovery::error::Error;
    use crate::user::domain::Email;
    use crate::user::error::Error as UserError;
    use crate::user::repository::tests::UserRepositoryMock;
    use std::sync::Arc;

    #[tokio::test]
    async fn request_recovery_must_not_fail() {
        let mut user_repo = UserRepositoryMock::default();
        user_repo.find_by_email_fn = Some(|email: &Email| {
            assert_eq!(email.as_ref(), TEST_USER_EMAIL, "unexpected email");
            Ok(new_user())
        });

        let mut app = new_recovery_application();
        app.user_repo = Arc::new(user_repo);

        let email = Email::try_from(TEST_USER_EMAIL).unwrap();
        let redirect_to = RedirectUrl::try_from("https://shop.test/reset").unwrap();

        app.request_recovery(email, redirect_to, None).await.unwrap();

        let otps = app.otp_repo.owned_by(TEST_USER_ID.into());
        assert_eq!(otps.len(), 1, "exactly one otp must have been created");
        assert!(!otps[0].is_used(), "a fresh otp must be unused");

        let sent = app.notify_srv.sent.lock().unwrap();
        assert_eq!(sent.len(), 1, "exactly one notification must be delivered");

        let (event, payload, channel) = &sent[0];
        assert_eq!(*event, NotifyEvent::PasswordReset, "unexpected event kind");
        assert_eq!(
            channel.as_ref().map(|slug| slug.as_ref()),
            Some("webshop"),
            "the sole configured channel must be resolved"
        );
        assert_eq!(payload.code, otps[0].code().as_ref(), "unexpected code");
        assert_eq!(
            payload.reset_url,
            format!("https://shop.test/reset?code={}", otps[0].code().as_ref()),
            "the code must be embedded in the redirect url"
        );
        assert_eq!(
            payload.recipient_email, TEST_USER_EMAIL,
            "unexpected recipient"
        );
    }

    #[tokio::test]
    async fn request_recovery_for_staff_users_may_omit_the_channel() {
        let mut user_repo = UserRepositoryMock::default();
        user_repo.find_by_email_fn = Some(|_: &Email| {
            let mut user = new_user();
            user.profile.is_staff = true;
            Ok(user)
        });

        let mut app = new_recovery_application();
        app.user_repo = Arc::new(user_repo);

        let email = Email::try_from(TEST_USER_EMAIL).unwrap();
        let redirect_to = RedirectUrl::try_from("https://shop.test/reset").unwrap();

        app.request_recovery(email, redirect_to, None).await.unwrap();

        let sent = app.notify_srv.sent.lock().unwrap();
        assert_eq!(sent.len(), 1, "exactly one notification must be delivered");

        let (event, payload, channel) = &sent[0];
        assert_eq!(
            *event,
            NotifyEvent::StaffPasswordReset,
            "staff users get the staff event kind"
        );
        assert_eq!(*channel, None, "staff users resolve to no channel");
        assert_eq!(payload.channel_slug, None, "unexpected channel in payload");
    }

    #[tokio::test]
    async fn request_recovery_when_user_does_not_exist() {
        let mut user_repo = UserRepositoryMock::default();
        user_repo.find_by_email_fn = Some(|_: &Email| Err(UserError::NotFound));

        let mut app = new_recovery_application();
        app.user_repo = Arc::new(user_repo);

        let email = Email::try_from(TEST_USER_EMAIL).unwrap();
        let redirect_to = RedirectUrl::try_from("https://shop.test/reset").unwrap();

        let result = app.request_recovery(email, redirect_to, None).await;

        assert!(
            matches!(result, Err(Error::UserNotFound)),
            "got result = {:?}, want error = {}",
            result,
            Error::UserNotFound
        );
        assert!(
            app.otp_repo.owned_by(TEST_USER_ID.into()).is_empty(),
            "no otp must be created"
        );
        assert!(
            app.notify_srv.sent.lock().unwrap().is_empty(),
            "no notification must be delivered"
        );
    }

    #[tokio::test]
    async fn request_recovery_with_an_unknown_channel_must_fail() {
        let mut user_repo = UserRepositoryMock::default();
        user_repo.find_by_email_fn = Some(|_: &Email| Ok(new_user()));

        let mut app = new_recovery_application();
        app.user_repo = Arc::new(user_repo);

        let email = Email::try_from(TEST_USER_EMAIL).unwrap();
        let redirect_to = RedirectUrl::try_from("https://shop.test/reset").unwrap();
        let channel = ChannelSlug::try_from("unknown").unwrap();

        let result = app.request_recovery(email, redirect_to, Some(channel)).await;

        assert!(
            matches!(result, Err(Error::InvalidChannel)),
            "got result = {:?}, want error = {}",
            result,
            Error::InvalidChannel
        );
        assert!(
            app.otp_repo.owned_by(TEST_USER_ID.into()).is_empty(),
            "no otp must be created"
        );
    }

    #[tokio::test]
    async fn request_recovery_with_a_disallowed_redirect_must_fail() {
        let mut user_repo = UserRepositoryMock::default();
        user_repo.find_by_email_fn = Some(|_: &Email| Ok(new_user()));

        let mut app = new_recovery_application();
        app.user_repo = Arc::new(user_repo);

        let email = Email::try_from(TEST_USER_EMAIL).unwrap();
        let redirect_to = RedirectUrl::try_from("https://evil.test/reset").unwrap();

        let result = app.request_recovery(email, redirect_to, None).await;

        assert!(
            matches!(result, Err(Error::InvalidRedirectUrl)),
            "got result = {:?}, want error = {}",
            result,
            Error::InvalidRedirectUrl
        );
        assert!(
            app.otp_repo.owned_by(TEST_USER_ID.into()).is_empty(),
            "no otp must be created"
        );
        assert!(
            app.notify_srv.sent.lock().unwrap().is_empty(),
            "no notification must be delivered"
        );
    }
}
