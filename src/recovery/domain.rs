use super::error::{Error, Result};
use crate::otp::domain::OtpCode;
use crate::token::domain::{Csrf, Token};
use crate::user::domain::{User, UserID};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use url::Url;

/// Name of the query parameter carrying the passcode in the redirect url.
const CODE_PARAM: &str = "code";

const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";
static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(SLUG_PATTERN).unwrap());

const HTTP_SCHEMES: [&str; 2] = ["http", "https"];

/// Represents the slug of a notification channel.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize)]
pub struct ChannelSlug(String);

impl AsRef<str> for ChannelSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ChannelSlug {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for ChannelSlug {
    type Error = Error;

    /// Builds a [ChannelSlug] from the given string if, and only if, the string matches the
    /// slug's regex.
    fn try_from(slug: String) -> Result<Self> {
        SLUG_REGEX
            .is_match(&slug)
            .then_some(Self(slug))
            .ok_or(Error::InvalidChannel)
    }
}

/// Represents the url a recovery email redirects the user to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrl(Url);

impl TryFrom<&str> for RedirectUrl {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for RedirectUrl {
    type Error = Error;

    /// Builds a [RedirectUrl] from the given string if, and only if, the string is an absolute
    /// http(s) url with a host.
    fn try_from(url: String) -> Result<Self> {
        let url = Url::parse(&url).map_err(|_| Error::InvalidRedirectUrl)?;

        if !HTTP_SCHEMES.contains(&url.scheme()) || url.host_str().is_none() {
            return Err(Error::InvalidRedirectUrl);
        }

        Ok(Self(url))
    }
}

impl RedirectUrl {
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// Returns the url with its query string replaced by a single code parameter set to the
    /// given passcode. Any other component remains untouched.
    pub fn with_code(&self, code: &OtpCode) -> String {
        let mut url = self.0.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair(CODE_PARAM, code.as_ref());

        url.to_string()
    }
}

/// Represents the kind of notification to be delivered on a recovery request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotifyEvent {
    PasswordReset,
    StaffPasswordReset,
}

impl NotifyEvent {
    /// Returns the notification kind corresponding to the given user's role.
    pub fn for_user(user: &User) -> Self {
        if user.profile.is_staff {
            Self::StaffPasswordReset
        } else {
            Self::PasswordReset
        }
    }
}

/// Represents the site the notifications are sent on behalf of.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub name: String,
    pub domain: String,
}

/// Public projection of a [User], as exposed to notification templates.
#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    pub id: UserID,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.credentials.email.as_ref().to_string(),
            is_staff: user.profile.is_staff,
            is_active: user.profile.is_active,
        }
    }
}

/// Everything a notifier needs in order to deliver a password reset message.
#[derive(Debug, Clone, Serialize)]
pub struct ResetPayload {
    pub user: UserPayload,
    pub recipient_email: String,
    pub code: String,
    pub channel_slug: Option<String>,
    pub site_name: String,
    pub domain: String,
    pub reset_url: String,
}

impl ResetPayload {
    pub fn new(
        user: &User,
        code: &OtpCode,
        channel: Option<&ChannelSlug>,
        reset_url: String,
        site: &SiteContext,
    ) -> Self {
        Self {
            user: user.into(),
            recipient_email: user.credentials.email.as_ref().to_string(),
            code: code.as_ref().to_string(),
            channel_slug: channel.map(|slug| slug.as_ref().to_string()),
            site_name: site.name.clone(),
            domain: site.domain.clone(),
            reset_url,
        }
    }
}

/// Represents a freshly authenticated session.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub access_token: Token,
    pub refresh_token: Token,
    pub csrf_token: Csrf,
}
