use super::error::{Error, Result};
use crate::crypto;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const PATTERN: &str = r"^(?:[\w-]*\.){2}[\w-]*$";
static REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(PATTERN).unwrap());

/// Represents the kind of a token.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn is_access(&self) -> bool {
        matches!(self, TokenKind::Access)
    }

    pub fn is_refresh(&self) -> bool {
        matches!(self, TokenKind::Refresh)
    }
}

/// Represents the payload of a JWT, containing the claims.
#[derive(Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub jti: String,
    pub iss: String,
    pub sub: String,
    #[serde(
        serialize_with = "as_unix_timestamp",
        deserialize_with = "from_unix_timestamp"
    )]
    pub exp: SystemTime,
    #[serde(
        serialize_with = "as_unix_timestamp",
        deserialize_with = "from_unix_timestamp"
    )]
    pub nbf: SystemTime,
    #[serde(
        serialize_with = "as_unix_timestamp",
        deserialize_with = "from_unix_timestamp"
    )]
    pub iat: SystemTime,
    pub knd: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf: Option<String>,
}

fn as_unix_timestamp<S>(
    timestamp: &SystemTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::Error;

    timestamp
        .duration_since(UNIX_EPOCH)
        .map_err(|err| Error::custom(err.to_string()))
        .and_then(|timestamp| serializer.serialize_u64(timestamp.as_secs()))
}

fn from_unix_timestamp<'de, D>(deserializer: D) -> std::result::Result<SystemTime, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    u64::deserialize(deserializer)
        .map(Duration::from_secs)
        .and_then(|duration| {
            UNIX_EPOCH
                .checked_add(duration)
                .ok_or_else(|| Error::custom("cannot be represented as SystemTime".to_string()))
        })
}

impl Payload {
    pub fn new(token_kind: TokenKind, timeout: Duration) -> Self {
        Payload {
            jti: Default::default(),
            iss: Default::default(),
            sub: Default::default(),
            exp: SystemTime::now() + timeout,
            nbf: SystemTime::now(),
            iat: SystemTime::now(),
            knd: token_kind,
            csrf: None,
        }
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.iss = issuer.to_string();
        self
    }

    pub fn with_id(mut self, id: String) -> Self {
        self.jti = id;
        self
    }

    pub fn with_csrf(mut self, csrf: &Csrf) -> Self {
        self.csrf = Some(csrf.as_ref().to_string());
        self
    }

    /// Returns the [Duration] from now for which the token is valid.
    pub fn timeout(&self) -> Duration {
        self.exp
            .duration_since(SystemTime::now())
            .unwrap_or_default()
    }

    /// Returns the kind field (knd) from self.
    pub fn kind(&self) -> TokenKind {
        self.knd
    }

    /// Returns the subject field (sub) from self.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Returns the csrf claim from self, if any.
    pub fn csrf(&self) -> Option<&str> {
        self.csrf.as_deref()
    }
}

/// Represents a signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl TryFrom<String> for Token {
    type Error = Error;

    fn try_from(token: String) -> Result<Self> {
        REGEX
            .is_match(&token)
            .then_some(Self(token))
            .ok_or(Error::NotAToken)
    }
}

impl From<Claims> for Token {
    fn from(value: Claims) -> Self {
        value.token
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Represents a token and its corresponding payload, containing the claims.
#[derive(Debug)]
pub struct Claims {
    pub(super) token: Token,
    pub(super) payload: Payload,
}

impl Claims {
    /// Returns the token with the corresponding claims.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Returns the payload, containing the claims.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Represents a cross-site request forgery token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Csrf(String);

impl AsRef<str> for Csrf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Csrf {
    type Error = Error;

    /// Builds a [Csrf] from the given string if, and only if, the string is non empty and
    /// alphanumeric.
    fn try_from(csrf: String) -> Result<Self> {
        if csrf.is_empty() || csrf.chars().any(|c| !c.is_alphanumeric()) {
            return Err(Error::NotACsrf);
        }

        Ok(Self(csrf))
    }
}

impl Csrf {
    /// Builds a new random [Csrf] of the given length.
    pub fn with_length(len: usize) -> Result<Self> {
        crypto::random_alphanumeric(len).try_into()
    }
}
