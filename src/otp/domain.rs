use super::error::{Error, Result};
use crate::crypto;
use crate::user::domain::UserID;
use std::time::{Duration, SystemTime};

/// Represents the opaque code of a one time passcode.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct OtpCode(String);

impl AsRef<str> for OtpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for OtpCode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for OtpCode {
    type Error = Error;

    /// Builds an [OtpCode] from the given string if, and only if, the string is non empty and
    /// alphanumeric.
    fn try_from(code: String) -> Result<Self> {
        if code.is_empty() || code.chars().any(|c| !c.is_alphanumeric()) {
            return Err(Error::NotAPasscode);
        }

        Ok(Self(code))
    }
}

impl OtpCode {
    /// Builds a new random [OtpCode] of the given length.
    pub fn with_length(len: usize) -> Result<Self> {
        crypto::random_alphanumeric(len).try_into()
    }
}

/// Represents a one time passcode issued to a user for resetting its password.
#[derive(Debug, Clone)]
pub struct Otp {
    pub(crate) code: OtpCode,
    pub(crate) owner: UserID,
    pub(crate) issued_at: SystemTime,
    pub(crate) is_used: bool,
}

impl Otp {
    /// Builds a brand new [Otp] owned by the given user, with a random code of the given length.
    pub fn new(owner: UserID, code_length: usize) -> Result<Self> {
        Ok(Self {
            code: OtpCode::with_length(code_length)?,
            owner,
            issued_at: SystemTime::now(),
            is_used: false,
        })
    }

    pub fn code(&self) -> &OtpCode {
        &self.code
    }

    pub fn owner(&self) -> UserID {
        self.owner
    }

    pub fn issued_at(&self) -> SystemTime {
        self.issued_at
    }

    /// Returns true if, and only if, self has already been redeemed.
    pub fn is_used(&self) -> bool {
        self.is_used
    }

    /// Returns true if, and only if, the given validity window has been exhausted since self was
    /// issued.
    pub fn is_expired(&self, window: Duration) -> bool {
        self.issued_at + window <= SystemTime::now()
    }
}

#[cfg(test)]
mod tests {
    use super::{Otp, OtpCode};
    use crate::otp::error::Error;
    use std::time::{Duration, SystemTime};

    #[test]
    fn otp_code_from_str() {
        struct Test<'a> {
            name: &'a str,
            input: &'a str,
            must_fail: bool,
        }

        vec![
            Test {
                name: "alphanumeric code",
                input: "q1W2e3R4t5Y6u7I8o9P0a1S2d3F4g5H6",
                must_fail: false,
            },
            Test {
                name: "numeric code",
                input: "123456",
                must_fail: false,
            },
            Test {
                name: "empty code",
                input: "",
                must_fail: true,
            },
            Test {
                name: "code with symbols",
                input: "abc-123",
                must_fail: true,
            },
            Test {
                name: "code with spaces",
                input: "abc 123",
                must_fail: true,
            },
        ]
        .into_iter()
        .for_each(|test| {
            let result = OtpCode::try_from(test.input);
            if test.must_fail {
                assert!(
                    matches!(result, Err(Error::NotAPasscode)),
                    "{} got result = {:?}",
                    test.name,
                    result
                );
            } else {
                assert!(result.is_ok(), "{} got result = {:?}", test.name, result);
            }
        })
    }

    #[test]
    fn otp_code_with_length() {
        let code = OtpCode::with_length(32).unwrap();
        assert_eq!(code.as_ref().len(), 32, "unexpected code length");

        let other = OtpCode::with_length(32).unwrap();
        assert_ne!(code, other, "two generated codes must not collide");
    }

    #[test]
    fn otp_new_is_unused() {
        let otp = Otp::new(999.into(), 32).unwrap();

        assert!(!otp.is_used(), "brand new otp must be unused");
        assert_eq!(otp.owner(), 999.into(), "unexpected owner");
        assert!(
            !otp.is_expired(Duration::from_secs(900)),
            "brand new otp must not be expired"
        );
    }

    #[test]
    fn otp_expires_at_the_window_boundary() {
        let window = Duration::from_secs(900);

        struct Test<'a> {
            name: &'a str,
            age: Duration,
            expired: bool,
        }

        vec![
            Test {
                name: "just issued",
                age: Duration::ZERO,
                expired: false,
            },
            Test {
                name: "one second before the boundary",
                age: window - Duration::from_secs(1),
                expired: false,
            },
            Test {
                name: "exactly at the boundary",
                age: window,
                expired: true,
            },
            Test {
                name: "one second past the boundary",
                age: window + Duration::from_secs(1),
                expired: true,
            },
        ]
        .into_iter()
        .for_each(|test| {
            let otp = Otp {
                code: OtpCode::with_length(32).unwrap(),
                owner: 999.into(),
                issued_at: SystemTime::now() - test.age,
                is_used: false,
            };

            assert_eq!(
                otp.is_expired(window),
                test.expired,
                "{} got unexpected expiration",
                test.name
            );
        })
    }
}
