use crate::user::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const DOMAIN_SEPARATOR: char = '@';

const PATTERN: &str = r"^[a-zA-Z0-9+._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,63}$";
static REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(PATTERN).unwrap());

/// Represents an email address.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Email {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for Email {
    type Error = Error;

    /// Builds an [Email] from the given string if, and only if, the string matches the email's regex.
    fn try_from(email: String) -> Result<Self> {
        REGEX
            .is_match(&email)
            .then_some(Self(email))
            .ok_or(Error::NotAnEmail)
    }
}

impl Email {
    /// Returns the username part from the email.
    pub fn username(&self) -> &str {
        self.0
            .split(DOMAIN_SEPARATOR)
            .next()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::Email;
    use crate::user::error::Error;

    #[test]
    fn email_from_str() {
        struct Test<'a> {
            name: &'a str,
            input: &'a str,
            must_fail: bool,
        }

        vec![
            Test {
                name: "valid email",
                input: "username@server.domain",
                must_fail: false,
            },
            Test {
                name: "email with sufix",
                input: "username+sufix@server.domain",
                must_fail: false,
            },
            Test {
                name: "email without usename",
                input: "@server.domain",
                must_fail: true,
            },
            Test {
                name: "email without domain",
                input: "username@",
                must_fail: true,
            },
            Test {
                name: "email without top level domain",
                input: "username@server",
                must_fail: true,
            },
            Test {
                name: "email with spaces",
                input: "user name@server.domain",
                must_fail: true,
            },
        ]
        .into_iter()
        .for_each(|test| {
            let result = Email::try_from(test.input);
            if test.must_fail {
                assert!(
                    matches!(result, Err(Error::NotAnEmail)),
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
    fn email_username() {
        let email = Email::try_from("username@server.domain").unwrap();
        assert_eq!(email.username(), "username", "unexpected username");
    }
}
