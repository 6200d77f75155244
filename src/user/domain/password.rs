use crate::crypto;
use crate::user::error::{Error, Result};

const MIN_PASSWORD_LENGTH: usize = 8;
const SPECIAL_CHARACTERS: &str = "@$!%*?&";

/// Represents a raw password, as provided by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Password(String);

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Password {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for Password {
    type Error = Error;

    /// Builds a [Password] from the given string if, and only if, the string holds at least one
    /// lowercase letter, one uppercase letter, one digit and one special character.
    fn try_from(password: String) -> Result<Self> {
        let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
        let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));
        let has_length = password.len() >= MIN_PASSWORD_LENGTH;

        if !(has_lowercase && has_uppercase && has_digit && has_special && has_length) {
            return Err(Error::NotAPassword);
        }

        Ok(Self(password))
    }
}

/// Represents the salt of a password hash.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq)]
pub struct Salt(String);

impl AsRef<str> for Salt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Salt {
    type Error = Error;

    /// Builds a [Salt] from the given string if, and only if, the string is non empty and alphanumeric.
    fn try_from(salt: String) -> Result<Self> {
        if salt.is_empty() || salt.chars().any(|c| !c.is_alphanumeric()) {
            return Err(Error::NotASalt);
        }

        Ok(Self(salt))
    }
}

impl Salt {
    /// Builds a new random [Salt] of the given length.
    pub fn with_length(len: usize) -> Result<Self> {
        crypto::random_alphanumeric(len).try_into()
    }
}

/// Represents the hash of a password and the salt it was hashed with.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq)]
pub struct PasswordHash {
    hash: String,
    salt: Salt,
}

impl PasswordHash {
    /// Builds the [PasswordHash] of the given password using the given salt.
    pub fn with_salt(password: &Password, salt: &Salt) -> Self {
        Self {
            hash: crypto::salted_digest(password.as_ref().as_bytes(), salt.as_ref().as_bytes()),
            salt: salt.clone(),
        }
    }

    pub fn new(hash: String, salt: Salt) -> Self {
        Self { hash, salt }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Returns true if, and only if, the given password hashes to self.
    pub fn matches(&self, password: &Password) -> bool {
        crypto::salted_digest(password.as_ref().as_bytes(), self.salt.as_ref().as_bytes())
            == self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::{Password, PasswordHash, Salt};
    use crate::user::error::Error;

    #[test]
    fn password_from_str() {
        struct Test<'a> {
            name: &'a str,
            input: &'a str,
            must_fail: bool,
        }

        vec![
            Test {
                name: "valid password",
                input: "abcABC123&",
                must_fail: false,
            },
            Test {
                name: "password without special characters",
                input: "abcABC123",
                must_fail: true,
            },
            Test {
                name: "password without uppercase characters",
                input: "abcabc123&",
                must_fail: true,
            },
            Test {
                name: "password without lowercase characters",
                input: "ABCABC123&",
                must_fail: true,
            },
            Test {
                name: "password without digits",
                input: "abcABCabc&",
                must_fail: true,
            },
            Test {
                name: "password with less than 8 characters",
                input: "aB1&",
                must_fail: true,
            },
        ]
        .into_iter()
        .for_each(|test| {
            let result = Password::try_from(test.input);
            if test.must_fail {
                assert!(
                    matches!(result, Err(Error::NotAPassword)),
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
    fn salt_from_str() {
        struct Test<'a> {
            name: &'a str,
            input: &'a str,
            must_fail: bool,
        }

        vec![
            Test {
                name: "alphanumeric salt",
                input: "abc123DEF",
                must_fail: false,
            },
            Test {
                name: "empty salt",
                input: "",
                must_fail: true,
            },
            Test {
                name: "salt with symbols",
                input: "abc-123",
                must_fail: true,
            },
        ]
        .into_iter()
        .for_each(|test| {
            let result = Salt::try_from(test.input.to_string());
            if test.must_fail {
                assert!(
                    matches!(result, Err(Error::NotASalt)),
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
    fn password_hash_matches() {
        let password = Password::try_from("abcABC123&").unwrap();
        let salt = Salt::with_length(32).unwrap();
        let hash = PasswordHash::with_salt(&password, &salt);

        assert!(hash.matches(&password), "password must match its own hash");

        let other = Password::try_from("abcABC1234&").unwrap();
        assert!(
            !hash.matches(&other),
            "different password must not match the hash"
        );
    }

    #[test]
    fn password_hash_depends_on_salt() {
        let password = Password::try_from("abcABC123&").unwrap();
        let first = PasswordHash::with_salt(&password, &Salt::with_length(32).unwrap());
        let second = PasswordHash::with_salt(&password, &Salt::with_length(32).unwrap());

        assert_ne!(
            first.hash(),
            second.hash(),
            "same password with different salts must hash differently"
        );
    }
}
