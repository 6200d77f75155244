mod email;
pub use email::*;

mod password;
pub use password::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Represents the ID of a user.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserID(i32);

impl From<i32> for UserID {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<UserID> for i32 {
    fn from(value: UserID) -> Self {
        value.0
    }
}

impl fmt::Display for UserID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents the credentials of a user.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: PasswordHash,
}

/// Represents the account state of a user.
#[derive(Debug, Default, Clone)]
pub struct Profile {
    pub is_staff: bool,
    pub is_active: bool,
    pub last_login: Option<SystemTime>,
}

/// Represents a user of the system.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserID,
    pub credentials: Credentials,
    pub profile: Profile,
}

impl User {
    /// Returns true if, and only if, the given password matches with the one from self.
    pub fn password_matches(&self, password: &Password) -> bool {
        self.credentials.password.matches(password)
    }
}
