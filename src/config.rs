//! Environment driven configuration shared across the whole service.

use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use std::env;

pub const DEFAULT_PORT: &str = "8000";
pub const DEFAULT_ADDR: &str = "127.0.0.1";
pub const DEFAULT_TOKEN_TIMEOUT: u64 = 7200;
pub const DEFAULT_REFRESH_TOKEN_TIMEOUT: u64 = 1209600;
pub const DEFAULT_OTP_TIMEOUT: u64 = 900;
pub const DEFAULT_OTP_LENGTH: usize = 32;
pub const DEFAULT_CSRF_LENGTH: usize = 64;
pub const DEFAULT_SALT_LENGTH: usize = 32;
pub const DEFAULT_PWD_MIN_LENGTH: usize = 8;
pub const DEFAULT_TEMPLATES_PATH: &str = "/etc/otprec/smtp/templates/*.html";
pub const DEFAULT_RESET_SUBJECT: &str = "Reset your password";
pub const DEFAULT_STAFF_RESET_SUBJECT: &str = "Reset your staff account password";
#[allow(dead_code)]
pub const DEFAULT_POOL_SIZE: u32 = 10;
#[allow(dead_code)]
pub const DEFAULT_CONN_TIMEOUT: u32 = 100; //ms

const ENV_SERVICE_PORT: &str = "SERVICE_PORT";
const ENV_SERVICE_ADDR: &str = "SERVICE_ADDR";
const ENV_TOKEN_TIMEOUT: &str = "TOKEN_TIMEOUT";
const ENV_REFRESH_TOKEN_TIMEOUT: &str = "REFRESH_TOKEN_TIMEOUT";
const ENV_TOKEN_ISSUER: &str = "TOKEN_ISSUER";
const ENV_JWT_SECRET: &str = "JWT_SECRET";
const ENV_JWT_PUBLIC: &str = "JWT_PUBLIC";
const ENV_OTP_TIMEOUT: &str = "OTP_TIMEOUT";
const ENV_OTP_LENGTH: &str = "OTP_LENGTH";
const ENV_CSRF_LENGTH: &str = "CSRF_LENGTH";
const ENV_SALT_LENGTH: &str = "SALT_LENGTH";
const ENV_PWD_MIN_LENGTH: &str = "PWD_MIN_LENGTH";
const ENV_CHANNELS: &str = "CHANNELS";
const ENV_ALLOWED_REDIRECT_HOSTS: &str = "ALLOWED_REDIRECT_HOSTS";
const ENV_SITE_NAME: &str = "SITE_NAME";
const ENV_SITE_DOMAIN: &str = "SITE_DOMAIN";
const ENV_SMTP_TRANSPORT: &str = "SMTP_TRANSPORT";
const ENV_SMTP_USERNAME: &str = "SMTP_USERNAME";
const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
const ENV_SMTP_ORIGIN: &str = "SMTP_ORIGIN";
const ENV_SMTP_ISSUER: &str = "SMTP_ISSUER";
const ENV_SMTP_TEMPLATES: &str = "SMTP_TEMPLATES";
const ENV_RESET_SUBJECT: &str = "RESET_SUBJECT";
const ENV_STAFF_RESET_SUBJECT: &str = "STAFF_RESET_SUBJECT";

const LIST_SEPARATOR: char = ',';

fn list_from_env(key: &str) -> Vec<String> {
    env::var(key)
        .map(|value| {
            value
                .split(LIST_SEPARATOR)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub static SERVICE_ADDR: Lazy<String> = Lazy::new(|| {
    let netw = env::var(ENV_SERVICE_ADDR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let port = env::var(ENV_SERVICE_PORT).unwrap_or_else(|_| DEFAULT_PORT.to_string());
    format!("{}:{}", netw, port)
});

pub static TOKEN_TIMEOUT: Lazy<u64> = Lazy::new(|| {
    env::var(ENV_TOKEN_TIMEOUT)
        .map(|timeout| timeout.parse().unwrap())
        .unwrap_or(DEFAULT_TOKEN_TIMEOUT)
});

pub static REFRESH_TOKEN_TIMEOUT: Lazy<u64> = Lazy::new(|| {
    env::var(ENV_REFRESH_TOKEN_TIMEOUT)
        .map(|timeout| timeout.parse().unwrap())
        .unwrap_or(DEFAULT_REFRESH_TOKEN_TIMEOUT)
});

pub static TOKEN_ISSUER: Lazy<String> =
    Lazy::new(|| env::var(ENV_TOKEN_ISSUER).expect("token issuer must be set"));

pub static JWT_SECRET: Lazy<Vec<u8>> = Lazy::new(|| {
    env::var(ENV_JWT_SECRET)
        .map(|secret| general_purpose::STANDARD.decode(secret).unwrap())
        .expect("jwt secret must be set")
});

pub static JWT_PUBLIC: Lazy<Vec<u8>> = Lazy::new(|| {
    env::var(ENV_JWT_PUBLIC)
        .map(|secret| general_purpose::STANDARD.decode(secret).unwrap())
        .expect("jwt public key must be set")
});

pub static OTP_TIMEOUT: Lazy<u64> = Lazy::new(|| {
    env::var(ENV_OTP_TIMEOUT)
        .map(|timeout| timeout.parse().unwrap())
        .unwrap_or(DEFAULT_OTP_TIMEOUT)
});

pub static OTP_LENGTH: Lazy<usize> = Lazy::new(|| {
    env::var(ENV_OTP_LENGTH)
        .map(|len| len.parse().unwrap())
        .unwrap_or(DEFAULT_OTP_LENGTH)
});

pub static CSRF_LENGTH: Lazy<usize> = Lazy::new(|| {
    env::var(ENV_CSRF_LENGTH)
        .map(|len| len.parse().unwrap())
        .unwrap_or(DEFAULT_CSRF_LENGTH)
});

pub static SALT_LENGTH: Lazy<usize> = Lazy::new(|| {
    env::var(ENV_SALT_LENGTH)
        .map(|len| len.parse().unwrap())
        .unwrap_or(DEFAULT_SALT_LENGTH)
});

pub static PWD_MIN_LENGTH: Lazy<usize> = Lazy::new(|| {
    env::var(ENV_PWD_MIN_LENGTH)
        .map(|len| len.parse().unwrap())
        .unwrap_or(DEFAULT_PWD_MIN_LENGTH)
});

/// Slugs of all the channels users may be notified through.
pub static CHANNELS: Lazy<Vec<String>> = Lazy::new(|| list_from_env(ENV_CHANNELS));

/// Hosts the redirect url of a recovery request is allowed to point to.
pub static ALLOWED_REDIRECT_HOSTS: Lazy<Vec<String>> =
    Lazy::new(|| list_from_env(ENV_ALLOWED_REDIRECT_HOSTS));

pub static SITE_NAME: Lazy<String> =
    Lazy::new(|| env::var(ENV_SITE_NAME).expect("site name must be set"));

pub static SITE_DOMAIN: Lazy<String> =
    Lazy::new(|| env::var(ENV_SITE_DOMAIN).expect("site domain must be set"));

pub static SMTP_TRANSPORT: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_TRANSPORT).expect("smtp transport must be set"));

pub static SMTP_USERNAME: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_USERNAME).unwrap_or_default());

pub static SMTP_PASSWORD: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_PASSWORD).unwrap_or_default());

pub static SMTP_ORIGIN: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_ORIGIN).expect("smtp origin must be set"));

pub static SMTP_ISSUER: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_ISSUER).expect("smtp issuer must be set"));

pub static SMTP_TEMPLATES: Lazy<String> = Lazy::new(|| {
    env::var(ENV_SMTP_TEMPLATES).unwrap_or_else(|_| DEFAULT_TEMPLATES_PATH.to_string())
});

pub static RESET_SUBJECT: Lazy<String> =
    Lazy::new(|| env::var(ENV_RESET_SUBJECT).unwrap_or_else(|_| DEFAULT_RESET_SUBJECT.to_string()));

pub static STAFF_RESET_SUBJECT: Lazy<String> = Lazy::new(|| {
    env::var(ENV_STAFF_RESET_SUBJECT).unwrap_or_else(|_| DEFAULT_STAFF_RESET_SUBJECT.to_string())
});

#[cfg(test)]
mod tests {
    use super::{
        CHANNELS, DEFAULT_ADDR, DEFAULT_OTP_LENGTH, DEFAULT_OTP_TIMEOUT, DEFAULT_PORT,
        DEFAULT_TOKEN_TIMEOUT, JWT_SECRET, OTP_LENGTH, OTP_TIMEOUT, SERVICE_ADDR, TOKEN_ISSUER,
        TOKEN_TIMEOUT,
    };

    #[test]
    fn default_service_addr_must_not_fail() {
        assert_eq!(*SERVICE_ADDR, format!("{DEFAULT_ADDR}:{DEFAULT_PORT}"));
    }

    #[test]
    fn default_token_timeout_must_not_fail() {
        assert_eq!(*TOKEN_TIMEOUT, DEFAULT_TOKEN_TIMEOUT);
    }

    #[test]
    fn default_otp_timeout_must_not_fail() {
        assert_eq!(*OTP_TIMEOUT, DEFAULT_OTP_TIMEOUT);
    }

    #[test]
    fn default_otp_length_must_not_fail() {
        assert_eq!(*OTP_LENGTH, DEFAULT_OTP_LENGTH);
    }

    #[test]
    fn default_channels_must_be_empty() {
        assert!(CHANNELS.is_empty());
    }

    #[test]
    #[should_panic]
    fn default_jwt_secret_must_fail() {
        let _ = &*JWT_SECRET;
    }

    #[test]
    #[should_panic]
    fn default_token_issuer_must_fail() {
        let _ = &*TOKEN_ISSUER;
    }
}
