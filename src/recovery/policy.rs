//! Configuration backed implementations of the in-process recovery collaborators.

use super::application::{ChannelResolver, PasswordPolicy, RedirectValidator};
use super::domain::{ChannelSlug, RedirectUrl};
use super::error::{Error, Result};
use crate::user::domain::{Password, User};

/// Resolves channel slugs against the statically configured channel list.
pub struct ConfigChannelResolver {
    pub channels: Vec<ChannelSlug>,
}

impl ChannelResolver for ConfigChannelResolver {
    fn resolve(&self, slug: Option<ChannelSlug>, is_staff: bool) -> Result<Option<ChannelSlug>> {
        match slug {
            Some(slug) => self
                .channels
                .contains(&slug)
                .then_some(Some(slug))
                .ok_or(Error::InvalidChannel),
            None if is_staff => Ok(None),
            None => {
                // without an explicit slug only a single configured channel is unambiguous
                if self.channels.len() == 1 {
                    return Ok(Some(self.channels[0].clone()));
                }

                Err(Error::InvalidChannel)
            }
        }
    }
}

/// Accepts redirect urls pointing to one of the configured storefront hosts.
pub struct StorefrontUrlValidator {
    pub allowed_hosts: Vec<String>,
}

impl RedirectValidator for StorefrontUrlValidator {
    fn validate(&self, url: &RedirectUrl) -> Result<()> {
        self.allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(url.host()))
            .then_some(())
            .ok_or(Error::InvalidRedirectUrl)
    }
}

/// User aware password checks layered on top of the [Password] shape validation.
pub struct StandardPasswordPolicy {
    pub min_length: usize,
}

impl PasswordPolicy for StandardPasswordPolicy {
    fn validate(&self, password: &Password, user: &User) -> Result<()> {
        let mut violations = Vec::new();

        if password.as_ref().len() < self.min_length {
            violations.push(format!(
                "password must contain at least {} characters",
                self.min_length
            ));
        }

        let username = user.credentials.email.username();
        if !username.is_empty()
            && password
                .as_ref()
                .to_lowercase()
                .contains(&username.to_lowercase())
        {
            violations.push("password is too similar to the email".to_string());
        }

        if !violations.is_empty() {
            return Err(Error::PasswordPolicy(violations));
        }

        Ok(())
    }
}
