//! SMTP implementation of the [NotifyService] trait.

use super::application::NotifyService;
use super::domain::{ChannelSlug, NotifyEvent, ResetPayload};
use super::error::{Error, Result};
use crate::macros::on_error;
use crate::smtp::Smtp;
use tera::{Context, Tera};
use tracing::instrument;

pub struct SmtpNotifyService {
    pub smtp: &'static Smtp,
    pub tera: &'static Tera,
    pub reset_subject: &'static str,
    pub staff_reset_subject: &'static str,
}

impl SmtpNotifyService {
    fn subject(&self, event: NotifyEvent) -> &str {
        match event {
            NotifyEvent::PasswordReset => self.reset_subject,
            NotifyEvent::StaffPasswordReset => self.staff_reset_subject,
        }
    }
}

impl NotifyService for SmtpNotifyService {
    /// Delivers the password reset email, rendering the template named after the event kind.
    #[instrument(skip(self, payload))]
    fn notify(
        &self,
        event: NotifyEvent,
        payload: &ResetPayload,
        _channel: Option<&ChannelSlug>,
    ) -> Result<()> {
        let context = Context::from_serialize(payload)
            .map_err(on_error!(Error, "building context from reset payload"))?;

        let body = self
            .tera
            .render(&format!("{}.html", event), &context)
            .map_err(on_error!(Error, "rendering password reset email template"))?;

        self.smtp
            .send(&payload.recipient_email, self.subject(event), body)
            .map_err(Into::into)
    }
}
