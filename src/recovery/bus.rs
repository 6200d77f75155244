//! RabbitMQ implementation of the [EventService] trait.

use super::application::EventService;
use super::error::Result;
use crate::user::domain::User;
use async_trait::async_trait;
use deadpool_lapin::Pool;
use lapin::{options::BasicPublishOptions, BasicProperties};
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum EventKind {
    PasswordReset,
}

#[derive(Debug, Serialize)]
struct PasswordResetEvent<'a> {
    issuer: &'a str,
    kind: EventKind,
    user_id: i32,
    email: &'a str,
}

pub struct RabbitMqEventService {
    pub pool: &'static Pool,
    pub exchange: &'static str,
    pub issuer: &'static str,
}

#[async_trait]
impl EventService for RabbitMqEventService {
    #[instrument(skip(self, user))]
    async fn emit_password_reset(&self, user: &User) -> Result<()> {
        let event = PasswordResetEvent {
            issuer: self.issuer,
            kind: EventKind::PasswordReset,
            user_id: user.id.into(),
            email: user.credentials.email.as_ref(),
        };

        let payload = serde_json::to_string(&event).map(String::into_bytes)?;

        let connection = self.pool.get().await?;
        let channel = connection.create_channel().await?;

        channel
            .basic_publish(
                self.exchange,
                "",
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default(),
            )
            .await?
            .await?;

        Ok(())
    }
}
