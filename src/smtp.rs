//! SMTP transport wrapper used by every mailing service of the crate.

use lettre::message::SinglePart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::Tls;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("smtp transport is not valid")]
    NotATransport,
    #[error("{0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("{0}")]
    Message(#[from] lettre::error::Error),
    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

pub struct Smtp {
    pub issuer: &'static str,
    pub origin: &'static str,
    mailer: SmtpTransport,
}

impl Smtp {
    pub fn new(smtp_transport: &str, smtp_credentials: Option<(String, String)>) -> Result<Self> {
        let transport_attrs: Vec<&str> = smtp_transport.split(':').collect();
        if transport_attrs.is_empty() || transport_attrs[0].is_empty() {
            return Err(Error::NotATransport);
        }

        info!("smtp transport set as {}", transport_attrs[0]);

        let mut mailer = SmtpTransport::relay(transport_attrs[0])?;
        if transport_attrs.len() > 1 && !transport_attrs[1].is_empty() {
            warn!("smtp transport port set as {}", transport_attrs[1]);
            mailer = mailer.port(transport_attrs[1].parse().unwrap());
        }

        if let Some((username, password)) = smtp_credentials {
            mailer = mailer.credentials(Credentials::new(username, password));
        } else {
            warn!("transport layer security for smtp disabled");
            mailer = mailer.tls(Tls::None);
        }

        Ok(Smtp {
            issuer: "",
            origin: "",
            mailer: mailer.build(),
        })
    }

    #[instrument(skip(self, body))]
    pub fn send(&self, to: &str, subject: &str, body: String) -> Result<()> {
        let formated_subject = if !self.issuer.is_empty() {
            format!("[{}] {}", self.issuer, subject)
        } else {
            subject.to_string()
        };

        let email = Message::builder()
            .from(self.origin.parse()?)
            .to(to.parse()?)
            .subject(formated_subject)
            .singlepart(SinglePart::html(body))?;

        self.mailer.send(&email)?;
        Ok(())
    }
}
