use actix_web::web::Data;
use actix_web::{middleware, App, HttpServer};
use jsonwebtoken::{DecodingKey, EncodingKey};
use once_cell::sync::Lazy;
use otprec::cache::RedisCache;
use otprec::config;
use otprec::otp::repository::PostgresOtpRepository;
use otprec::postgres;
use otprec::rabbitmq;
use otprec::recovery::application::RecoveryApplication;
use otprec::recovery::bus::RabbitMqEventService;
use otprec::recovery::domain::{ChannelSlug, SiteContext};
use otprec::recovery::policy::{
    ConfigChannelResolver, StandardPasswordPolicy, StorefrontUrlValidator,
};
use otprec::recovery::rest::{self, RecoveryRest, RecoveryRestService};
use otprec::recovery::smtp::SmtpNotifyService;
use otprec::redis;
use otprec::smtp::Smtp;
use otprec::token::service::JwtTokenService;
use otprec::user::repository::PostgresUserRepository;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tera::Tera;
use tracing::{info, warn};

static TERA: Lazy<Tera> = Lazy::new(|| Tera::new(&config::SMTP_TEMPLATES).unwrap());

static SMTP: Lazy<Smtp> = Lazy::new(|| {
    let credentials = (!config::SMTP_USERNAME.is_empty())
        .then(|| (config::SMTP_USERNAME.clone(), config::SMTP_PASSWORD.clone()));

    let mut smtp = Smtp::new(&config::SMTP_TRANSPORT, credentials).unwrap();
    smtp.issuer = &config::SMTP_ISSUER;
    smtp.origin = &config::SMTP_ORIGIN;
    smtp
});

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().init();

    if let Err(error) = dotenv::dotenv() {
        warn!(error = error.to_string(), "processing dotenv file",);
    }

    let token_srv = Arc::new(JwtTokenService {
        access_timeout: Duration::from_secs(*config::TOKEN_TIMEOUT),
        refresh_timeout: Duration::from_secs(*config::REFRESH_TOKEN_TIMEOUT),
        token_issuer: &config::TOKEN_ISSUER,
        decode: DecodingKey::from_ec_pem(&config::JWT_PUBLIC)?,
        encode: EncodingKey::from_ec_pem(&config::JWT_SECRET)?,
        cache: Arc::new(RedisCache {
            pool: &redis::REDIS_POOL,
        }),
    });

    let channels = config::CHANNELS
        .iter()
        .map(|slug| ChannelSlug::try_from(slug.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let recovery_app = RecoveryApplication {
        otp_repo: Arc::new(PostgresOtpRepository {
            pool: &postgres::POSTGRES_POOL,
        }),
        user_repo: Arc::new(PostgresUserRepository {
            pool: &postgres::POSTGRES_POOL,
        }),
        token_srv,
        channel_srv: Arc::new(ConfigChannelResolver { channels }),
        redirect_srv: Arc::new(StorefrontUrlValidator {
            allowed_hosts: config::ALLOWED_REDIRECT_HOSTS.clone(),
        }),
        notify_srv: Arc::new(SmtpNotifyService {
            smtp: &SMTP,
            tera: &TERA,
            reset_subject: &config::RESET_SUBJECT,
            staff_reset_subject: &config::STAFF_RESET_SUBJECT,
        }),
        policy_srv: Arc::new(StandardPasswordPolicy {
            min_length: *config::PWD_MIN_LENGTH,
        }),
        event_srv: Arc::new(RabbitMqEventService {
            pool: &rabbitmq::RABBITMQ_POOL,
            exchange: &rabbitmq::RABBITMQ_EVENTS_EXCHANGE,
            issuer: &rabbitmq::EVENT_ISSUER,
        }),
        site: SiteContext {
            name: config::SITE_NAME.clone(),
            domain: config::SITE_DOMAIN.clone(),
        },
        otp_length: *config::OTP_LENGTH,
        otp_timeout: Duration::from_secs(*config::OTP_TIMEOUT),
        csrf_length: *config::CSRF_LENGTH,
        salt_length: *config::SALT_LENGTH,
    };

    let rest_service: Box<dyn RecoveryRest + Sync + Send> =
        Box::new(RecoveryRestService { recovery_app });
    let rest_service = Data::new(rest_service);

    info!("server listening on {}", *config::SERVICE_ADDR);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(rest_service.clone())
            .configure(rest::register)
    })
    .bind(&*config::SERVICE_ADDR)?
    .run()
    .await?;

    Ok(())
}
