//! REST endpoints exposing the recovery workflows.

use super::application::{
    ChannelResolver, EventService, NotifyService, PasswordPolicy, RecoveryApplication,
    RedirectValidator,
};
use super::domain::{ChannelSlug, RedirectUrl, Session};
use super::error::{Error, Result};
use crate::otp::domain::OtpCode;
use crate::otp::repository::OtpRepository;
use crate::token::service::TokenService;
use crate::user::domain::{Email, Password};
use crate::user::repository::UserRepository;
use actix_web::{post, web, HttpResponse, Responder};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RecoveryRequest {
    pub email: String,
    pub redirect_url: String,
    pub channel: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub email: String,
    pub code: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
    pub user: UserResponse,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token.as_ref().to_string(),
            refresh_token: session.refresh_token.as_ref().to_string(),
            csrf_token: session.csrf_token.as_ref().to_string(),
            user: UserResponse {
                id: session.user.id.into(),
                email: session.user.credentials.email.as_ref().to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[async_trait]
pub trait RecoveryRest {
    async fn login(&self, request: LoginRequest) -> Result<SessionResponse>;
    async fn request_recovery(&self, request: RecoveryRequest) -> Result<()>;
    async fn set_password(&self, request: SetPasswordRequest) -> Result<SessionResponse>;
}

pub struct RecoveryRestService<O, U, T, C, R, N, P, B> {
    pub recovery_app: RecoveryApplication<O, U, T, C, R, N, P, B>,
}

#[async_trait]
impl<O, U, T, C, R, N, P, B> RecoveryRest for RecoveryRestService<O, U, T, C, R, N, P, B>
where
    O: OtpRepository + Sync + Send,
    U: UserRepository + Sync + Send,
    T: TokenService + Sync + Send,
    C: ChannelResolver + Sync + Send,
    R: RedirectValidator + Sync + Send,
    N: NotifyService + Sync + Send,
    P: PasswordPolicy + Sync + Send,
    B: EventService + Sync + Send,
{
    async fn login(&self, request: LoginRequest) -> Result<SessionResponse> {
        let email = Email::try_from(request.email).map_err(|_| Error::WrongCredentials)?;
        let password = Password::try_from(request.password).map_err(|_| Error::WrongCredentials)?;

        self.recovery_app
            .login(email, password)
            .await
            .map(SessionResponse::from)
    }

    async fn request_recovery(&self, request: RecoveryRequest) -> Result<()> {
        let email = Email::try_from(request.email).map_err(|_| Error::UserNotFound)?;
        let redirect_to = RedirectUrl::try_from(request.redirect_url)?;
        let channel = request.channel.map(ChannelSlug::try_from).transpose()?;

        self.recovery_app
            .request_recovery(email, redirect_to, channel)
            .await
    }

    async fn set_password(&self, request: SetPasswordRequest) -> Result<SessionResponse> {
        let email = Email::try_from(request.email).map_err(|_| Error::UserNotFound)?;
        let code = OtpCode::try_from(request.code).map_err(|_| Error::InvalidOrExpiredCode)?;
        let password = Password::try_from(request.password)
            .map_err(|error| Error::PasswordPolicy(vec![error.to_string()]))?;

        self.recovery_app
            .set_password_by_code(email, code, password)
            .await
            .map(SessionResponse::from)
    }
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(request_recovery).service(set_password);
}

fn error_response(error: Error) -> HttpResponse {
    let body = match &error {
        Error::PasswordPolicy(violations) => ErrorResponse {
            code: error.code(),
            message: error.to_string(),
            errors: violations.clone(),
        },
        _ => ErrorResponse {
            code: error.code(),
            message: error.to_string(),
            errors: Vec::new(),
        },
    };

    match error {
        Error::WrongCredentials => HttpResponse::Unauthorized().json(body),
        Error::UserNotFound
        | Error::AccountNotConfirmed
        | Error::AccountInactive
        | Error::InvalidChannel
        | Error::InvalidRedirectUrl
        | Error::InvalidOrExpiredCode
        | Error::PasswordPolicy(_) => HttpResponse::BadRequest().json(body),
        error => {
            error!(error = error.to_string(), "handling recovery request",);
            HttpResponse::InternalServerError().json(ErrorResponse {
                code: "unknown",
                message: "unexpected error".to_string(),
                errors: Vec::new(),
            })
        }
    }
}

#[post("/session")]
async fn login(
    service: web::Data<Box<dyn RecoveryRest + Sync + Send>>,
    body: web::Json<LoginRequest>,
) -> impl Responder {
    match service.login(body.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(error) => error_response(error),
    }
}

#[post("/recovery")]
async fn request_recovery(
    service: web::Data<Box<dyn RecoveryRest + Sync + Send>>,
    body: web::Json<RecoveryRequest>,
) -> impl Responder {
    match service.request_recovery(body.into_inner()).await {
        Ok(()) => HttpResponse::Accepted().finish(),
        Err(error) => error_response(error),
    }
}

#[post("/recovery/password")]
async fn set_password(
    service: web::Data<Box<dyn RecoveryRest + Sync + Send>>,
    body: web::Json<SetPasswordRequest>,
) -> impl Responder {
    match service.set_password(body.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(error) => error_response(error),
    }
}
