#[macro_use]
extern crate tracing;

pub mod cache;
pub mod config;
pub mod otp;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "rabbitmq")]
pub mod rabbitmq;
pub mod recovery;
#[cfg(feature = "redis-cache")]
pub mod redis;
pub mod smtp;
pub mod token;
pub mod user;

mod crypto;
mod macros;
