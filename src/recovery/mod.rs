pub mod application;
#[cfg(feature = "rabbitmq")]
pub mod bus;
pub mod domain;
pub mod error;
pub mod policy;
#[cfg(feature = "rest")]
pub mod rest;
pub mod smtp;
