//! Definition and implementations of the [OtpRepository] trait.

use super::domain::{Otp, OtpCode};
use super::error::Result;
use crate::user::domain::UserID;
use async_trait::async_trait;

#[async_trait]
pub trait OtpRepository {
    /// Persists the given [Otp], enforcing the uniqueness of its code.
    async fn create(&self, otp: &Otp) -> Result<()>;
    /// Returns the [Otp] matching both the given code and owner, if any.
    async fn find(&self, code: &OtpCode, owner: UserID) -> Result<Otp>;
    /// Transitions the given [Otp] to used. The transition is atomic: of multiple concurrent
    /// calls over the same record exactly one succeeds, any other fails with
    /// [super::error::Error::AlreadyUsed].
    async fn mark_used(&self, otp: &Otp) -> Result<()>;
}

#[cfg(feature = "postgres")]
pub use postgres_repository::PostgresOtpRepository;

#[cfg(feature = "postgres")]
mod postgres_repository {
    use super::OtpRepository;
    use crate::otp::domain::{Otp, OtpCode};
    use crate::otp::error::{Error, Result};
    use crate::postgres::on_query_error;
    use crate::user::domain::UserID;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use sqlx::error::Error as SqlError;
    use sqlx::postgres::PgPool;
    use std::time::SystemTime;
    use tracing::instrument;

    const QUERY_INSERT_OTP: &str =
        "INSERT INTO otps (code, owner_id, issued_at, is_used) VALUES ($1, $2, $3, $4)";
    const QUERY_FIND_OTP: &str =
        "SELECT code, owner_id, issued_at, is_used FROM otps WHERE code = $1 AND owner_id = $2";
    const QUERY_MARK_OTP_USED: &str =
        "UPDATE otps SET is_used = true WHERE code = $1 AND owner_id = $2 AND is_used = false";

    const UNIQUE_VIOLATION: &str = "23505";

    // code, owner_id, issued_at, is_used
    type SelectOtpRow = (String, i32, DateTime<Utc>, bool);

    pub struct PostgresOtpRepository {
        pub pool: &'static PgPool,
    }

    impl PostgresOtpRepository {
        fn construct(row: SelectOtpRow) -> Result<Otp> {
            Ok(Otp {
                code: OtpCode::try_from(row.0)?,
                owner: row.1.into(),
                issued_at: row.2.into(),
                is_used: row.3,
            })
        }
    }

    #[async_trait]
    impl OtpRepository for PostgresOtpRepository {
        #[instrument(skip(self, otp))]
        async fn create(&self, otp: &Otp) -> Result<()> {
            sqlx::query(QUERY_INSERT_OTP)
                .bind(otp.code().as_ref())
                .bind(i32::from(otp.owner()))
                .bind(DateTime::<Utc>::from(otp.issued_at()))
                .bind(otp.is_used())
                .execute(self.pool)
                .await
                .map_err(|error| {
                    if let SqlError::Database(ref db_error) = error {
                        if db_error.code().as_deref() == Some(UNIQUE_VIOLATION) {
                            return Error::Collision;
                        }
                    }

                    error!(
                        error = error.to_string(),
                        "performing insert otp query on postgres",
                    );
                    error.into()
                })?;

            Ok(())
        }

        #[instrument(skip(self))]
        async fn find(&self, code: &OtpCode, owner: UserID) -> Result<Otp> {
            let otp_row: SelectOtpRow = sqlx::query_as(QUERY_FIND_OTP)
                .bind(code.as_ref())
                .bind(i32::from(owner))
                .fetch_one(self.pool)
                .await
                .map_err(on_query_error!(
                    "performing select otp by code and owner query on postgres"
                ))?;

            Self::construct(otp_row)
        }

        #[instrument(skip(self, otp))]
        async fn mark_used(&self, otp: &Otp) -> Result<()> {
            let result = sqlx::query(QUERY_MARK_OTP_USED)
                .bind(otp.code().as_ref())
                .bind(i32::from(otp.owner()))
                .execute(self.pool)
                .await
                .map_err(on_query_error!(
                    "performing mark otp as used query on postgres"
                ))?;

            if result.rows_affected() == 0 {
                return Err(Error::AlreadyUsed);
            }

            Ok(())
        }
    }
}
