//! Definition and implementations of the [UserRepository] trait.

use super::domain::{Email, User};
use super::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<User>;
    async fn save(&self, user: &User) -> Result<()>;
}

#[cfg(feature = "postgres")]
pub use postgres_repository::PostgresUserRepository;

#[cfg(feature = "postgres")]
mod postgres_repository {
    use super::UserRepository;
    use crate::postgres::on_query_error;
    use crate::user::domain::{Credentials, Email, PasswordHash, Profile, User};
    use crate::user::error::{Error, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use sqlx::error::Error as SqlError;
    use sqlx::postgres::PgPool;
    use std::time::SystemTime;
    use tracing::instrument;

    const QUERY_FIND_USER_BY_EMAIL: &str =
        "SELECT id, email, password, salt, is_staff, is_active, last_login FROM users WHERE email = $1";
    const QUERY_UPDATE_USER: &str =
        "UPDATE users SET email = $1, password = $2, salt = $3, is_staff = $4, is_active = $5, last_login = $6 WHERE id = $7";

    // id, email, password, salt, is_staff, is_active, last_login
    type SelectUserRow = (i32, String, String, String, bool, bool, Option<DateTime<Utc>>);

    pub struct PostgresUserRepository {
        pub pool: &'static PgPool,
    }

    impl PostgresUserRepository {
        fn construct(row: SelectUserRow) -> Result<User> {
            Ok(User {
                id: row.0.into(),
                credentials: Credentials {
                    email: row.1.try_into()?,
                    password: PasswordHash::new(row.2, row.3.try_into()?),
                },
                profile: Profile {
                    is_staff: row.4,
                    is_active: row.5,
                    last_login: row.6.map(SystemTime::from),
                },
            })
        }
    }

    #[async_trait]
    impl UserRepository for PostgresUserRepository {
        #[instrument(skip(self))]
        async fn find_by_email(&self, email: &Email) -> Result<User> {
            let user_row: SelectUserRow = sqlx::query_as(QUERY_FIND_USER_BY_EMAIL)
                .bind(email.as_ref())
                .fetch_one(self.pool)
                .await
                .map_err(on_query_error!(
                    "performing select user by email query on postgres"
                ))?;

            Self::construct(user_row)
        }

        #[instrument(skip(self))]
        async fn save(&self, user: &User) -> Result<()> {
            sqlx::query(QUERY_UPDATE_USER)
                .bind(user.credentials.email.as_ref())
                .bind(user.credentials.password.hash())
                .bind(user.credentials.password.salt().as_ref())
                .bind(user.profile.is_staff)
                .bind(user.profile.is_active)
                .bind(user.profile.last_login.map(DateTime::<Utc>::from))
                .bind(i32::from(user.id))
                .execute(self.pool)
                .await
                .map_err(on_query_error!("performing update user query on postgres"))?;

            Ok(())
        }
    }
}
