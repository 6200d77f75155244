//! Definition and implementations of the [Cache] trait.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "redis-cache")]
    #[error("{0}")]
    Redis(String),
    #[cfg(test)]
    #[error("unexpected error")]
    Debug,
}

/// Represents a general purpose key-value cache.
#[async_trait]
pub trait Cache {
    async fn find<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;
    async fn save<T: Serialize + Send + Sync + Debug>(
        &self,
        key: &str,
        value: T,
        expire: Option<u64>,
    ) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

#[cfg(feature = "redis-cache")]
pub use redis_cache::RedisCache;

#[cfg(feature = "redis-cache")]
mod redis_cache {
    use super::{Cache, Error, Result};
    use async_trait::async_trait;
    use reool::{AsyncCommands, PoolDefault, RedisPool};
    use serde::{de::DeserializeOwned, Serialize};
    use std::fmt::Debug;
    use std::num::TryFromIntError;
    use tracing::instrument;

    /// Redis implementation of [Cache].
    pub struct RedisCache {
        pub pool: &'static RedisPool,
    }

    #[async_trait]
    impl Cache for RedisCache {
        #[instrument(skip(self))]
        async fn find<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
            let mut conn = self.pool.check_out(PoolDefault).await.map_err(|error| {
                error!(error = error.to_string(), "pulling connection for redis",);
                Error::Redis(error.to_string())
            })?;

            let data: Option<String> = conn.get(key).await.map_err(|error| {
                error!(error = error.to_string(), "performing GET command on redis",);
                Error::Redis(error.to_string())
            })?;

            data.map(|data| serde_json::from_str(&data))
                .transpose()
                .map_err(Into::into)
        }

        #[instrument(skip(self))]
        async fn save<T: Serialize + Send + Sync + Debug>(
            &self,
            key: &str,
            value: T,
            expire: Option<u64>,
        ) -> Result<()> {
            let mut conn = self.pool.check_out(PoolDefault).await.map_err(|error| {
                error!(error = error.to_string(), "pulling connection for redis",);
                Error::Redis(error.to_string())
            })?;

            let data = serde_json::to_string(&value)?;

            let _: () = conn.set(key, data).await.map_err(|error| {
                error!(error = error.to_string(), "performing SET command on redis",);
                Error::Redis(error.to_string())
            })?;

            if let Some(expire) = expire {
                let expire = expire.try_into().map_err(|error: TryFromIntError| {
                    error!(error = error.to_string(), "parsing expiration time to usize",);
                    Error::Redis(error.to_string())
                })?;

                let _: () = conn.expire(key, expire).await.map_err(|error| {
                    error!(
                        error = error.to_string(),
                        "performing EXPIRE command on redis",
                    );
                    Error::Redis(error.to_string())
                })?;
            }

            Ok(())
        }

        #[instrument(skip(self))]
        async fn delete(&self, key: &str) -> Result<()> {
            let mut conn = self.pool.check_out(PoolDefault).await.map_err(|error| {
                error!(error = error.to_string(), "pulling connection for redis",);
                Error::Redis(error.to_string())
            })?;

            let _: () = conn.del(key).await.map_err(|error| {
                error!(error = error.to_string(), "performing DEL command on redis",);
                Error::Redis(error.to_string())
            })?;

            Ok(())
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::{Cache, Result};
    use async_trait::async_trait;
    use serde::{de::DeserializeOwned, Serialize};
    use std::collections::HashMap;
    use std::fmt::Debug;
    use std::sync::Mutex;

    /// In memory implementation of [Cache], ignoring expiration times.
    #[derive(Debug, Default)]
    pub struct InMemoryCache {
        data: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl Cache for InMemoryCache {
        async fn find<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
            self.data
                .lock()
                .unwrap()
                .get(key)
                .map(|data| serde_json::from_str(data))
                .transpose()
                .map_err(Into::into)
        }

        async fn save<T: Serialize + Send + Sync + Debug>(
            &self,
            key: &str,
            value: T,
            _expire: Option<u64>,
        ) -> Result<()> {
            let data = serde_json::to_string(&value)?;
            self.data.lock().unwrap().insert(key.to_string(), data);
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.data.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn in_memory_cache_round_trip() {
        let cache = InMemoryCache::default();

        cache.save("key", "value", None).await.unwrap();
        let found: Option<String> = cache.find("key").await.unwrap();
        assert_eq!(found.as_deref(), Some("value"), "unexpected cached value");

        cache.delete("key").await.unwrap();
        let found: Option<String> = cache.find("key").await.unwrap();
        assert_eq!(found, None, "value must be gone once deleted");
    }
}
