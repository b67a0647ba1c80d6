//! Session management using Redis
//!
//! A session is an opaque random token handed to the browser in the `sid`
//! cookie. The token maps to the caller's identity in Redis and expires with
//! the configured TTL.

use anyhow::Result;
use axum_extra::extract::cookie::{Cookie, SameSite};
use common::cache::RedisPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::SessionUser;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "sid";

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Session manager for storing caller identities in Redis
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
    ttl_seconds: u64,
    secure_cookies: bool,
}

impl SessionManager {
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64, secure_cookies: bool) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
            secure_cookies,
        }
    }

    /// Start a session for a user, returning its token
    pub async fn create_session(&self, user: &SessionUser) -> Result<String> {
        info!("Creating session for: {}", user.email);

        let token = Uuid::new_v4().simple().to_string();
        let payload = serde_json::to_string(user)?;
        self.redis_pool
            .set(&session_key(&token), &payload, Some(self.ttl_seconds))
            .await?;

        Ok(token)
    }

    /// Look up the identity behind a token
    pub async fn get_session(&self, token: &str) -> Result<Option<SessionUser>> {
        let payload = self.redis_pool.get(&session_key(token)).await?;

        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Destroy a session, returning whether it was still live
    pub async fn delete_session(&self, token: &str) -> Result<bool> {
        let removed = self.redis_pool.delete(&session_key(token)).await?;
        if removed {
            info!("Session deleted");
        } else {
            warn!("Session already expired before deletion");
        }
        Ok(removed)
    }

    /// Cookie carrying a session token to the browser
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token))
            .http_only(true)
            .path("/")
            .secure(self.secure_cookies)
            .same_site(self.same_site())
            .max_age(time::Duration::seconds(self.ttl_seconds as i64))
            .build()
    }

    /// Expired, empty session cookie that makes the browser drop its token
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, ""))
            .http_only(true)
            .path("/")
            .secure(self.secure_cookies)
            .same_site(self.same_site())
            .max_age(time::Duration::ZERO)
            .build()
    }

    fn same_site(&self) -> SameSite {
        if self.secure_cookies {
            SameSite::None
        } else {
            SameSite::Lax
        }
    }

    /// Get Redis health status
    pub async fn health_check(&self) -> Result<bool> {
        self.redis_pool.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::cache::RedisConfig;

    async fn manager(secure_cookies: bool) -> SessionManager {
        let config = RedisConfig {
            url: "redis://localhost:6379".to_string(),
        };
        // Opening a client does not connect, so this works without Redis.
        let pool = RedisPool::new(&config).await.unwrap();
        SessionManager::new(pool, 86_400, secure_cookies)
    }

    #[test]
    fn test_session_key() {
        assert_eq!(session_key("abc"), "session:abc");
    }

    #[tokio::test]
    async fn test_session_cookie_attributes() {
        let cookie = manager(false).await.session_cookie("token".to_string());

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86_400)));
    }

    #[tokio::test]
    async fn test_secure_cookies_use_same_site_none() {
        let manager = manager(true).await;

        let cookie = manager.session_cookie("token".to_string());
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.secure(), Some(true));

        let removal = manager.removal_cookie();
        assert_eq!(removal.name(), SESSION_COOKIE_NAME);
        assert_eq!(removal.path(), Some("/"));
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(time::Duration::ZERO));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_session_round_trip() -> Result<()> {
        let manager = manager(false).await;
        let user = SessionUser {
            email: "anna@example.com".to_string(),
            username: "anna".to_string(),
        };

        let token = manager.create_session(&user).await?;
        assert_eq!(manager.get_session(&token).await?, Some(user));

        assert!(manager.delete_session(&token).await?);
        assert_eq!(manager.get_session(&token).await?, None);
        assert!(!manager.delete_session(&token).await?);
        Ok(())
    }
}
