use crate::api::error::AppError;
use crate::config::AppConfig;
use crate::entities::{prelude::*, *};
use crate::utils::auth::{SessionClaims, decode_session, encode_session};
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Issues and resolves login sessions.
///
/// Built once at startup from [`AppConfig`] and shared read-only through
/// `AppState`. A session is a signed token carried in an HttpOnly cookie plus
/// a `sessions` row, so logout and account deletion can revoke it.
pub struct SessionStore {
    db: DatabaseConnection,
    secret: String,
    ttl: Duration,
    cookie_name: String,
    secure: bool,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db,
            secret: config.session_secret.clone(),
            ttl: Duration::hours(config.session_ttl_hours),
            cookie_name: config.session_cookie_name.clone(),
            secure: config.secure_cookies,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Creates a session for `user_id` and returns its token.
    pub async fn issue(&self, user_id: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        Sessions::delete_many()
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await?;

        let session = sessions::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        let claims = SessionClaims {
            sub: user_id,
            authenticated: true,
            exp: expires_at.timestamp() as usize,
            jti: session.id,
        };

        encode_session(&claims, &self.secret).map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Resolves a token to its claims. Any failure is `Unauthenticated`.
    pub async fn resolve(&self, token: &str) -> Result<SessionClaims, AppError> {
        let claims =
            decode_session(token, &self.secret).map_err(|_| AppError::Unauthenticated)?;

        if !claims.authenticated {
            return Err(AppError::Unauthenticated);
        }

        let session = Sessions::find_by_id(claims.jti.clone())
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if session.user_id != claims.sub || session.expires_at < Utc::now() {
            return Err(AppError::Unauthenticated);
        }

        Ok(claims)
    }

    pub async fn revoke(&self, session_id: &str) -> Result<(), AppError> {
        Sessions::delete_by_id(session_id.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .build()
    }

    /// A cookie that makes the browser drop the session cookie.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.cookie(String::new());
        cookie.make_removal();
        cookie
    }
}
