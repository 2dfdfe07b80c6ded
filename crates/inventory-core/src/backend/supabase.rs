//! Supabase Client
//!
//! `RemoteClient` over a hosted Supabase project: PostgREST for the
//! inventory and role tables, GoTrue for password sessions.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{BackendError, BackendResult};
use super::session::{Credentials, Session, SessionStore, SessionUser};
use super::traits::{AuthBackend, InventoryBackend};
use crate::config::{BackendConfig, ConfigError};
use crate::domain::{InventoryItem, ItemChanges, ItemId, NewItem, Pool};

/// PostgREST preference asking for the affected rows in the response
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: SessionUser,
}

impl TokenResponse {
    fn into_session(self, now: i64) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at.or(self.expires_in.map(|secs| now + secs)),
            user: self.user,
        }
    }
}

#[derive(Serialize)]
struct RefreshArgs<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RoleRow {
    role: Option<String>,
}

/// Error bodies from PostgREST (`message`) and GoTrue (`msg`, `error_description`)
#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message.or(self.msg).or(self.error_description).or(self.error)
    }
}

pub struct SupabaseClient {
    http: Client,
    config: BackendConfig,
    session: RwLock<Option<Session>>,
    store: Option<Box<dyn SessionStore>>,
}

impl SupabaseClient {
    pub fn new(config: BackendConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        Ok(Self {
            http: Client::new(),
            config,
            session: RwLock::new(None),
            store: None,
        })
    }

    /// Persist sessions in `store` and resume the one it holds
    pub fn with_session_store(mut self, store: impl SessionStore + 'static) -> Self {
        let restored = store.load();
        if let Some(session) = &restored {
            debug!(user = %session.user.id, "Restored stored session");
        }
        *self.session.get_mut().unwrap_or_else(PoisonError::into_inner) = restored;
        self.store = Some(Box::new(store));
        self
    }

    /// Current session, if signed in
    pub fn session(&self) -> Option<Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_session(&self, session: Option<Session>) {
        if let Some(store) = &self.store {
            store.save(session.as_ref());
        }
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url, path)
    }

    /// Access token of the live session, or the anon key when signed out
    async fn bearer(&self) -> BackendResult<String> {
        Ok(self
            .live_session()
            .await?
            .map(|session| session.access_token)
            .unwrap_or_else(|| self.config.anon_key.clone()))
    }

    /// Attach the project key and the bearer token
    async fn authorize(&self, request: RequestBuilder) -> BackendResult<RequestBuilder> {
        let token = self.bearer().await?;
        Ok(request
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {token}")))
    }

    /// Map non-success responses to errors
    async fn check(response: Response) -> BackendResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text.clone()
                }
            });

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized(message),
            StatusCode::NOT_FOUND => BackendError::NotFound(message),
            _ => BackendError::Http {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> BackendResult<T> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Exchange the refresh token of an expired session for a new one
    async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.config.anon_key)
            .json(&RefreshArgs { refresh_token });
        let token: TokenResponse = Self::send_json(request).await?;
        let session = token.into_session(now());
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    /// Current session with a usable access token, refreshing if needed
    async fn live_session(&self) -> BackendResult<Option<Session>> {
        let Some(session) = self.session() else {
            return Ok(None);
        };
        if !session.is_expired(now()) {
            return Ok(Some(session));
        }

        match session.refresh_token.as_deref() {
            Some(refresh_token) => match self.refresh_session(refresh_token).await {
                Ok(fresh) => Ok(Some(fresh)),
                Err(BackendError::Unauthorized(reason)) | Err(BackendError::Http { message: reason, .. }) => {
                    warn!(%reason, "Session refresh rejected, signing out locally");
                    self.set_session(None);
                    Ok(None)
                }
                Err(other) => Err(other),
            },
            None => {
                debug!("Session expired without refresh token");
                self.set_session(None);
                Ok(None)
            }
        }
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn id_filter(id: &ItemId) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

#[async_trait(?Send)]
impl InventoryBackend for SupabaseClient {
    async fn list(&self, pool: Pool) -> BackendResult<Vec<InventoryItem>> {
        let request = self
            .authorize(self.http.get(self.rest_url(pool.table())))
            .await?
            .query(&[("select", "*"), ("order", "gpu.asc")]);
        Self::send_json(request).await
    }

    async fn insert(&self, pool: Pool, item: &NewItem) -> BackendResult<InventoryItem> {
        let request = self
            .authorize(self.http.post(self.rest_url(pool.table())))
            .await?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[item]);
        let rows: Vec<InventoryItem> = Self::send_json(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("insert returned no rows".to_string()))
    }

    async fn update(&self, pool: Pool, id: &ItemId, changes: &ItemChanges) -> BackendResult<()> {
        let request = self
            .authorize(self.http.patch(self.rest_url(pool.table())))
            .await?
            .query(&id_filter(id))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(changes);
        let rows: Vec<InventoryItem> = Self::send_json(request).await?;
        // Row-level security filters rows out silently instead of failing
        if rows.is_empty() {
            return Err(BackendError::NotFound(format!("{} record {} was not updated", pool, id)));
        }
        Ok(())
    }

    async fn delete(&self, pool: Pool, id: &ItemId) -> BackendResult<()> {
        let request = self
            .authorize(self.http.delete(self.rest_url(pool.table())))
            .await?
            .query(&id_filter(id))
            .header("Prefer", RETURN_REPRESENTATION);
        let rows: Vec<InventoryItem> = Self::send_json(request).await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound(format!("{} record {} was not deleted", pool, id)));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl AuthBackend for SupabaseClient {
    async fn current_user(&self) -> BackendResult<Option<SessionUser>> {
        let Some(session) = self.live_session().await? else {
            return Ok(None);
        };

        let request = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", session.access_token));
        match Self::send_json::<SessionUser>(request).await {
            Ok(user) => Ok(Some(user)),
            Err(BackendError::Unauthorized(reason)) => {
                warn!(%reason, "Stored session rejected");
                self.set_session(None);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<SessionUser> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(credentials);
        let token: TokenResponse = match Self::send_json(request).await {
            Ok(token) => token,
            // GoTrue answers bad credentials with 400 invalid_grant
            Err(BackendError::Http { status: 400, message }) => {
                return Err(BackendError::Unauthorized(message));
            }
            Err(err) => return Err(err),
        };

        let session = token.into_session(now());
        let user = session.user.clone();
        self.set_session(Some(session));
        Ok(user)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let Some(session) = self.session() else {
            return Ok(());
        };
        // Forget locally first so a failed logout call cannot keep us signed in
        self.set_session(None);

        let request = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", session.access_token));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn role_for(&self, email: &str) -> BackendResult<Option<String>> {
        let request = self
            .authorize(self.http.get(self.rest_url(&self.config.role_table)))
            .await?
            .query(&[
                ("select", "role".to_string()),
                ("email", format!("eq.{email}")),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<RoleRow> = Self::send_json(request).await?;
        Ok(rows.into_iter().next().and_then(|row| row.role))
    }
}
