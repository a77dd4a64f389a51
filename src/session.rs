//! User sessions and bearer tokens

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::TimeDelta;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{User, UserRole};
use crate::{Error, InternalServerError, RedisConn};

/// An authenticated session
///
/// Only available on routes behind the
/// [`AuthLayer`](crate::middleware::AuthLayer)
///
/// ```rs
/// pub async fn foo_route(session: Session) -> impl IntoResponse {
///     println!("{:?}", session.data.user_id);
///
///     ()
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Session {
	pub token: String,
	pub data:  SessionData,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct SessionData {
	pub user_id: i32,
	pub role:    UserRole,
}

impl SessionData {
	#[must_use]
	pub fn is_admin(&self) -> bool { self.role == UserRole::Admin }
}

impl<S> FromRequestParts<S> for Session
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		parts
			.extensions
			.get::<Self>()
			.cloned()
			.ok_or_else(|| InternalServerError::SessionWithoutAuthError.into())
	}
}

/// Build the cache key for a session token
fn session_key(token: &str) -> String { format!("session:{token}") }

impl Session {
	/// Create and store a new [`Session`] for a given [`User`]
	#[instrument(skip(user, conn), fields(user_id = user.id))]
	pub async fn create(
		lifetime: TimeDelta,
		user: &User,
		conn: &mut RedisConn,
	) -> Result<Self, Error> {
		let token = Uuid::new_v4().simple().to_string();
		let data = SessionData { user_id: user.id, role: user.role };

		let expiry = u64::try_from(lifetime.num_seconds()).unwrap_or(0).max(1);

		let value = serde_json::to_string(&data)?;

		let _: () = conn.set_ex(session_key(&token), value, expiry).await?;

		debug!("stored session in cache for user {}", user.id);

		Ok(Self { token, data })
	}

	/// Get a session from the cache
	#[instrument(skip(token, conn))]
	pub async fn get(
		token: &str,
		conn: &mut RedisConn,
	) -> Result<Option<Self>, Error> {
		let value: Option<String> = conn.get(session_key(token)).await?;

		let Some(value) = value.as_ref() else {
			return Ok(None);
		};

		let data: SessionData = serde_json::from_str(value)?;

		Ok(Some(Self { token: token.to_string(), data }))
	}

	/// Remove this session from the cache
	#[instrument(skip(self, conn))]
	pub async fn delete(self, conn: &mut RedisConn) -> Result<(), Error> {
		let _: i32 = conn.del(session_key(&self.token)).await?;

		debug!("removed session for user {}", self.data.user_id);

		Ok(())
	}
}
