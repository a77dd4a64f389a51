//! Controllers for registration and bearer sessions

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use validator::Validate;

use crate::models::{NewUser, User, UserRole};
use crate::schemas::auth::{LoginRequest, RegisterRequest, TokenResponse};
use crate::schemas::user::UserResponse;
use crate::session::Session;
use crate::{Config, DbPool, Error, LoginError, RedisConn};

#[instrument(skip_all)]
pub(crate) async fn register(
	State(pool): State<DbPool>,
	Json(register_data): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Error> {
	register_data.validate()?;

	let password_hash = User::hash_password(&register_data.password)?;

	let insertable_user = NewUser {
		name: register_data.name,
		email: register_data.email,
		password_hash,
		role: UserRole::User,
	};

	let conn = pool.get().await?;
	let new_user = insertable_user.insert(&conn).await?;
	let response: UserResponse = new_user.into();

	Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip_all)]
pub(crate) async fn login(
	State(pool): State<DbPool>,
	State(mut r_conn): State<RedisConn>,
	State(config): State<Config>,
	Json(login_data): Json<LoginRequest>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let user = User::get_by_email(login_data.email.clone(), &conn)
		.await?
		.ok_or(LoginError::UnknownEmail(login_data.email))?;

	user.verify_password(&login_data.password)?;

	let session =
		Session::create(config.access_token_lifetime, &user, &mut r_conn)
			.await?;

	User::update_last_login(user.id, &conn).await?;

	info!("logged in user {}", user.id);

	let response = TokenResponse::bearer(
		session.token,
		config.access_token_lifetime.num_seconds(),
	);

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip_all)]
pub(crate) async fn logout(
	State(mut r_conn): State<RedisConn>,
	session: Session,
) -> Result<NoContent, Error> {
	let user_id = session.data.user_id;

	session.delete(&mut r_conn).await?;

	info!("logged out user {user_id}");

	Ok(NoContent)
}
