use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use validator::Validate;

use crate::models::User;
use crate::schemas::user::{
	ChangePasswordRequest,
	UpdateUserRequest,
	UserResponse,
};
use crate::session::Session;
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub(crate) async fn get_current_user(
	State(pool): State<DbPool>,
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let user = User::get(session.data.user_id, &conn).await?;
	let response: UserResponse = user.into();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn update_current_user(
	State(pool): State<DbPool>,
	session: Session,
	Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let user =
		User::update(session.data.user_id, request.into(), &conn).await?;
	let response: UserResponse = user.into();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip_all)]
pub(crate) async fn change_password(
	State(pool): State<DbPool>,
	session: Session,
	Json(request): Json<ChangePasswordRequest>,
) -> Result<NoContent, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let user = User::get(session.data.user_id, &conn).await?;
	user.verify_password(&request.current_password)?;

	let new_hash = User::hash_password(&request.new_password)?;
	User::update_password(user.id, new_hash, &conn).await?;

	Ok(NoContent)
}
