use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use validator::Validate;

use crate::models::{CinemaHall, NewCinemaHall};
use crate::schemas::cinema_hall::{
	CreateCinemaHallRequest,
	UpdateCinemaHallRequest,
};
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub(crate) async fn get_all_cinema_halls(
	State(pool): State<DbPool>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let halls = CinemaHall::get_all(&conn).await?;

	Ok((StatusCode::OK, Json(halls)))
}

#[instrument(skip(pool))]
pub(crate) async fn get_cinema_hall(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let hall = CinemaHall::get_by_id(id, &conn).await?;

	Ok((StatusCode::OK, Json(hall)))
}

#[instrument(skip(pool))]
pub(crate) async fn create_cinema_hall(
	State(pool): State<DbPool>,
	Json(request): Json<CreateCinemaHallRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let new_hall: NewCinemaHall = request.into();
	let hall = new_hall.insert(&conn).await?;

	Ok((StatusCode::CREATED, Json(hall)))
}

#[instrument(skip(pool))]
pub(crate) async fn update_cinema_hall(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
	Json(request): Json<UpdateCinemaHallRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let hall = CinemaHall::update(id, request.into(), &conn).await?;

	Ok((StatusCode::OK, Json(hall)))
}

#[instrument(skip(pool))]
pub(crate) async fn delete_cinema_hall(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	CinemaHall::delete_by_id(id, &conn).await?;

	Ok(NoContent)
}
