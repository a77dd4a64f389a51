use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use validator::Validate;

use crate::models::{NewShowtime, Showtime};
use crate::schemas::showtime::{
	ShowtimeRequest,
	ShowtimeResponse,
	ShowtimeSeatResponse,
};
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub(crate) async fn get_all_showtimes(
	State(pool): State<DbPool>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let showtimes = Showtime::get_all(&conn).await?;
	let response: Vec<ShowtimeResponse> =
		showtimes.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn get_showtime(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let showtime = Showtime::get_by_id(id, &conn).await?;
	let response: ShowtimeResponse = showtime.into();

	Ok((StatusCode::OK, Json(response)))
}

/// Get every seat of the showtime's hall with its availability for this
/// showtime
#[instrument(skip(pool))]
pub(crate) async fn get_showtime_seats(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let seats = Showtime::get_seat_map(id, &conn).await?;
	let response: Vec<ShowtimeSeatResponse> =
		seats.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn create_showtime(
	State(pool): State<DbPool>,
	Json(request): Json<ShowtimeRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let new_showtime: NewShowtime = request.into();
	let showtime = new_showtime.insert(&conn).await?;
	let response: ShowtimeResponse = showtime.into();

	Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn update_showtime(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
	Json(request): Json<ShowtimeRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let showtime = Showtime::update(id, request.into(), &conn).await?;
	let response: ShowtimeResponse = showtime.into();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn delete_showtime(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	Showtime::delete_by_id(id, &conn).await?;

	Ok(NoContent)
}
