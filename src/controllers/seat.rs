use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use validator::Validate;

use crate::models::{NewSeat, Seat};
use crate::schemas::seat::{
	CreateSeatRequest,
	SeatResponse,
	UpdateSeatRequest,
};
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub(crate) async fn get_seat(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let seat = Seat::get_by_id(id, &conn).await?;
	let response: SeatResponse = seat.into();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn get_seats_for_hall(
	State(pool): State<DbPool>,
	Path(hall_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let seats = Seat::get_for_hall(hall_id, &conn).await?;
	let response: Vec<SeatResponse> =
		seats.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn create_seat(
	State(pool): State<DbPool>,
	Json(request): Json<CreateSeatRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let new_seat: NewSeat = request.into();
	let seat = new_seat.insert(&conn).await?;
	let response: SeatResponse = seat.into();

	Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn update_seat(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
	Json(request): Json<UpdateSeatRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let seat = Seat::update(id, request.into(), &conn).await?;
	let response: SeatResponse = seat.into();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn delete_seat(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	Seat::delete_by_id(id, &conn).await?;

	Ok(NoContent)
}
