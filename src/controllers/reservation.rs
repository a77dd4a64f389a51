//! Controllers for seat reservations
//!
//! Every handler here defers to the [`ReservationEngine`], which owns all
//! consistency checks.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use validator::Validate;

use crate::Error;
use crate::booking::ReservationEngine;
use crate::schemas::reservation::CreateReservationRequest;
use crate::session::Session;

#[instrument(skip(engine))]
pub(crate) async fn create_reservation(
	State(engine): State<Arc<ReservationEngine>>,
	session: Session,
	Json(request): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let reservation = engine
		.create(session.data.user_id, request.showtime_id, request.seat_id)
		.await?;

	Ok((StatusCode::OK, Json(reservation)))
}

#[instrument(skip(engine))]
pub(crate) async fn get_reservations(
	State(engine): State<Arc<ReservationEngine>>,
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let reservations = if session.data.is_admin() {
		engine.list_all().await?
	} else {
		engine.list_for_user(session.data.user_id).await?
	};

	Ok((StatusCode::OK, Json(reservations)))
}

#[instrument(skip(engine))]
pub(crate) async fn get_reservation(
	State(engine): State<Arc<ReservationEngine>>,
	session: Session,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let reservation = engine.get(id).await?;

	if !session.data.is_admin() && reservation.user.id != session.data.user_id
	{
		return Err(Error::Forbidden);
	}

	Ok((StatusCode::OK, Json(reservation)))
}

#[instrument(skip(engine))]
pub(crate) async fn delete_reservation(
	State(engine): State<Arc<ReservationEngine>>,
	Path(id): Path<i32>,
) -> Result<StatusCode, Error> {
	engine.delete(id).await?;

	Ok(StatusCode::OK)
}
