use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Reservation, ReservationStatus, Seat, Showtime, User};

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct CreateReservationRequest {
	pub showtime_id: i32,
	#[serde(default)]
	#[validate(length(
		min = 1,
		max = 50,
		message = "between 1 and 50 seats must be selected",
		code = "seat-id-length"
	))]
	pub seat_id:     Vec<i32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ReservationUserResponse {
	pub id:   i32,
	pub name: String,
}

impl From<User> for ReservationUserResponse {
	fn from(value: User) -> Self { Self { id: value.id, name: value.name } }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ReservationShowtimeResponse {
	pub id:         i32,
	pub start_time: DateTime<Utc>,
	pub end_time:   DateTime<Utc>,
}

impl From<Showtime> for ReservationShowtimeResponse {
	fn from(value: Showtime) -> Self {
		Self {
			id:         value.id,
			start_time: value.start_time,
			end_time:   value.end_time,
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ReservationSeatResponse {
	pub id:          i32,
	pub seat_number: String,
	pub row:         String,
}

impl From<Seat> for ReservationSeatResponse {
	fn from(value: Seat) -> Self {
		Self { id: value.id, seat_number: value.seat_number, row: value.row }
	}
}

/// Public view of a reservation
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ReservationResponse {
	pub id:       i32,
	pub user:     ReservationUserResponse,
	pub showtime: ReservationShowtimeResponse,
	pub seat:     Vec<ReservationSeatResponse>,
	pub status:   ReservationStatus,
}

impl From<Reservation> for ReservationResponse {
	fn from(value: Reservation) -> Self {
		Self {
			id:       value.reservation.id,
			user:     value.user.into(),
			showtime: value.showtime.into(),
			seat:     value.seats.into_iter().map(Into::into).collect(),
			status:   value.reservation.status,
		}
	}
}
