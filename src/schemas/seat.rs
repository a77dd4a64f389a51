use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{NewSeat, Seat, SeatStatus, SeatUpdate};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SeatResponse {
	pub id:             i32,
	pub seat_number:    String,
	pub row:            String,
	pub status:         SeatStatus,
	pub cinema_hall_id: i32,
}

impl From<Seat> for SeatResponse {
	fn from(value: Seat) -> Self {
		Self {
			id:             value.id,
			seat_number:    value.seat_number,
			row:            value.row,
			status:         value.status,
			cinema_hall_id: value.cinema_hall_id,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct CreateSeatRequest {
	pub cinema_hall_id: i32,
	#[validate(length(
		min = 1,
		max = 10,
		message = "seat number must be between 1 and 10 characters long",
		code = "seat-number-length"
	))]
	pub seat_number:    String,
	#[validate(length(
		min = 1,
		max = 10,
		message = "row must be between 1 and 10 characters long",
		code = "row-length"
	))]
	pub row:            String,
}

impl From<CreateSeatRequest> for NewSeat {
	fn from(value: CreateSeatRequest) -> Self {
		Self {
			cinema_hall_id: value.cinema_hall_id,
			seat_number:    value.seat_number,
			row:            value.row,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct UpdateSeatRequest {
	#[validate(length(
		min = 1,
		max = 10,
		message = "seat number must be between 1 and 10 characters long",
		code = "seat-number-length"
	))]
	pub seat_number: Option<String>,
	#[validate(length(
		min = 1,
		max = 10,
		message = "row must be between 1 and 10 characters long",
		code = "row-length"
	))]
	pub row:         Option<String>,
	pub status:      Option<SeatStatus>,
}

impl From<UpdateSeatRequest> for SeatUpdate {
	fn from(value: UpdateSeatRequest) -> Self {
		Self {
			seat_number: value.seat_number,
			row:         value.row,
			status:      value.status,
		}
	}
}
