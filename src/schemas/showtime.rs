use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{NewShowtime, Showtime, ShowtimeSeat};
use crate::schemas::seat::SeatResponse;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ShowtimeResponse {
	pub id:             i32,
	pub movie_id:       i32,
	pub cinema_hall_id: i32,
	pub start_time:     DateTime<Utc>,
	pub end_time:       DateTime<Utc>,
}

impl From<Showtime> for ShowtimeResponse {
	fn from(value: Showtime) -> Self {
		Self {
			id:             value.id,
			movie_id:       value.movie_id,
			cinema_hall_id: value.cinema_hall_id,
			start_time:     value.start_time,
			end_time:       value.end_time,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ShowtimeSeatResponse {
	#[serde(flatten)]
	pub seat:      SeatResponse,
	pub available: bool,
}

impl From<ShowtimeSeat> for ShowtimeSeatResponse {
	fn from(value: ShowtimeSeat) -> Self {
		Self { seat: value.seat.into(), available: value.available }
	}
}

/// Body of both the create and update showtime requests
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_showtime_window"))]
pub struct ShowtimeRequest {
	pub movie_id:       i32,
	pub cinema_hall_id: i32,
	pub start_time:     DateTime<Utc>,
	pub end_time:       DateTime<Utc>,
}

fn validate_showtime_window(
	req: &ShowtimeRequest,
) -> Result<(), ValidationError> {
	if req.end_time <= req.start_time {
		return Err(ValidationError::new("showtime-window").with_message(
			Cow::from("end time must be after the start time"),
		));
	}

	Ok(())
}

impl From<ShowtimeRequest> for NewShowtime {
	fn from(value: ShowtimeRequest) -> Self {
		Self {
			movie_id:       value.movie_id,
			cinema_hall_id: value.cinema_hall_id,
			start_time:     value.start_time,
			end_time:       value.end_time,
		}
	}
}

#[cfg(test)]
mod tests {
	use chrono::{TimeDelta, Utc};

	use super::*;

	#[test]
	fn end_before_start_is_rejected() {
		let start = Utc::now();
		let req = ShowtimeRequest {
			movie_id:       1,
			cinema_hall_id: 1,
			start_time:     start,
			end_time:       start - TimeDelta::minutes(1),
		};

		let err = crate::Error::from(req.validate().unwrap_err());

		assert!(matches!(
			err,
			crate::Error::ValidationError(ref m) if m.contains("end time")
		));
	}

	#[test]
	fn ordered_window_passes() {
		let start = Utc::now();
		let req = ShowtimeRequest {
			movie_id:       1,
			cinema_hall_id: 1,
			start_time:     start,
			end_time:       start + TimeDelta::hours(2),
		};

		assert!(req.validate().is_ok());
	}
}
