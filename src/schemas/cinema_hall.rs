use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{CinemaHallUpdate, NewCinemaHall};

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct CreateCinemaHallRequest {
	#[validate(length(
		min = 1,
		max = 100,
		message = "name must be between 1 and 100 characters long",
		code = "name-length"
	))]
	pub name:     String,
	#[validate(range(
		min = 1,
		message = "capacity must be positive",
		code = "capacity-range"
	))]
	pub capacity: i32,
}

impl From<CreateCinemaHallRequest> for NewCinemaHall {
	fn from(value: CreateCinemaHallRequest) -> Self {
		Self { name: value.name, capacity: value.capacity }
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct UpdateCinemaHallRequest {
	#[validate(length(
		min = 1,
		max = 100,
		message = "name must be between 1 and 100 characters long",
		code = "name-length"
	))]
	pub name:     Option<String>,
	#[validate(range(
		min = 1,
		message = "capacity must be positive",
		code = "capacity-range"
	))]
	pub capacity: Option<i32>,
}

impl From<UpdateCinemaHallRequest> for CinemaHallUpdate {
	fn from(value: UpdateCinemaHallRequest) -> Self {
		Self { name: value.name, capacity: value.capacity }
	}
}
