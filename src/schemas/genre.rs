use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Genre, NewGenre};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GenreResponse {
	pub id:   i32,
	pub name: String,
}

impl From<Genre> for GenreResponse {
	fn from(value: Genre) -> Self { Self { id: value.id, name: value.name } }
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct GenreRequest {
	#[validate(length(
		min = 3,
		max = 50,
		message = "genre name must be between 3 and 50 characters long",
		code = "name-length"
	))]
	pub name: String,
}

impl From<GenreRequest> for NewGenre {
	fn from(value: GenreRequest) -> Self { Self { name: value.name } }
}
