use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Movie, MovieUpdate, NewMovie};
use crate::schemas::genre::GenreResponse;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MovieResponse {
	pub id:           i32,
	pub title:        String,
	pub description:  String,
	pub duration:     i32,
	pub release_date: DateTime<Utc>,
	pub image_url:    Option<String>,
	pub rating:       f64,
	pub genres:       Vec<GenreResponse>,
	pub created_at:   DateTime<Utc>,
	pub updated_at:   DateTime<Utc>,
}

impl From<Movie> for MovieResponse {
	fn from(value: Movie) -> Self {
		let movie = value.movie;

		Self {
			id:           movie.id,
			title:        movie.title,
			description:  movie.description,
			duration:     movie.duration,
			release_date: movie.release_date,
			image_url:    movie.image_url,
			rating:       movie.rating,
			genres:       value.genres.into_iter().map(Into::into).collect(),
			created_at:   movie.created_at,
			updated_at:   movie.updated_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct CreateMovieRequest {
	#[validate(length(
		min = 1,
		max = 100,
		message = "title must be between 1 and 100 characters long",
		code = "title-length"
	))]
	pub title:        String,
	#[validate(length(
		max = 500,
		message = "description can be at most 500 characters long",
		code = "description-length"
	))]
	pub description:  String,
	#[validate(range(
		min = 30,
		message = "duration must be at least 30 minutes",
		code = "duration-range"
	))]
	pub duration:     i32,
	pub release_date: DateTime<Utc>,
	#[validate(url(message = "invalid image url", code = "image-url"))]
	pub image_url:    Option<String>,
	#[validate(range(
		min = 0.0,
		max = 5.0,
		message = "rating must be between 0 and 5",
		code = "rating-range"
	))]
	#[serde(default)]
	pub rating:       f64,
	#[validate(length(
		min = 1,
		message = "a movie needs at least one genre",
		code = "genre-ids-length"
	))]
	pub genre_ids:    Vec<i32>,
}

impl CreateMovieRequest {
	/// Split this request into the movie row and its genre ids
	#[must_use]
	pub fn into_parts(self) -> (NewMovie, Vec<i32>) {
		let movie = NewMovie {
			title:        self.title,
			description:  self.description,
			duration:     self.duration,
			release_date: self.release_date,
			image_url:    self.image_url,
			rating:       self.rating,
		};

		(movie, self.genre_ids)
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct UpdateMovieRequest {
	#[validate(length(
		min = 1,
		max = 100,
		message = "title must be between 1 and 100 characters long",
		code = "title-length"
	))]
	pub title:        Option<String>,
	#[validate(length(
		max = 500,
		message = "description can be at most 500 characters long",
		code = "description-length"
	))]
	pub description:  Option<String>,
	#[validate(range(
		min = 30,
		message = "duration must be at least 30 minutes",
		code = "duration-range"
	))]
	pub duration:     Option<i32>,
	pub release_date: Option<DateTime<Utc>>,
	#[validate(url(message = "invalid image url", code = "image-url"))]
	pub image_url:    Option<String>,
	#[validate(range(
		min = 0.0,
		max = 5.0,
		message = "rating must be between 0 and 5",
		code = "rating-range"
	))]
	pub rating:       Option<f64>,
	#[validate(length(
		min = 1,
		message = "a movie needs at least one genre",
		code = "genre-ids-length"
	))]
	pub genre_ids:    Option<Vec<i32>>,
}

impl UpdateMovieRequest {
	/// Split this request into the movie changes and the new genre ids
	#[must_use]
	pub fn into_parts(self) -> (MovieUpdate, Option<Vec<i32>>) {
		let changes = MovieUpdate {
			title:        self.title,
			description:  self.description,
			duration:     self.duration,
			release_date: self.release_date,
			image_url:    self.image_url,
			rating:       self.rating,
		};

		(changes, self.genre_ids)
	}
}

#[cfg(test)]
mod tests {
	use chrono::Utc;
	use validator::Validate;

	use super::*;

	fn request() -> CreateMovieRequest {
		CreateMovieRequest {
			title:        "Heat".to_string(),
			description:  "A heist gone wrong".to_string(),
			duration:     170,
			release_date: Utc::now(),
			image_url:    None,
			rating:       4.5,
			genre_ids:    vec![1],
		}
	}

	#[test]
	fn valid_movie_passes() {
		assert!(request().validate().is_ok());
	}

	#[test]
	fn short_movie_is_rejected() {
		let req = CreateMovieRequest { duration: 29, ..request() };

		assert!(req.validate().is_err());
	}

	#[test]
	fn rating_above_five_is_rejected() {
		let req = CreateMovieRequest { rating: 5.5, ..request() };

		assert!(req.validate().is_err());
	}

	#[test]
	fn movie_without_genres_is_rejected() {
		let req = CreateMovieRequest { genre_ids: vec![], ..request() };

		assert!(req.validate().is_err());
	}
}
