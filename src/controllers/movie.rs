use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use validator::Validate;

use crate::models::Movie;
use crate::schemas::movie::{
	CreateMovieRequest,
	MovieResponse,
	UpdateMovieRequest,
};
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub(crate) async fn get_all_movies(
	State(pool): State<DbPool>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let movies = Movie::get_all(&conn).await?;
	let response: Vec<MovieResponse> =
		movies.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn get_movies_by_genre(
	State(pool): State<DbPool>,
	Path(genre_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let movies = Movie::get_by_genre(genre_id, &conn).await?;
	let response: Vec<MovieResponse> =
		movies.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn get_movie(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let movie = Movie::get_by_id(id, &conn).await?;
	let response: MovieResponse = movie.into();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn create_movie(
	State(pool): State<DbPool>,
	Json(request): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let (new_movie, genre_ids) = request.into_parts();
	let movie = new_movie.insert(genre_ids, &conn).await?;
	let response: MovieResponse = movie.into();

	Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn update_movie(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
	Json(request): Json<UpdateMovieRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let (changes, genre_ids) = request.into_parts();
	let movie = Movie::update(id, changes, genre_ids, &conn).await?;
	let response: MovieResponse = movie.into();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn delete_movie(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	Movie::delete_by_id(id, &conn).await?;

	Ok(NoContent)
}
