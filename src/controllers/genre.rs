use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use validator::Validate;

use crate::models::{Genre, NewGenre};
use crate::schemas::genre::{GenreRequest, GenreResponse};
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub(crate) async fn get_all_genres(
	State(pool): State<DbPool>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let genres = Genre::get_all(&conn).await?;
	let response: Vec<GenreResponse> =
		genres.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn get_genre(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let genre = Genre::get_by_id(id, &conn).await?;
	let response: GenreResponse = genre.into();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn create_genre(
	State(pool): State<DbPool>,
	Json(request): Json<GenreRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let new_genre: NewGenre = request.into();
	let genre = new_genre.insert(&conn).await?;
	let response: GenreResponse = genre.into();

	Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn update_genre(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
	Json(request): Json<GenreRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let genre = Genre::update(id, request.name, &conn).await?;
	let response: GenreResponse = genre.into();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn delete_genre(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	Genre::delete_by_id(id, &conn).await?;

	Ok(NoContent)
}
