use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::Genre;
use crate::schema::{genre, movie, movie_genre};
use crate::{DbConn, Error};

/// A single movie row, without its genres
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = movie)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveMovie {
	pub id:           i32,
	pub title:        String,
	pub description:  String,
	pub duration:     i32,
	pub release_date: DateTime<Utc>,
	pub image_url:    Option<String>,
	pub rating:       f64,
	pub created_at:   DateTime<Utc>,
	pub updated_at:   DateTime<Utc>,
}

/// A movie together with the genres it is listed under
#[derive(Clone, Debug, Serialize)]
pub struct Movie {
	#[serde(flatten)]
	pub movie:  PrimitiveMovie,
	pub genres: Vec<Genre>,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = movie_genre)]
#[diesel(check_for_backend(Pg))]
struct MovieGenre {
	movie_id: i32,
	genre_id: i32,
}

impl Movie {
	/// Load the genres of every given movie in a single query
	fn with_genres(
		movies: Vec<PrimitiveMovie>,
		conn: &mut PgConnection,
	) -> QueryResult<Vec<Self>> {
		let ids: Vec<i32> = movies.iter().map(|m| m.id).collect();

		let links: Vec<(i32, Genre)> = movie_genre::table
			.inner_join(genre::table)
			.filter(movie_genre::movie_id.eq_any(ids))
			.order_by(genre::name)
			.select((movie_genre::movie_id, Genre::as_select()))
			.load(conn)?;

		let mut by_movie: HashMap<i32, Vec<Genre>> = HashMap::new();

		for (m_id, g) in links {
			by_movie.entry(m_id).or_default().push(g);
		}

		let movies = movies
			.into_iter()
			.map(|movie| {
				let genres = by_movie.remove(&movie.id).unwrap_or_default();

				Self { movie, genres }
			})
			.collect();

		Ok(movies)
	}

	/// Replace the genre links of a movie
	fn set_genres(
		m_id: i32,
		genre_ids: &[i32],
		conn: &mut PgConnection,
	) -> QueryResult<()> {
		diesel::delete(movie_genre::table.filter(movie_genre::movie_id.eq(m_id)))
			.execute(conn)?;

		let links: Vec<MovieGenre> = genre_ids
			.iter()
			.map(|&genre_id| MovieGenre { movie_id: m_id, genre_id })
			.collect();

		diesel::insert_into(movie_genre::table)
			.values(links)
			.on_conflict_do_nothing()
			.execute(conn)?;

		Ok(())
	}

	/// Get all [`Movie`]s
	#[instrument(skip(conn))]
	pub async fn get_all(conn: &DbConn) -> Result<Vec<Self>, Error> {
		let movies = conn
			.interact(|conn| {
				let movies = movie::table
					.order_by(movie::id)
					.select(PrimitiveMovie::as_select())
					.load(conn)?;

				Self::with_genres(movies, conn)
			})
			.await??;

		Ok(movies)
	}

	/// Get all [`Movie`]s listed under a given genre
	#[instrument(skip(conn))]
	pub async fn get_by_genre(
		g_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let movies = conn
			.interact(move |conn| {
				let movies = movie::table
					.inner_join(movie_genre::table)
					.filter(movie_genre::genre_id.eq(g_id))
					.order_by(movie::id)
					.select(PrimitiveMovie::as_select())
					.load(conn)?;

				Self::with_genres(movies, conn)
			})
			.await??;

		Ok(movies)
	}

	/// Get a [`Movie`] given its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(m_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let found = conn
			.interact(move |conn| {
				let found = movie::table
					.find(m_id)
					.select(PrimitiveMovie::as_select())
					.get_result(conn)
					.optional()?;

				found
					.map(|m| Self::with_genres(vec![m], conn))
					.transpose()
			})
			.await??
			.and_then(|mut movies| movies.pop())
			.ok_or_else(|| Error::NotFound(format!("movie {m_id}")))?;

		Ok(found)
	}

	/// Apply a [`MovieUpdate`] and optionally replace the genre list
	#[instrument(skip(conn))]
	pub async fn update(
		m_id: i32,
		changes: MovieUpdate,
		genre_ids: Option<Vec<i32>>,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let exists = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let exists = diesel::select(diesel::dsl::exists(
						movie::table.find(m_id),
					))
					.get_result::<bool>(conn)?;

					if !exists {
						return Ok(false);
					}

					if !changes.is_empty() {
						diesel::update(movie::table.find(m_id))
							.set(changes)
							.execute(conn)?;
					}

					if let Some(genre_ids) = genre_ids {
						Self::set_genres(m_id, &genre_ids, conn)?;
					}

					Ok(true)
				})
			})
			.await??;

		if !exists {
			return Err(Error::NotFound(format!("movie {m_id}")));
		}

		let updated = Self::get_by_id(m_id, conn).await?;

		info!("updated movie {}", updated.movie.id);

		Ok(updated)
	}

	/// Delete a [`Movie`] given its id
	#[instrument(skip(conn))]
	pub async fn delete_by_id(m_id: i32, conn: &DbConn) -> Result<(), Error> {
		let count = conn
			.interact(move |conn| {
				diesel::delete(movie::table.find(m_id)).execute(conn)
			})
			.await??;

		if count == 0 {
			return Err(Error::NotFound(format!("movie {m_id}")));
		}

		info!("deleted movie with id {m_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable)]
#[diesel(table_name = movie)]
#[diesel(check_for_backend(Pg))]
pub struct NewMovie {
	pub title:        String,
	pub description:  String,
	pub duration:     i32,
	pub release_date: DateTime<Utc>,
	pub image_url:    Option<String>,
	pub rating:       f64,
}

impl NewMovie {
	/// Insert this [`NewMovie`] and link it to the given genres
	#[instrument(skip(conn))]
	pub async fn insert(
		self,
		genre_ids: Vec<i32>,
		conn: &DbConn,
	) -> Result<Movie, Error> {
		let m_id = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let created = diesel::insert_into(movie::table)
						.values(self)
						.returning(movie::id)
						.get_result::<i32>(conn)?;

					Movie::set_genres(created, &genre_ids, conn)?;

					Ok(created)
				})
			})
			.await??;

		let created = Movie::get_by_id(m_id, conn).await?;

		info!("created movie {} ({})", created.movie.id, created.movie.title);

		Ok(created)
	}
}

#[derive(AsChangeset, Clone, Debug, Default, Deserialize)]
#[diesel(table_name = movie)]
#[diesel(check_for_backend(Pg))]
pub struct MovieUpdate {
	pub title:        Option<String>,
	pub description:  Option<String>,
	pub duration:     Option<i32>,
	pub release_date: Option<DateTime<Utc>>,
	pub image_url:    Option<String>,
	pub rating:       Option<f64>,
}

impl MovieUpdate {
	fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.description.is_none()
			&& self.duration.is_none()
			&& self.release_date.is_none()
			&& self.image_url.is_none()
			&& self.rating.is_none()
	}
}
