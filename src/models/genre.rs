use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::genre;
use crate::{DbConn, Error};

/// A movie genre
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = genre)]
#[diesel(check_for_backend(Pg))]
pub struct Genre {
	pub id:         i32,
	pub name:       String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Genre {
	/// Get all [`Genre`]s ordered by name
	#[instrument(skip(conn))]
	pub async fn get_all(conn: &DbConn) -> Result<Vec<Self>, Error> {
		let genres = conn
			.interact(|conn| {
				use self::genre::dsl::*;

				genre.order_by(name).select(Self::as_select()).get_results(conn)
			})
			.await??;

		Ok(genres)
	}

	/// Get a [`Genre`] given its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(g_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let found = conn
			.interact(move |conn| {
				use self::genre::dsl::*;

				genre
					.find(g_id)
					.select(Self::as_select())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("genre {g_id}")))?;

		Ok(found)
	}

	/// Rename the [`Genre`] with the given id
	#[instrument(skip(conn))]
	pub async fn update(
		g_id: i32,
		new_name: String,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let updated = conn
			.interact(move |conn| {
				use self::genre::dsl::*;

				diesel::update(genre.find(g_id))
					.set(name.eq(new_name))
					.returning(Self::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("genre {g_id}")))?;

		info!("updated genre {updated:?}");

		Ok(updated)
	}

	/// Delete a [`Genre`] given its id
	#[instrument(skip(conn))]
	pub async fn delete_by_id(g_id: i32, conn: &DbConn) -> Result<(), Error> {
		let count = conn
			.interact(move |conn| {
				use self::genre::dsl::*;

				diesel::delete(genre.find(g_id)).execute(conn)
			})
			.await??;

		if count == 0 {
			return Err(Error::NotFound(format!("genre {g_id}")));
		}

		info!("deleted genre with id {g_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable)]
#[diesel(table_name = genre)]
#[diesel(check_for_backend(Pg))]
pub struct NewGenre {
	pub name: String,
}

impl NewGenre {
	/// Insert this [`NewGenre`]
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Genre, Error> {
		let created = conn
			.interact(|conn| {
				use self::genre::dsl::*;

				diesel::insert_into(genre)
					.values(self)
					.returning(Genre::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("created genre {created:?}");

		Ok(created)
	}
}
