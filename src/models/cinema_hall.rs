use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::cinema_hall;
use crate::{DbConn, Error};

/// A cinema hall, owns its seats
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = cinema_hall)]
#[diesel(check_for_backend(Pg))]
pub struct CinemaHall {
	pub id:         i32,
	pub name:       String,
	pub capacity:   i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl CinemaHall {
	#[instrument(skip(conn))]
	pub async fn get_all(conn: &DbConn) -> Result<Vec<Self>, Error> {
		let halls = conn
			.interact(|conn| {
				use self::cinema_hall::dsl::*;

				cinema_hall.order_by(id).select(Self::as_select()).get_results(conn)
			})
			.await??;

		Ok(halls)
	}

	#[instrument(skip(conn))]
	pub async fn get_by_id(h_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let hall = conn
			.interact(move |conn| {
				use self::cinema_hall::dsl::*;

				cinema_hall
					.find(h_id)
					.select(Self::as_select())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("cinema hall {h_id}")))?;

		Ok(hall)
	}

	#[instrument(skip(conn))]
	pub async fn update(
		h_id: i32,
		changes: CinemaHallUpdate,
		conn: &DbConn,
	) -> Result<Self, Error> {
		if changes.name.is_none() && changes.capacity.is_none() {
			return Self::get_by_id(h_id, conn).await;
		}

		let hall = conn
			.interact(move |conn| {
				use self::cinema_hall::dsl::*;

				diesel::update(cinema_hall.find(h_id))
					.set(changes)
					.returning(Self::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("cinema hall {h_id}")))?;

		info!("updated cinema hall {hall:?}");

		Ok(hall)
	}

	/// Delete a [`CinemaHall`], its seats and showtimes go with it
	#[instrument(skip(conn))]
	pub async fn delete_by_id(h_id: i32, conn: &DbConn) -> Result<(), Error> {
		let count = conn
			.interact(move |conn| {
				use self::cinema_hall::dsl::*;

				diesel::delete(cinema_hall.find(h_id)).execute(conn)
			})
			.await??;

		if count == 0 {
			return Err(Error::NotFound(format!("cinema hall {h_id}")));
		}

		info!("deleted cinema hall with id {h_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable)]
#[diesel(table_name = cinema_hall)]
#[diesel(check_for_backend(Pg))]
pub struct NewCinemaHall {
	pub name:     String,
	pub capacity: i32,
}

impl NewCinemaHall {
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<CinemaHall, Error> {
		let hall = conn
			.interact(|conn| {
				use self::cinema_hall::dsl::*;

				diesel::insert_into(cinema_hall)
					.values(self)
					.returning(CinemaHall::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("created cinema hall {hall:?}");

		Ok(hall)
	}
}

#[derive(AsChangeset, Clone, Debug, Default, Deserialize)]
#[diesel(table_name = cinema_hall)]
#[diesel(check_for_backend(Pg))]
pub struct CinemaHallUpdate {
	pub name:     Option<String>,
	pub capacity: Option<i32>,
}
