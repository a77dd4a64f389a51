use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use crate::schema::seat;
use crate::{DbConn, Error};

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::SeatStatus"]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
	#[default]
	Available,
	Reserved,
	Booked,
	Maintenance,
	Broken,
}

impl SeatStatus {
	/// Seats in these states can never be booked
	#[must_use]
	pub fn is_out_of_service(self) -> bool {
		matches!(self, Self::Maintenance | Self::Broken)
	}
}

/// A single seat in a cinema hall
#[derive(
	Clone,
	Debug,
	Deserialize,
	Identifiable,
	PartialEq,
	Queryable,
	Selectable,
	Serialize,
)]
#[diesel(table_name = seat)]
#[diesel(check_for_backend(Pg))]
pub struct Seat {
	pub id:             i32,
	pub cinema_hall_id: i32,
	pub seat_number:    String,
	pub row:            String,
	pub status:         SeatStatus,
	pub created_at:     DateTime<Utc>,
	pub updated_at:     DateTime<Utc>,
}

impl Seat {
	/// Get a [`Seat`] given its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(s_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let found = conn
			.interact(move |conn| {
				use self::seat::dsl::*;

				seat.find(s_id)
					.select(Self::as_select())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("seat {s_id}")))?;

		Ok(found)
	}

	/// Get every [`Seat`] with an id in the given list
	///
	/// Unknown ids are silently skipped, callers compare lengths
	#[instrument(skip(conn))]
	pub async fn get_by_ids(
		s_ids: Vec<i32>,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let seats = conn
			.interact(move |conn| {
				use self::seat::dsl::*;

				seat.filter(id.eq_any(s_ids))
					.order_by(id)
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(seats)
	}

	/// Get every [`Seat`] of a given cinema hall
	#[instrument(skip(conn))]
	pub async fn get_for_hall(
		h_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let seats = conn
			.interact(move |conn| {
				use self::seat::dsl::*;

				seat.filter(cinema_hall_id.eq(h_id))
					.order_by((row, seat_number))
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(seats)
	}

	/// Set the status of a single [`Seat`]
	#[instrument(skip(conn))]
	pub async fn update_status(
		s_id: i32,
		new_status: SeatStatus,
		conn: &DbConn,
	) -> Result<(), Error> {
		let count = conn
			.interact(move |conn| {
				use self::seat::dsl::*;

				diesel::update(seat.find(s_id))
					.set(status.eq(new_status))
					.execute(conn)
			})
			.await??;

		if count == 0 {
			return Err(Error::NotFound(format!("seat {s_id}")));
		}

		Ok(())
	}

	#[instrument(skip(conn))]
	pub async fn update(
		s_id: i32,
		changes: SeatUpdate,
		conn: &DbConn,
	) -> Result<Self, Error> {
		if changes.is_empty() {
			return Self::get_by_id(s_id, conn).await;
		}

		let updated = conn
			.interact(move |conn| {
				use self::seat::dsl::*;

				diesel::update(seat.find(s_id))
					.set(changes)
					.returning(Self::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("seat {s_id}")))?;

		info!("updated seat {updated:?}");

		Ok(updated)
	}

	#[instrument(skip(conn))]
	pub async fn delete_by_id(s_id: i32, conn: &DbConn) -> Result<(), Error> {
		let count = conn
			.interact(move |conn| {
				use self::seat::dsl::*;

				diesel::delete(seat.find(s_id)).execute(conn)
			})
			.await??;

		if count == 0 {
			return Err(Error::NotFound(format!("seat {s_id}")));
		}

		info!("deleted seat with id {s_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable)]
#[diesel(table_name = seat)]
#[diesel(check_for_backend(Pg))]
pub struct NewSeat {
	pub cinema_hall_id: i32,
	pub seat_number:    String,
	pub row:            String,
}

impl NewSeat {
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Seat, Error> {
		let created = conn
			.interact(|conn| {
				use self::seat::dsl::*;

				diesel::insert_into(seat)
					.values(self)
					.returning(Seat::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("created seat {created:?}");

		Ok(created)
	}
}

#[derive(AsChangeset, Clone, Debug, Default, Deserialize)]
#[diesel(table_name = seat)]
#[diesel(check_for_backend(Pg))]
pub struct SeatUpdate {
	pub seat_number: Option<String>,
	pub row:         Option<String>,
	pub status:      Option<SeatStatus>,
}

impl SeatUpdate {
	fn is_empty(&self) -> bool {
		self.seat_number.is_none() && self.row.is_none() && self.status.is_none()
	}
}
