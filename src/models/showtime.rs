use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{PrimitiveReservation, ReservationStatus, Seat};
use crate::schema::{reservation, reservation_seat, seat, showtime};
use crate::{DbConn, Error};

/// A scheduled screening of a movie in a cinema hall
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
#[diesel(table_name = showtime)]
#[diesel(check_for_backend(Pg))]
pub struct Showtime {
	pub id:             i32,
	pub movie_id:       i32,
	pub cinema_hall_id: i32,
	pub start_time:     DateTime<Utc>,
	pub end_time:       DateTime<Utc>,
	pub created_at:     DateTime<Utc>,
	pub updated_at:     DateTime<Utc>,
}

/// A seat of a showtime's hall and whether it can still be booked for that
/// showtime
#[derive(Clone, Debug, Serialize)]
pub struct ShowtimeSeat {
	#[serde(flatten)]
	pub seat:      Seat,
	pub available: bool,
}

impl Showtime {
	/// Get all [`Showtime`]s ordered by start time
	#[instrument(skip(conn))]
	pub async fn get_all(conn: &DbConn) -> Result<Vec<Self>, Error> {
		let showtimes = conn
			.interact(|conn| {
				use self::showtime::dsl::*;

				showtime
					.order_by((start_time, id))
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(showtimes)
	}

	/// Get a [`Showtime`] given its id, if it exists
	#[instrument(skip(conn))]
	pub async fn find(
		st_id: i32,
		conn: &DbConn,
	) -> Result<Option<Self>, Error> {
		let found = conn
			.interact(move |conn| {
				use self::showtime::dsl::*;

				showtime
					.find(st_id)
					.select(Self::as_select())
					.get_result(conn)
					.optional()
			})
			.await??;

		Ok(found)
	}

	/// Get a [`Showtime`] given its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(st_id: i32, conn: &DbConn) -> Result<Self, Error> {
		Self::find(st_id, conn)
			.await?
			.ok_or_else(|| Error::NotFound(format!("showtime {st_id}")))
	}

	/// Get the seat map of a showtime
	///
	/// A seat is available when it is in service and no active reservation
	/// for this showtime holds it
	#[instrument(skip(conn))]
	pub async fn get_seat_map(
		st_id: i32,
		conn: &DbConn,
	) -> Result<Vec<ShowtimeSeat>, Error> {
		let found = Self::get_by_id(st_id, conn).await?;
		let now = Utc::now();

		let (seats, held) = conn
			.interact(move |conn| {
				let seats = seat::table
					.filter(seat::cinema_hall_id.eq(found.cinema_hall_id))
					.order_by((seat::row, seat::seat_number))
					.select(Seat::as_select())
					.load(conn)?;

				let ids: Vec<i32> = seats.iter().map(|s| s.id).collect();
				let held =
					PrimitiveReservation::held_seats(st_id, ids, now, conn)?;

				QueryResult::Ok((seats, held))
			})
			.await??;

		let map = seats
			.into_iter()
			.map(|seat| {
				let available = !seat.status.is_out_of_service()
					&& held.binary_search(&seat.id).is_err();

				ShowtimeSeat { seat, available }
			})
			.collect();

		Ok(map)
	}

	/// Replace the schedule of the [`Showtime`] with the given id
	///
	/// Pending reservations follow the new end time. Moving the showtime to
	/// another hall is refused while an active reservation holds seats of
	/// the current hall.
	#[instrument(skip(conn))]
	pub async fn update(
		st_id: i32,
		changes: NewShowtime,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let now = Utc::now();

		let updated = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let current: Self = showtime::table
						.find(st_id)
						.select(Self::as_select())
						.for_update()
						.get_result(conn)
						.optional()?
						.ok_or_else(|| {
							Error::NotFound(format!("showtime {st_id}"))
						})?;

					if current.cinema_hall_id != changes.cinema_hall_id {
						let active: i64 = reservation::table
							.filter(reservation::showtime_id.eq(st_id))
							.filter(
								reservation::status
									.eq(ReservationStatus::Pending),
							)
							.filter(reservation::expired_at.gt(now))
							.count()
							.get_result(conn)?;

						if active > 0 {
							return Err(Error::ValidationError(
								"cannot move a showtime with active \
								 reservations to another hall"
									.to_string(),
							));
						}
					}

					let updated = diesel::update(showtime::table.find(st_id))
						.set((
							showtime::movie_id.eq(changes.movie_id),
							showtime::cinema_hall_id.eq(changes.cinema_hall_id),
							showtime::start_time.eq(changes.start_time),
							showtime::end_time.eq(changes.end_time),
						))
						.returning(Self::as_returning())
						.get_result(conn)?;

					diesel::update(
						reservation::table
							.filter(reservation::showtime_id.eq(st_id))
							.filter(
								reservation::status
									.eq(ReservationStatus::Pending),
							),
					)
					.set(reservation::expired_at.eq(changes.end_time))
					.execute(conn)?;

					Ok(updated)
				})
			})
			.await??;

		info!("updated showtime {updated:?}");

		Ok(updated)
	}

	/// Delete a [`Showtime`] given its id
	///
	/// Its reservations go with it and the seats they held are released
	#[instrument(skip(conn))]
	pub async fn delete_by_id(st_id: i32, conn: &DbConn) -> Result<(), Error> {
		let now = Utc::now();

		conn.interact(move |conn| {
			conn.transaction::<_, Error, _>(|conn| {
				let s_ids: Vec<i32> = reservation_seat::table
					.inner_join(reservation::table)
					.filter(reservation::showtime_id.eq(st_id))
					.select(reservation_seat::seat_id)
					.distinct()
					.load(conn)?;

				let count =
					diesel::delete(showtime::table.find(st_id)).execute(conn)?;

				if count == 0 {
					return Err(Error::NotFound(format!("showtime {st_id}")));
				}

				PrimitiveReservation::release_seats(s_ids, now, conn)?;

				Ok(())
			})
		})
		.await??;

		info!("deleted showtime with id {st_id}");

		Ok(())
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Insertable)]
#[diesel(table_name = showtime)]
#[diesel(check_for_backend(Pg))]
pub struct NewShowtime {
	pub movie_id:       i32,
	pub cinema_hall_id: i32,
	pub start_time:     DateTime<Utc>,
	pub end_time:       DateTime<Utc>,
}

impl NewShowtime {
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Showtime, Error> {
		let created = conn
			.interact(move |conn| {
				use self::showtime::dsl::*;

				diesel::insert_into(showtime)
					.values(self)
					.returning(Showtime::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("created showtime {created:?}");

		Ok(created)
	}
}
