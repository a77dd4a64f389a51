use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use crate::error::CreateReservationError;
use crate::models::{Seat, SeatStatus, Showtime, User};
use crate::schema::{app_user, reservation, reservation_seat, seat, showtime};
use crate::{DbConn, Error};

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::ReservationStatus"]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
	#[default]
	Pending,
	Expired,
}

/// A single reservation row
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
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveReservation {
	pub id:          i32,
	pub user_id:     i32,
	pub showtime_id: i32,
	pub status:      ReservationStatus,
	pub expired_at:  DateTime<Utc>,
	pub created_at:  DateTime<Utc>,
	pub updated_at:  DateTime<Utc>,
}

impl PrimitiveReservation {
	/// Whether this reservation still holds its seats at the given time
	#[must_use]
	pub fn is_active(&self, now: DateTime<Utc>) -> bool {
		self.status == ReservationStatus::Pending && self.expired_at > now
	}

	/// The sorted ids of the given seats that an active reservation for the
	/// given showtime holds
	pub(crate) fn held_seats(
		st_id: i32,
		s_ids: Vec<i32>,
		now: DateTime<Utc>,
		conn: &mut PgConnection,
	) -> QueryResult<Vec<i32>> {
		reservation_seat::table
			.inner_join(reservation::table)
			.filter(reservation::showtime_id.eq(st_id))
			.filter(reservation::status.eq(ReservationStatus::Pending))
			.filter(reservation::expired_at.gt(now))
			.filter(reservation_seat::seat_id.eq_any(s_ids))
			.select(reservation_seat::seat_id)
			.distinct()
			.order_by(reservation_seat::seat_id)
			.load(conn)
	}

	/// Set every given seat that is booked and no longer held by any active
	/// reservation back to available
	pub(crate) fn release_seats(
		s_ids: Vec<i32>,
		now: DateTime<Utc>,
		conn: &mut PgConnection,
	) -> QueryResult<usize> {
		if s_ids.is_empty() {
			return Ok(0);
		}

		let still_held: Vec<i32> = reservation_seat::table
			.inner_join(reservation::table)
			.filter(reservation::status.eq(ReservationStatus::Pending))
			.filter(reservation::expired_at.gt(now))
			.filter(reservation_seat::seat_id.eq_any(s_ids.clone()))
			.select(reservation_seat::seat_id)
			.load(conn)?;

		let free: Vec<i32> =
			s_ids.into_iter().filter(|id| !still_held.contains(id)).collect();

		diesel::update(
			seat::table
				.filter(seat::id.eq_any(free))
				.filter(seat::status.eq(SeatStatus::Booked)),
		)
		.set(seat::status.eq(SeatStatus::Available))
		.execute(conn)
	}

	/// Check whether an active reservation for a showtime holds a seat
	#[instrument(skip(conn))]
	pub async fn is_seat_held(
		s_id: i32,
		st_id: i32,
		conn: &DbConn,
	) -> Result<bool, Error> {
		let now = Utc::now();

		let held = conn
			.interact(move |conn| Self::held_seats(st_id, vec![s_id], now, conn))
			.await??;

		Ok(!held.is_empty())
	}

	/// Mark every pending reservation that expired before `now` as expired
	/// and release its seats
	///
	/// Returns the number of reservations that were expired
	#[instrument(skip(conn))]
	pub async fn expire_before(
		now: DateTime<Utc>,
		conn: &DbConn,
	) -> Result<usize, Error> {
		let count = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					use self::reservation::dsl::*;

					let expired: Vec<i32> = diesel::update(
						reservation
							.filter(status.eq(ReservationStatus::Pending))
							.filter(expired_at.le(now)),
					)
					.set(status.eq(ReservationStatus::Expired))
					.returning(id)
					.get_results(conn)?;

					if expired.is_empty() {
						return Ok(0);
					}

					let s_ids: Vec<i32> = reservation_seat::table
						.filter(
							reservation_seat::reservation_id.eq_any(expired.clone()),
						)
						.select(reservation_seat::seat_id)
						.load(conn)?;

					Self::release_seats(s_ids, now, conn)?;

					Ok(expired.len())
				})
			})
			.await??;

		if count > 0 {
			info!("expired {count} reservations");
		}

		Ok(count)
	}
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = reservation_seat)]
#[diesel(check_for_backend(Pg))]
struct NewReservationSeat {
	reservation_id: i32,
	seat_id:        i32,
}

/// A reservation together with its user, showtime and seats
#[derive(Clone, Debug, Serialize)]
pub struct Reservation {
	pub reservation: PrimitiveReservation,
	pub user:        User,
	pub showtime:    Showtime,
	pub seats:       Vec<Seat>,
}

impl Reservation {
	/// Load the seats of every given reservation in a single query
	fn with_seats(
		rows: Vec<(PrimitiveReservation, User, Showtime)>,
		conn: &mut PgConnection,
	) -> QueryResult<Vec<Self>> {
		let ids: Vec<i32> = rows.iter().map(|(r, ..)| r.id).collect();

		let links: Vec<(i32, Seat)> = reservation_seat::table
			.inner_join(seat::table)
			.filter(reservation_seat::reservation_id.eq_any(ids))
			.order_by(seat::id)
			.select((reservation_seat::reservation_id, Seat::as_select()))
			.load(conn)?;

		let mut by_reservation: HashMap<i32, Vec<Seat>> = HashMap::new();

		for (r_id, s) in links {
			by_reservation.entry(r_id).or_default().push(s);
		}

		let reservations = rows
			.into_iter()
			.map(|(reservation, user, showtime)| {
				let seats =
					by_reservation.remove(&reservation.id).unwrap_or_default();

				Self { reservation, user, showtime, seats }
			})
			.collect();

		Ok(reservations)
	}

	/// Get a [`Reservation`] given its id, if it exists
	#[instrument(skip(conn))]
	pub async fn find(
		r_id: i32,
		conn: &DbConn,
	) -> Result<Option<Self>, Error> {
		let found = conn
			.interact(move |conn| {
				let row = reservation::table
					.inner_join(app_user::table)
					.inner_join(showtime::table)
					.filter(reservation::id.eq(r_id))
					.select((
						PrimitiveReservation::as_select(),
						User::as_select(),
						Showtime::as_select(),
					))
					.get_result(conn)
					.optional()?;

				row.map(|r| Self::with_seats(vec![r], conn)).transpose()
			})
			.await??
			.and_then(|mut found| found.pop());

		Ok(found)
	}

	/// Get all [`Reservation`]s, optionally only those of a single user
	#[instrument(skip(conn))]
	pub async fn get_all(
		for_user: Option<i32>,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let reservations = conn
			.interact(move |conn| {
				let mut query = reservation::table
					.inner_join(app_user::table)
					.inner_join(showtime::table)
					.select((
						PrimitiveReservation::as_select(),
						User::as_select(),
						Showtime::as_select(),
					))
					.order_by(reservation::id)
					.into_boxed();

				if let Some(u_id) = for_user {
					query = query.filter(reservation::user_id.eq(u_id));
				}

				let rows = query.load(conn)?;

				Self::with_seats(rows, conn)
			})
			.await??;

		Ok(reservations)
	}

	/// Delete a [`Reservation`] and release the seats it held
	///
	/// Returns `false` if no reservation with this id exists
	#[instrument(skip(conn))]
	pub async fn delete_by_id(r_id: i32, conn: &DbConn) -> Result<bool, Error> {
		let now = Utc::now();

		let deleted = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let s_ids: Vec<i32> = reservation_seat::table
						.filter(reservation_seat::reservation_id.eq(r_id))
						.select(reservation_seat::seat_id)
						.load(conn)?;

					let count = diesel::delete(reservation::table.find(r_id))
						.execute(conn)?;

					if count == 0 {
						return Ok(false);
					}

					PrimitiveReservation::release_seats(s_ids, now, conn)?;

					Ok(true)
				})
			})
			.await??;

		if deleted {
			info!("deleted reservation with id {r_id}");
		}

		Ok(deleted)
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Insertable, PartialEq, Serialize)]
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(Pg))]
pub struct NewReservation {
	pub user_id:     i32,
	pub showtime_id: i32,
	pub expired_at:  DateTime<Utc>,
}

impl NewReservation {
	/// Insert this [`NewReservation`] holding the given seats and mark every
	/// seat as booked, all in a single transaction
	///
	/// The seat rows are locked in id order before their status and the holds
	/// of other active reservations for the same showtime are checked, so two
	/// overlapping inserts can never both commit and a seat taken out of
	/// service in the meantime is never booked
	#[instrument(skip(conn))]
	pub async fn insert(
		self,
		mut s_ids: Vec<i32>,
		conn: &DbConn,
	) -> Result<PrimitiveReservation, Error> {
		s_ids.sort_unstable();
		s_ids.dedup();

		let now = Utc::now();

		let created = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let locked: Vec<(i32, SeatStatus)> = seat::table
						.filter(seat::id.eq_any(s_ids.clone()))
						.order_by(seat::id)
						.select((seat::id, seat::status))
						.for_update()
						.load(conn)?;

					if locked.len() != s_ids.len() {
						return Err(Error::NotFound(
							"one or more seats no longer exist".to_string(),
						));
					}

					// Status may have changed since the engine checked it
					let out_of_service: Vec<i32> = locked
						.iter()
						.filter(|(_, status)| status.is_out_of_service())
						.map(|(id, _)| *id)
						.collect();

					if !out_of_service.is_empty() {
						return Err(CreateReservationError::SeatOutOfService(
							out_of_service,
						)
						.into());
					}

					let held = PrimitiveReservation::held_seats(
						self.showtime_id,
						s_ids.clone(),
						now,
						conn,
					)?;

					if !held.is_empty() {
						return Err(
							CreateReservationError::SeatConflict(held).into()
						);
					}

					let created = diesel::insert_into(reservation::table)
						.values(self)
						.returning(PrimitiveReservation::as_returning())
						.get_result(conn)?;

					let links: Vec<NewReservationSeat> = s_ids
						.iter()
						.map(|&seat_id| {
							NewReservationSeat {
								reservation_id: created.id,
								seat_id,
							}
						})
						.collect();

					diesel::insert_into(reservation_seat::table)
						.values(links)
						.execute(conn)?;

					diesel::update(seat::table.filter(seat::id.eq_any(s_ids)))
						.set(seat::status.eq(SeatStatus::Booked))
						.execute(conn)?;

					Ok(created)
				})
			})
			.await??;

		info!("created reservation {created:?}");

		Ok(created)
	}
}
