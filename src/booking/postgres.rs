use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ReservationStore, SeatStore, ShowtimeStore, UserDirectory};
use crate::models::{
	NewReservation,
	PrimitiveReservation,
	Reservation,
	Seat,
	SeatStatus,
	Showtime,
	User,
};
use crate::{DbPool, Error};

/// [`BookingStore`](super::BookingStore) backed by the postgres pool
#[derive(Clone)]
pub struct PgBookingStore {
	pool: DbPool,
}

impl PgBookingStore {
	#[must_use]
	pub fn new(pool: DbPool) -> Self { Self { pool } }
}

#[async_trait]
impl SeatStore for PgBookingStore {
	async fn get_seats_by_ids(
		&self,
		seat_ids: &[i32],
	) -> Result<Vec<Seat>, Error> {
		let conn = self.pool.get().await?;

		Seat::get_by_ids(seat_ids.to_vec(), &conn).await
	}

	async fn update_seat_status(
		&self,
		seat_id: i32,
		status: SeatStatus,
	) -> Result<(), Error> {
		let conn = self.pool.get().await?;

		Seat::update_status(seat_id, status, &conn).await
	}

	async fn is_seat_available(
		&self,
		seat_id: i32,
		showtime_id: i32,
	) -> Result<bool, Error> {
		let conn = self.pool.get().await?;

		let held =
			PrimitiveReservation::is_seat_held(seat_id, showtime_id, &conn)
				.await?;

		Ok(!held)
	}
}

#[async_trait]
impl ShowtimeStore for PgBookingStore {
	async fn get_showtime_by_id(
		&self,
		showtime_id: i32,
	) -> Result<Option<Showtime>, Error> {
		let conn = self.pool.get().await?;

		Showtime::find(showtime_id, &conn).await
	}
}

#[async_trait]
impl UserDirectory for PgBookingStore {
	async fn user_exists(&self, user_id: i32) -> Result<bool, Error> {
		let conn = self.pool.get().await?;

		User::exists(user_id, &conn).await
	}
}

#[async_trait]
impl ReservationStore for PgBookingStore {
	async fn create_reservation(
		&self,
		new: NewReservation,
		seat_ids: &[i32],
	) -> Result<i32, Error> {
		let conn = self.pool.get().await?;

		let created = new.insert(seat_ids.to_vec(), &conn).await?;

		Ok(created.id)
	}

	async fn get_reservation(
		&self,
		reservation_id: i32,
	) -> Result<Option<Reservation>, Error> {
		let conn = self.pool.get().await?;

		Reservation::find(reservation_id, &conn).await
	}

	async fn list_reservations(
		&self,
		user_id: Option<i32>,
	) -> Result<Vec<Reservation>, Error> {
		let conn = self.pool.get().await?;

		Reservation::get_all(user_id, &conn).await
	}

	async fn delete_reservation(
		&self,
		reservation_id: i32,
	) -> Result<bool, Error> {
		let conn = self.pool.get().await?;

		Reservation::delete_by_id(reservation_id, &conn).await
	}

	async fn expire_reservations(
		&self,
		now: DateTime<Utc>,
	) -> Result<usize, Error> {
		let conn = self.pool.get().await?;

		PrimitiveReservation::expire_before(now, &conn).await
	}
}
