//! Seat reservation engine
//!
//! The engine only talks to storage through the traits in this module, the
//! postgres implementation lives in [`postgres`]

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Error;
use crate::models::{NewReservation, Reservation, Seat, SeatStatus, Showtime};

mod availability;
mod engine;
#[cfg(test)]
mod memory;
mod postgres;
mod sweeper;

pub use availability::AvailabilityChecker;
pub use engine::ReservationEngine;
pub use postgres::PgBookingStore;
pub use sweeper::spawn_expiry_sweeper;

/// Seat records and their status
#[async_trait]
pub trait SeatStore: Send + Sync {
	/// Get every seat with an id in `seat_ids`, unknown ids are skipped
	async fn get_seats_by_ids(&self, seat_ids: &[i32])
	-> Result<Vec<Seat>, Error>;

	async fn update_seat_status(
		&self,
		seat_id: i32,
		status: SeatStatus,
	) -> Result<(), Error>;

	/// A seat is available for a showtime when no active reservation for that
	/// showtime holds it
	async fn is_seat_available(
		&self,
		seat_id: i32,
		showtime_id: i32,
	) -> Result<bool, Error>;
}

#[async_trait]
pub trait ShowtimeStore: Send + Sync {
	async fn get_showtime_by_id(
		&self,
		showtime_id: i32,
	) -> Result<Option<Showtime>, Error>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
	async fn user_exists(&self, user_id: i32) -> Result<bool, Error>;
}

/// Reservation records and their seat links
#[async_trait]
pub trait ReservationStore: Send + Sync {
	/// Atomically persist a reservation holding `seat_ids` and mark every seat
	/// as booked
	///
	/// Fails with a seat conflict if an active reservation for the same
	/// showtime already holds one of the seats, nothing is written in that
	/// case or on any other failure
	async fn create_reservation(
		&self,
		new: NewReservation,
		seat_ids: &[i32],
	) -> Result<i32, Error>;

	async fn get_reservation(
		&self,
		reservation_id: i32,
	) -> Result<Option<Reservation>, Error>;

	/// List every reservation, or only those of `user_id`
	async fn list_reservations(
		&self,
		user_id: Option<i32>,
	) -> Result<Vec<Reservation>, Error>;

	/// Delete a reservation and release its seats, `false` if it did not exist
	async fn delete_reservation(&self, reservation_id: i32)
	-> Result<bool, Error>;

	/// Expire every pending reservation past its expiry and release its seats
	async fn expire_reservations(
		&self,
		now: DateTime<Utc>,
	) -> Result<usize, Error>;
}

/// Everything the [`ReservationEngine`] needs from storage
pub trait BookingStore:
	SeatStore + ShowtimeStore + UserDirectory + ReservationStore
{
}

impl<T> BookingStore for T where
	T: SeatStore + ShowtimeStore + UserDirectory + ReservationStore
{
}
