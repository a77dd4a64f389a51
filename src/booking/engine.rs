use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{AvailabilityChecker, BookingStore};
use crate::models::NewReservation;
use crate::schemas::reservation::ReservationResponse;
use crate::{CreateReservationError, Error};

/// Creates, lists and releases reservations
///
/// No in-process lock serializes reservations, the store's create
/// transaction is the single point that decides between overlapping requests
pub struct ReservationEngine {
	store:        Arc<dyn BookingStore>,
	availability: AvailabilityChecker,
}

impl ReservationEngine {
	#[must_use]
	pub fn new(store: Arc<dyn BookingStore>) -> Self {
		let availability = AvailabilityChecker::new(store.clone());

		Self { store, availability }
	}

	/// Reserve `seat_ids` for `showtime_id` on behalf of `user_id`
	#[instrument(skip(self))]
	pub async fn create(
		&self,
		user_id: i32,
		showtime_id: i32,
		seat_ids: Vec<i32>,
	) -> Result<ReservationResponse, Error> {
		if !self.store.user_exists(user_id).await? {
			return Err(Error::NotFound(format!("user {user_id}")));
		}

		if seat_ids.is_empty() {
			return Err(CreateReservationError::EmptySeatSelection.into());
		}

		self.availability.check(&seat_ids, showtime_id).await?;

		let Some(showtime) = self.store.get_showtime_by_id(showtime_id).await?
		else {
			return Err(Error::NotFound(format!("showtime {showtime_id}")));
		};

		let seats = self.store.get_seats_by_ids(&seat_ids).await?;

		if seats.len() != seat_ids.len() {
			let mut missing: Vec<i32> = seat_ids
				.iter()
				.copied()
				.filter(|id| !seats.iter().any(|s| s.id == *id))
				.collect();
			missing.sort_unstable();
			missing.dedup();

			if missing.is_empty() {
				return Err(Error::NotFound(
					"seat selection contains duplicate seats".to_string(),
				));
			}

			return Err(Error::NotFound(format!("seat(s) {missing:?}")));
		}

		let foreign: Vec<i32> = seats
			.iter()
			.filter(|s| s.cinema_hall_id != showtime.cinema_hall_id)
			.map(|s| s.id)
			.collect();

		if !foreign.is_empty() {
			return Err(CreateReservationError::SeatNotInHall(foreign).into());
		}

		let broken: Vec<i32> = seats
			.iter()
			.filter(|s| s.status.is_out_of_service())
			.map(|s| s.id)
			.collect();

		if !broken.is_empty() {
			return Err(CreateReservationError::SeatOutOfService(broken).into());
		}

		if showtime.end_time <= Utc::now() {
			return Err(
				CreateReservationError::ShowtimeEnded(showtime.end_time).into()
			);
		}

		let new = NewReservation {
			user_id,
			showtime_id,
			expired_at: showtime.end_time,
		};

		let id = self
			.store
			.create_reservation(new, &seat_ids)
			.await
			.inspect_err(|e| {
				if let Error::CreateReservationError(
					CreateReservationError::SeatConflict(ids),
				) = e
				{
					warn!(
						"lost race for seats {ids:?} of showtime {showtime_id}"
					);
				}
			})?;

		info!(
			"user {user_id} reserved seats {seat_ids:?} for showtime \
			 {showtime_id} as reservation {id}"
		);

		self.get(id).await
	}

	/// Get a single reservation
	#[instrument(skip(self))]
	pub async fn get(&self, id: i32) -> Result<ReservationResponse, Error> {
		let reservation = self
			.store
			.get_reservation(id)
			.await?
			.ok_or_else(|| Error::NotFound(format!("reservation {id}")))?;

		Ok(reservation.into())
	}

	/// Get every reservation
	#[instrument(skip(self))]
	pub async fn list_all(&self) -> Result<Vec<ReservationResponse>, Error> {
		let reservations = self.store.list_reservations(None).await?;

		Ok(reservations.into_iter().map(Into::into).collect())
	}

	/// Get the reservations of a single user
	#[instrument(skip(self))]
	pub async fn list_for_user(
		&self,
		user_id: i32,
	) -> Result<Vec<ReservationResponse>, Error> {
		let reservations = self.store.list_reservations(Some(user_id)).await?;

		Ok(reservations.into_iter().map(Into::into).collect())
	}

	/// Delete a reservation and release its seats
	#[instrument(skip(self))]
	pub async fn delete(&self, id: i32) -> Result<(), Error> {
		if !self.store.delete_reservation(id).await? {
			return Err(Error::NotFound(format!("reservation {id}")));
		}

		info!("deleted reservation {id}");

		Ok(())
	}

	/// Expire every reservation whose showtime ended before `now`
	#[instrument(skip(self))]
	pub async fn release_expired(
		&self,
		now: DateTime<Utc>,
	) -> Result<usize, Error> {
		let count = self.store.expire_reservations(now).await?;

		if count > 0 {
			info!("released seats of {count} expired reservations");
		}

		Ok(count)
	}
}
