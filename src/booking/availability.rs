use std::sync::Arc;

use futures::future::join_all;

use super::BookingStore;
use crate::{CreateReservationError, Error};

/// Checks which of a set of seats are already held for a showtime
///
/// The check is advisory, the reservation store repeats it while holding the
/// seat locks
#[derive(Clone)]
pub struct AvailabilityChecker {
	store: Arc<dyn BookingStore>,
}

impl AvailabilityChecker {
	#[must_use]
	pub fn new(store: Arc<dyn BookingStore>) -> Self { Self { store } }

	/// Probe every seat concurrently
	///
	/// Fails with the first store error, or with a seat conflict naming every
	/// seat that is already held
	#[instrument(skip(self))]
	pub async fn check(
		&self,
		seat_ids: &[i32],
		showtime_id: i32,
	) -> Result<(), Error> {
		let probes = seat_ids.iter().map(|&seat_id| {
			async move {
				let available =
					self.store.is_seat_available(seat_id, showtime_id).await?;

				Ok::<_, Error>((seat_id, available))
			}
		});

		let mut conflicts = vec![];

		for result in join_all(probes).await {
			let (seat_id, available) = result?;

			if !available {
				conflicts.push(seat_id);
			}
		}

		if conflicts.is_empty() {
			return Ok(());
		}

		conflicts.sort_unstable();
		conflicts.dedup();

		warn!("seats {conflicts:?} are already held for showtime {showtime_id}");

		Err(CreateReservationError::SeatConflict(conflicts).into())
	}
}
