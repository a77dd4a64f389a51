//! In-memory [`BookingStore`](super::BookingStore) used by the engine tests

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{ReservationStore, SeatStore, ShowtimeStore, UserDirectory};
use crate::models::{
	NewReservation,
	PrimitiveReservation,
	Reservation,
	ReservationStatus,
	Seat,
	SeatStatus,
	Showtime,
	User,
	UserRole,
};
use crate::{CreateReservationError, Error};

#[derive(Clone, Default)]
struct MemoryState {
	users:        HashMap<i32, User>,
	showtimes:    HashMap<i32, Showtime>,
	seats:        BTreeMap<i32, Seat>,
	reservations: BTreeMap<i32, PrimitiveReservation>,
	/// (reservation id, seat id)
	links:        Vec<(i32, i32)>,
	next_id:      i32,
}

impl MemoryState {
	fn held_seats(
		&self,
		showtime_id: i32,
		seat_ids: &[i32],
		now: DateTime<Utc>,
	) -> Vec<i32> {
		let mut held: Vec<i32> = self
			.links
			.iter()
			.filter(|(r_id, s_id)| {
				seat_ids.contains(s_id)
					&& self.reservations.get(r_id).is_some_and(|r| {
						r.showtime_id == showtime_id && r.is_active(now)
					})
			})
			.map(|(_, s_id)| *s_id)
			.collect();

		held.sort_unstable();
		held.dedup();

		held
	}

	fn release_seats(&mut self, seat_ids: &[i32], now: DateTime<Utc>) {
		for seat_id in seat_ids {
			let still_held = self.links.iter().any(|(r_id, s_id)| {
				s_id == seat_id
					&& self
						.reservations
						.get(r_id)
						.is_some_and(|r| r.is_active(now))
			});

			if still_held {
				continue;
			}

			if let Some(seat) = self.seats.get_mut(seat_id) {
				if seat.status == SeatStatus::Booked {
					seat.status = SeatStatus::Available;
				}
			}
		}
	}

	fn seats_of(&self, reservation_id: i32) -> Vec<i32> {
		self.links
			.iter()
			.filter(|(r_id, _)| *r_id == reservation_id)
			.map(|(_, s_id)| *s_id)
			.collect()
	}

	fn view(&self, reservation_id: i32) -> Option<Reservation> {
		let reservation = self.reservations.get(&reservation_id)?.clone();
		let user = self.users.get(&reservation.user_id)?.clone();
		let showtime = self.showtimes.get(&reservation.showtime_id)?.clone();

		let mut seat_ids = self.seats_of(reservation_id);
		seat_ids.sort_unstable();

		let seats = seat_ids
			.iter()
			.filter_map(|id| self.seats.get(id).cloned())
			.collect();

		Some(Reservation { reservation, user, showtime, seats })
	}
}

/// Stages every write on a copy of the state and only swaps it in once the
/// whole operation succeeded, the mutex plays the role of the seat row locks
#[derive(Default)]
pub(crate) struct MemoryBookingStore {
	state:            Mutex<MemoryState>,
	fail_seat_update: AtomicBool,
}

impl MemoryBookingStore {
	pub(crate) async fn add_user(&self, id: i32, name: &str) {
		let now = Utc::now();
		let user = User {
			id,
			name: name.to_string(),
			email: format!("{name}@example.com"),
			password_hash: String::new(),
			role: UserRole::User,
			last_login: None,
			created_at: now,
			updated_at: now,
		};

		self.state.lock().await.users.insert(id, user);
	}

	pub(crate) async fn add_seat(
		&self,
		id: i32,
		hall_id: i32,
		status: SeatStatus,
	) {
		let now = Utc::now();
		let seat = Seat {
			id,
			cinema_hall_id: hall_id,
			seat_number: id.to_string(),
			row: "A".to_string(),
			status,
			created_at: now,
			updated_at: now,
		};

		self.state.lock().await.seats.insert(id, seat);
	}

	pub(crate) async fn add_showtime(
		&self,
		id: i32,
		hall_id: i32,
		start_time: DateTime<Utc>,
		end_time: DateTime<Utc>,
	) {
		let now = Utc::now();
		let showtime = Showtime {
			id,
			movie_id: 1,
			cinema_hall_id: hall_id,
			start_time,
			end_time,
			created_at: now,
			updated_at: now,
		};

		self.state.lock().await.showtimes.insert(id, showtime);
	}

	/// Seed a pending reservation that booked `seat_ids`, bypassing every
	/// check
	pub(crate) async fn add_reservation(
		&self,
		user_id: i32,
		showtime_id: i32,
		seat_ids: &[i32],
		expired_at: DateTime<Utc>,
	) -> i32 {
		let mut state = self.state.lock().await;
		let now = Utc::now();

		state.next_id += 1;
		let id = state.next_id;

		state.reservations.insert(id, PrimitiveReservation {
			id,
			user_id,
			showtime_id,
			status: ReservationStatus::Pending,
			expired_at,
			created_at: now,
			updated_at: now,
		});

		for &seat_id in seat_ids {
			state.links.push((id, seat_id));

			if let Some(seat) = state.seats.get_mut(&seat_id) {
				seat.status = SeatStatus::Booked;
			}
		}

		id
	}

	/// Make every following seat status update fail
	pub(crate) fn fail_seat_updates(&self) {
		self.fail_seat_update.store(true, Ordering::SeqCst);
	}

	pub(crate) async fn seat_status(&self, seat_id: i32) -> SeatStatus {
		self.state.lock().await.seats[&seat_id].status
	}

	pub(crate) async fn reservation_count(&self) -> usize {
		self.state.lock().await.reservations.len()
	}

	/// Number of active reservations for a showtime that hold a seat
	pub(crate) async fn active_holders(
		&self,
		showtime_id: i32,
		seat_id: i32,
	) -> usize {
		let state = self.state.lock().await;
		let now = Utc::now();

		state
			.links
			.iter()
			.filter(|(r_id, s_id)| {
				*s_id == seat_id
					&& state.reservations.get(r_id).is_some_and(|r| {
						r.showtime_id == showtime_id && r.is_active(now)
					})
			})
			.count()
	}

	fn set_seat_status(
		&self,
		state: &mut MemoryState,
		seat_id: i32,
		status: SeatStatus,
	) -> Result<(), Error> {
		if self.fail_seat_update.load(Ordering::SeqCst) {
			return Err(Error::InternalServerError);
		}

		let seat = state
			.seats
			.get_mut(&seat_id)
			.ok_or_else(|| Error::NotFound(format!("seat {seat_id}")))?;

		seat.status = status;
		seat.updated_at = Utc::now();

		Ok(())
	}
}

#[async_trait]
impl SeatStore for MemoryBookingStore {
	async fn get_seats_by_ids(
		&self,
		seat_ids: &[i32],
	) -> Result<Vec<Seat>, Error> {
		let state = self.state.lock().await;

		Ok(state
			.seats
			.values()
			.filter(|s| seat_ids.contains(&s.id))
			.cloned()
			.collect())
	}

	async fn update_seat_status(
		&self,
		seat_id: i32,
		status: SeatStatus,
	) -> Result<(), Error> {
		let mut state = self.state.lock().await;

		self.set_seat_status(&mut state, seat_id, status)
	}

	async fn is_seat_available(
		&self,
		seat_id: i32,
		showtime_id: i32,
	) -> Result<bool, Error> {
		tokio::task::yield_now().await;

		let state = self.state.lock().await;

		Ok(state.held_seats(showtime_id, &[seat_id], Utc::now()).is_empty())
	}
}

#[async_trait]
impl ShowtimeStore for MemoryBookingStore {
	async fn get_showtime_by_id(
		&self,
		showtime_id: i32,
	) -> Result<Option<Showtime>, Error> {
		Ok(self.state.lock().await.showtimes.get(&showtime_id).cloned())
	}
}

#[async_trait]
impl UserDirectory for MemoryBookingStore {
	async fn user_exists(&self, user_id: i32) -> Result<bool, Error> {
		Ok(self.state.lock().await.users.contains_key(&user_id))
	}
}

#[async_trait]
impl ReservationStore for MemoryBookingStore {
	async fn create_reservation(
		&self,
		new: NewReservation,
		seat_ids: &[i32],
	) -> Result<i32, Error> {
		let mut state = self.state.lock().await;
		let mut staged = state.clone();
		let now = Utc::now();

		let mut seat_ids = seat_ids.to_vec();
		seat_ids.sort_unstable();
		seat_ids.dedup();

		if seat_ids.iter().any(|id| !staged.seats.contains_key(id)) {
			return Err(Error::NotFound(
				"one or more seats no longer exist".to_string(),
			));
		}

		let out_of_service: Vec<i32> = seat_ids
			.iter()
			.copied()
			.filter(|id| staged.seats[id].status.is_out_of_service())
			.collect();

		if !out_of_service.is_empty() {
			return Err(
				CreateReservationError::SeatOutOfService(out_of_service).into()
			);
		}

		let held = staged.held_seats(new.showtime_id, &seat_ids, now);

		if !held.is_empty() {
			return Err(CreateReservationError::SeatConflict(held).into());
		}

		staged.next_id += 1;
		let id = staged.next_id;

		staged.reservations.insert(id, PrimitiveReservation {
			id,
			user_id: new.user_id,
			showtime_id: new.showtime_id,
			status: ReservationStatus::Pending,
			expired_at: new.expired_at,
			created_at: now,
			updated_at: now,
		});

		for &seat_id in &seat_ids {
			staged.links.push((id, seat_id));
		}

		for &seat_id in &seat_ids {
			self.set_seat_status(&mut staged, seat_id, SeatStatus::Booked)?;
		}

		*state = staged;

		Ok(id)
	}

	async fn get_reservation(
		&self,
		reservation_id: i32,
	) -> Result<Option<Reservation>, Error> {
		Ok(self.state.lock().await.view(reservation_id))
	}

	async fn list_reservations(
		&self,
		user_id: Option<i32>,
	) -> Result<Vec<Reservation>, Error> {
		let state = self.state.lock().await;

		Ok(state
			.reservations
			.values()
			.filter(|r| user_id.is_none_or(|u| r.user_id == u))
			.filter_map(|r| state.view(r.id))
			.collect())
	}

	async fn delete_reservation(
		&self,
		reservation_id: i32,
	) -> Result<bool, Error> {
		let mut state = self.state.lock().await;

		if state.reservations.remove(&reservation_id).is_none() {
			return Ok(false);
		}

		let seat_ids = state.seats_of(reservation_id);
		state.links.retain(|(r_id, _)| *r_id != reservation_id);
		state.release_seats(&seat_ids, Utc::now());

		Ok(true)
	}

	async fn expire_reservations(
		&self,
		now: DateTime<Utc>,
	) -> Result<usize, Error> {
		let mut state = self.state.lock().await;

		let expired: Vec<i32> = state
			.reservations
			.values_mut()
			.filter(|r| {
				r.status == ReservationStatus::Pending && r.expired_at <= now
			})
			.map(|r| {
				r.status = ReservationStatus::Expired;
				r.id
			})
			.collect();

		let seat_ids: Vec<i32> =
			expired.iter().flat_map(|&id| state.seats_of(id)).collect();
		state.release_seats(&seat_ids, now);

		Ok(expired.len())
	}
}
