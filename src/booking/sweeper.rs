use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::ReservationEngine;

/// Start an infinitely looping task that expires finished reservations and
/// releases their seats every `interval`
pub fn spawn_expiry_sweeper(
	engine: Arc<ReservationEngine>,
	interval: Duration,
) -> JoinHandle<()> {
	tokio::spawn(run_expiry_sweeper(engine, interval))
}

#[instrument(skip(engine))]
async fn run_expiry_sweeper(
	engine: Arc<ReservationEngine>,
	interval: Duration,
) {
	let mut ticker = tokio::time::interval(interval);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		ticker.tick().await;

		if let Err(e) = engine.release_expired(Utc::now()).await {
			error!("failed to release expired reservations -- {e}");
		}
	}
}
