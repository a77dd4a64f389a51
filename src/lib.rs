//! # Cinema backend library

#[macro_use]
extern crate tracing;

use std::sync::Arc;

use axum::extract::FromRef;
use deadpool_diesel::postgres::{Object, Pool};
use redis::aio::MultiplexedConnection;

mod config;

pub mod booking;
pub mod controllers;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod schemas;
pub mod session;

pub use config::Config;
pub use error::*;

use crate::booking::ReservationEngine;

/// An entire database pool
pub type DbPool = Pool;

/// A single database connection
pub type DbConn = Object;

/// A redis cache connection
pub type RedisConn = MultiplexedConnection;

/// Common state of the app
#[derive(Clone)]
pub struct AppState {
	pub config:           Config,
	pub database_pool:    DbPool,
	pub redis_connection: RedisConn,
	pub engine:           Arc<ReservationEngine>,
}

impl AppState {
	/// Build the app state, wiring the reservation engine to the database
	#[must_use]
	pub fn new(
		config: Config,
		database_pool: DbPool,
		redis_connection: RedisConn,
	) -> Self {
		let store = booking::PgBookingStore::new(database_pool.clone());
		let engine = Arc::new(ReservationEngine::new(Arc::new(store)));

		Self { config, database_pool, redis_connection, engine }
	}
}

impl FromRef<AppState> for Config {
	fn from_ref(input: &AppState) -> Self { input.config.clone() }
}

impl FromRef<AppState> for DbPool {
	fn from_ref(input: &AppState) -> Self { input.database_pool.clone() }
}

impl FromRef<AppState> for RedisConn {
	fn from_ref(input: &AppState) -> Self { input.redis_connection.clone() }
}

impl FromRef<AppState> for Arc<ReservationEngine> {
	fn from_ref(input: &AppState) -> Self { input.engine.clone() }
}
