use std::time::Duration;

use chrono::TimeDelta;
use deadpool_diesel::postgres::{Manager, Pool};
use redis::aio::MultiplexedConnection;

/// Application configuration, loaded once at startup
#[derive(Clone, Debug)]
pub struct Config {
	pub database_url: String,
	pub redis_url:    String,
	pub server_port:  u16,

	pub access_token_lifetime: TimeDelta,

	pub reservation_sweep_interval: Duration,
	pub request_timeout:            Duration,
}

impl Config {
	fn get_env_var(var: &str) -> String {
		std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set"))
	}

	fn get_env_var_or<T: std::str::FromStr>(var: &str, default: T) -> T {
		match std::env::var(var) {
			Ok(v) => {
				v.parse::<T>()
					.unwrap_or_else(|_| panic!("{var} has an invalid value"))
			},
			Err(_) => default,
		}
	}

	/// Create a new [`Config`] from environment variables
	///
	/// # Panics
	/// Panics if a required environment variable is missing or malformed
	#[must_use]
	pub fn from_env() -> Self {
		let database_url = Self::get_env_var("DATABASE_URL");
		let redis_url = Self::get_env_var("REDIS_URL");
		let server_port = Self::get_env_var_or("SERVER_PORT", 8080);

		let access_token_lifetime = TimeDelta::minutes(
			Self::get_env_var("ACCESS_TOKEN_LIFETIME_MINUTES")
				.parse::<i64>()
				.unwrap_or_else(|_| {
					panic!("ACCESS_TOKEN_LIFETIME_MINUTES has an invalid value")
				}),
		);

		let reservation_sweep_interval = Duration::from_secs(
			Self::get_env_var_or("RESERVATION_SWEEP_INTERVAL_SECONDS", 60_u64)
				.max(1),
		);
		let request_timeout = Duration::from_secs(Self::get_env_var_or(
			"REQUEST_TIMEOUT_SECONDS",
			10,
		));

		Self {
			database_url,
			redis_url,
			server_port,
			access_token_lifetime,
			reservation_sweep_interval,
			request_timeout,
		}
	}

	/// Create a database pool for the given config
	///
	/// # Panics
	/// Panics if creating the pool fails
	#[must_use]
	pub fn create_database_pool(&self) -> Pool {
		let manager = Manager::new(
			self.database_url.to_string(),
			deadpool_diesel::Runtime::Tokio1,
		);

		Pool::builder(manager).build().unwrap()
	}

	/// Create a multiplexed redis connection for the given config
	///
	/// # Panics
	/// Panics if the redis server can not be reached
	pub async fn create_redis_connection(&self) -> MultiplexedConnection {
		let client = redis::Client::open(self.redis_url.as_str())
			.expect("COULD NOT PARSE REDIS URL");

		client
			.get_multiplexed_async_connection()
			.await
			.expect("COULD NOT CONNECT TO REDIS")
	}
}
