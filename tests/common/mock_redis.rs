use std::sync::{LazyLock, Mutex, MutexGuard};

use cinema_backend::RedisConn;
use redis::cmd;

/// Number of logical databases a default redis server exposes
const REDIS_DATABASES: usize = 16;

static REDIS_DATABASE_URLS: LazyLock<[Mutex<&'static str>; REDIS_DATABASES]> =
	LazyLock::new(|| {
		let redis_url = std::env::var("REDIS_URL").unwrap();

		std::array::from_fn(|i| {
			let url: &'static str = format!("{redis_url}/{i}").leak();

			Mutex::new(url)
		})
	});

/// Hands out exclusive access to one of the numbered redis databases
pub struct RedisUrlProvider;

/// A locked redis database, flushed when dropped
pub struct RedisUrlGuard(MutexGuard<'static, &'static str>);

impl RedisUrlProvider {
	/// Lock a free redis database for the duration of a test
	pub fn acquire() -> RedisUrlGuard {
		let mut i = 0;

		loop {
			if let Ok(lock) = REDIS_DATABASE_URLS[i].try_lock() {
				return RedisUrlGuard(lock);
			}

			i = (i + 1) % REDIS_DATABASES;
		}
	}
}

impl RedisUrlGuard {
	/// Open a connection to the locked database
	pub async fn connect(&self) -> RedisConn {
		let client = redis::Client::open(*self.0).unwrap();

		client.get_multiplexed_async_connection().await.unwrap()
	}
}

impl Drop for RedisUrlGuard {
	fn drop(&mut self) {
		futures::executor::block_on(async {
			let mut conn = self.connect().await;

			let _: () = cmd("FLUSHDB").query_async(&mut conn).await.unwrap();
		});
	}
}
