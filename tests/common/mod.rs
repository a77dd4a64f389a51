use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{TimeDelta, Utc};
use cinema_backend::models::{
	NewCinemaHall,
	NewGenre,
	NewMovie,
	NewSeat,
	NewShowtime,
	NewUser,
	Seat,
	SeatStatus,
	User,
	UserRole,
};
use cinema_backend::schemas::auth::{LoginRequest, TokenResponse};
use cinema_backend::{AppState, Config, DbConn, routes};
use mock_redis::{RedisUrlGuard, RedisUrlProvider};

mod mock_db;
mod mock_redis;

use mock_db::{DATABASE_PROVIDER, DatabaseGuard};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const USER_EMAIL: &str = "bob@example.com";
pub const OTHER_USER_EMAIL: &str = "alice@example.com";
pub const PASSWORD: &str = "bobdebouwer1234!";

/// Catalog rows every test environment starts with
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct Fixture {
	pub genre_id:          i32,
	pub movie_id:          i32,
	pub hall_id:           i32,
	pub other_hall_id:     i32,
	pub seat_ids:          Vec<i32>,
	pub other_hall_seat:   i32,
	pub broken_seat:       i32,
	pub showtime_id:       i32,
	pub ended_showtime_id: i32,
}

#[allow(dead_code)]
pub struct TestEnv {
	pub app:         TestServer,
	pub fixture:     Fixture,
	pub db_guard:    DatabaseGuard,
	pub redis_guard: RedisUrlGuard,
}

impl TestEnv {
	/// Get a test environment with mocked resources for running tests
	///
	/// # Panics
	/// Panics if seeding the database or building the test server fails
	pub async fn new() -> Self {
		let config = Config::from_env();

		let db_guard = (*DATABASE_PROVIDER).acquire().await;
		let test_pool = db_guard.create_pool().await;

		let fixture = {
			let conn = test_pool.get().await.unwrap();

			seed_users(&conn).await;
			seed_catalog(&conn).await
		};

		let redis_guard = RedisUrlProvider::acquire();
		let redis_connection = redis_guard.connect().await;

		let state = AppState::new(config, test_pool, redis_connection);
		let app = routes::get_app_router(state);

		let test_server = TestServer::new(app).unwrap();

		TestEnv { app: test_server, fixture, db_guard, redis_guard }
	}

	/// Log in as one of the seeded users and get their bearer token
	///
	/// # Panics
	/// Panics if logging in fails
	pub async fn token(&self, email: &str) -> String {
		let response = self
			.app
			.post("/auth/login")
			.json(&LoginRequest {
				email:    email.to_string(),
				password: PASSWORD.to_string(),
			})
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);

		response.json::<TokenResponse>().token
	}

	/// Log in and send the bearer token with every following request
	pub async fn login(mut self, email: &str) -> Self {
		let token = self.token(email).await;
		let value = HeaderValue::from_str(&format!("Bearer {token}")).unwrap();

		self.app.add_header(AUTHORIZATION, value);

		self
	}

	#[allow(dead_code)]
	pub async fn login_user(self) -> Self { self.login(USER_EMAIL).await }

	#[allow(dead_code)]
	pub async fn login_admin(self) -> Self { self.login(ADMIN_EMAIL).await }
}

async fn seed_users(conn: &DbConn) {
	let users = [
		("Admin", ADMIN_EMAIL, UserRole::Admin),
		("Bob", USER_EMAIL, UserRole::User),
		("Alice", OTHER_USER_EMAIL, UserRole::User),
	];

	for (name, email, role) in users {
		NewUser {
			name: name.to_string(),
			email: email.to_string(),
			password_hash: User::hash_password(PASSWORD).unwrap(),
			role,
		}
		.insert(conn)
		.await
		.unwrap();
	}
}

async fn seed_catalog(conn: &DbConn) -> Fixture {
	let genre = NewGenre { name: "Thriller".to_string() }
		.insert(conn)
		.await
		.unwrap();

	let movie = NewMovie {
		title:        "Heat".to_string(),
		description:  "A heist gone wrong".to_string(),
		duration:     170,
		release_date: Utc::now() - TimeDelta::days(365),
		image_url:    None,
		rating:       4.5,
	}
	.insert(vec![genre.id], conn)
	.await
	.unwrap();

	let hall = NewCinemaHall { name: "Hall 1".to_string(), capacity: 40 }
		.insert(conn)
		.await
		.unwrap();
	let other_hall =
		NewCinemaHall { name: "Hall 2".to_string(), capacity: 20 }
			.insert(conn)
			.await
			.unwrap();

	let mut seat_ids = vec![];
	for number in 1..=4 {
		let seat = NewSeat {
			cinema_hall_id: hall.id,
			seat_number:    number.to_string(),
			row:            "A".to_string(),
		}
		.insert(conn)
		.await
		.unwrap();

		seat_ids.push(seat.id);
	}

	let other_hall_seat = NewSeat {
		cinema_hall_id: other_hall.id,
		seat_number:    "1".to_string(),
		row:            "A".to_string(),
	}
	.insert(conn)
	.await
	.unwrap();

	let broken_seat = NewSeat {
		cinema_hall_id: hall.id,
		seat_number:    "1".to_string(),
		row:            "B".to_string(),
	}
	.insert(conn)
	.await
	.unwrap();
	Seat::update_status(broken_seat.id, SeatStatus::Broken, conn)
		.await
		.unwrap();

	let start = Utc::now() + TimeDelta::days(1);
	let showtime = NewShowtime {
		movie_id:       movie.movie.id,
		cinema_hall_id: hall.id,
		start_time:     start,
		end_time:       start + TimeDelta::hours(3),
	}
	.insert(conn)
	.await
	.unwrap();

	let past = Utc::now() - TimeDelta::days(1);
	let ended_showtime = NewShowtime {
		movie_id:       movie.movie.id,
		cinema_hall_id: hall.id,
		start_time:     past,
		end_time:       past + TimeDelta::hours(3),
	}
	.insert(conn)
	.await
	.unwrap();

	Fixture {
		genre_id: genre.id,
		movie_id: movie.movie.id,
		hall_id: hall.id,
		other_hall_id: other_hall.id,
		seat_ids,
		other_hall_seat: other_hall_seat.id,
		broken_seat: broken_seat.id,
		showtime_id: showtime.id,
		ended_showtime_id: ended_showtime.id,
	}
}
