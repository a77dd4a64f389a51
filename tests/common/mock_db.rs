use std::sync::LazyLock;

use cinema_backend::{DbConn, DbPool};
use deadpool_diesel::postgres::{Manager, Pool};
use diesel::RunQueryDsl;
use diesel_migrations::{
	EmbeddedMigrations,
	MigrationHarness,
	embed_migrations,
};
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Global test database provider
pub static DATABASE_PROVIDER: LazyLock<DatabaseProvider> =
	LazyLock::new(DatabaseProvider::new);

/// Creates a fresh database per test on the server behind `DATABASE_URL`
pub struct DatabaseProvider {
	base_url:  String,
	root_pool: DbPool,
}

/// A temporary test database, dropped together with this guard
pub struct DatabaseGuard {
	root_conn:     DbConn,
	database_name: String,
	database_url:  String,
}

fn build_pool(database_url: String) -> DbPool {
	let manager = Manager::new(database_url, deadpool_diesel::Runtime::Tokio1);

	Pool::builder(manager).build().expect("could not build test pool")
}

impl DatabaseProvider {
	fn new() -> Self {
		if Ok("true".to_string()) == std::env::var("CI") {
			tracing_subscriber::fmt()
				.pretty()
				.with_thread_names(true)
				.with_max_level(tracing::Level::DEBUG)
				.init();
		}

		let database_url = std::env::var("DATABASE_URL").unwrap();
		let (base_url, _) = database_url.rsplit_once('/').unwrap();

		Self {
			base_url:  base_url.to_string(),
			root_pool: build_pool(database_url.clone()),
		}
	}

	/// Create a new temporary database and guard it
	///
	/// # Panics
	/// Panics if creating the database fails
	pub async fn acquire(&self) -> DatabaseGuard {
		let database_name =
			format!("cinema_test_{}", Uuid::new_v4().simple());
		let database_url = format!("{}/{}", self.base_url, database_name);

		let root_conn = self
			.root_pool
			.get()
			.await
			.expect("could not get root pool connection");

		let create_db_query = format!("CREATE DATABASE {database_name};");

		root_conn
			.interact(|conn| diesel::sql_query(create_db_query).execute(conn))
			.await
			.expect("could not interact with root connection")
			.expect("could not create test database");

		DatabaseGuard { root_conn, database_name, database_url }
	}
}

impl DatabaseGuard {
	/// Create a pool for this database and run every migration on it
	///
	/// # Panics
	/// Panics if the migrations fail
	pub async fn create_pool(&self) -> DbPool {
		let pool = build_pool(self.database_url.clone());

		let conn = pool.get().await.expect("could not get test connection");

		conn.interact(|conn| {
			conn.run_pending_migrations(MIGRATIONS).map(|_| ())
		})
		.await
		.expect("could not interact with test connection")
		.expect("could not run migrations");

		pool
	}
}

impl Drop for DatabaseGuard {
	fn drop(&mut self) {
		let drop_db_query =
			format!("DROP DATABASE {} WITH (FORCE);", self.database_name);

		futures::executor::block_on(async move {
			self.root_conn
				.interact(|conn| diesel::sql_query(drop_db_query).execute(conn))
				.await
				.expect("could not interact with root connection")
				.expect("could not drop test database");
		});
	}
}
