use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use crate::schema::app_user;
use crate::{DbConn, Error};

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
	#[default]
	User,
	Admin,
}

/// A single user account
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = app_user)]
#[diesel(check_for_backend(Pg))]
pub struct User {
	pub id:            i32,
	pub name:          String,
	pub email:         String,
	#[serde(skip)]
	pub password_hash: String,
	pub role:          UserRole,
	pub last_login:    Option<DateTime<Utc>>,
	pub created_at:    DateTime<Utc>,
	pub updated_at:    DateTime<Utc>,
}

impl User {
	/// Hash a password with argon2 and a random salt
	pub fn hash_password(password: &str) -> Result<String, Error> {
		let salt = SaltString::generate(&mut OsRng);
		let hashed_password = Argon2::default()
			.hash_password(password.as_bytes(), &salt)?
			.to_string();

		Ok(hashed_password)
	}

	/// Check a password against the stored hash of this [`User`]
	pub fn verify_password(&self, password: &str) -> Result<(), Error> {
		let password_hash = PasswordHash::new(&self.password_hash)?;

		Argon2::default()
			.verify_password(password.as_bytes(), &password_hash)?;

		Ok(())
	}

	/// Get a [`User`] given its id
	#[instrument(skip(conn))]
	pub async fn get(query_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let user = conn
			.interact(move |conn| {
				use self::app_user::dsl::*;

				app_user
					.find(query_id)
					.select(Self::as_select())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("user {query_id}")))?;

		Ok(user)
	}

	/// Get a [`User`] given its email
	#[instrument(skip(conn))]
	pub async fn get_by_email(
		query_email: String,
		conn: &DbConn,
	) -> Result<Option<Self>, Error> {
		let user = conn
			.interact(|conn| {
				use self::app_user::dsl::*;

				app_user
					.filter(email.eq(query_email))
					.select(Self::as_select())
					.first(conn)
					.optional()
			})
			.await??;

		Ok(user)
	}

	/// Check if a [`User`] with a given id exists
	#[instrument(skip(conn))]
	pub async fn exists(query_id: i32, conn: &DbConn) -> Result<bool, Error> {
		let exists = conn
			.interact(move |conn| {
				use self::app_user::dsl::*;

				diesel::select(diesel::dsl::exists(app_user.find(query_id)))
					.get_result(conn)
			})
			.await??;

		Ok(exists)
	}

	/// Apply a [`UserUpdate`] to the user with the given id
	#[instrument(skip(conn))]
	pub async fn update(
		query_id: i32,
		changes: UserUpdate,
		conn: &DbConn,
	) -> Result<Self, Error> {
		if changes.name.is_none() && changes.email.is_none() {
			return Self::get(query_id, conn).await;
		}

		let user = conn
			.interact(move |conn| {
				use self::app_user::dsl::*;

				diesel::update(app_user.find(query_id))
					.set(changes)
					.returning(Self::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("updated user {}", user.id);

		Ok(user)
	}

	/// Replace the password hash of the user with the given id
	#[instrument(skip(new_hash, conn))]
	pub async fn update_password(
		query_id: i32,
		new_hash: String,
		conn: &DbConn,
	) -> Result<(), Error> {
		conn.interact(move |conn| {
			use self::app_user::dsl::*;

			diesel::update(app_user.find(query_id))
				.set(password_hash.eq(new_hash))
				.execute(conn)
		})
		.await??;

		info!("changed password for user {query_id}");

		Ok(())
	}

	/// Record a successful login for the user with the given id
	#[instrument(skip(conn))]
	pub async fn update_last_login(
		query_id: i32,
		conn: &DbConn,
	) -> Result<(), Error> {
		conn.interact(move |conn| {
			use self::app_user::dsl::*;

			diesel::update(app_user.find(query_id))
				.set(last_login.eq(Utc::now()))
				.execute(conn)
		})
		.await??;

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable)]
#[diesel(table_name = app_user)]
#[diesel(check_for_backend(Pg))]
pub struct NewUser {
	pub name:          String,
	pub email:         String,
	pub password_hash: String,
	pub role:          UserRole,
}

impl NewUser {
	/// Insert this [`NewUser`]
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<User, Error> {
		let user = conn
			.interact(|conn| {
				use self::app_user::dsl::*;

				diesel::insert_into(app_user)
					.values(self)
					.returning(User::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("registered user {} ({})", user.id, user.email);

		Ok(user)
	}
}

#[derive(AsChangeset, Clone, Debug, Default, Deserialize)]
#[diesel(table_name = app_user)]
#[diesel(check_for_backend(Pg))]
pub struct UserUpdate {
	pub name:  Option<String>,
	pub email: Option<String>,
}
