use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{User, UserRole, UserUpdate};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserResponse {
	pub id:         i32,
	pub name:       String,
	pub email:      String,
	pub role:       UserRole,
	pub last_login: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
	fn from(user: User) -> Self {
		Self {
			id:         user.id,
			name:       user.name,
			email:      user.email,
			role:       user.role,
			last_login: user.last_login,
			created_at: user.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct UpdateUserRequest {
	#[validate(length(
		min = 2,
		max = 50,
		message = "name must be between 2 and 50 characters long",
		code = "name-length"
	))]
	pub name:  Option<String>,
	#[validate(email(message = "invalid email", code = "email"))]
	pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
	fn from(value: UpdateUserRequest) -> Self {
		Self { name: value.name, email: value.email }
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct ChangePasswordRequest {
	pub current_password: String,
	#[validate(length(
		min = 8,
		message = "password must be at least 8 characters long",
		code = "password-length"
	))]
	pub new_password:     String,
}
