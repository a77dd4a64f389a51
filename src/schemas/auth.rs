use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
	#[validate(length(
		min = 2,
		max = 50,
		message = "name must be between 2 and 50 characters long",
		code = "name-length"
	))]
	pub name:     String,
	#[validate(email(message = "invalid email", code = "email"))]
	pub email:    String,
	#[validate(length(
		min = 8,
		message = "password must be at least 8 characters long",
		code = "password-length"
	))]
	pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoginRequest {
	pub email:    String,
	pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenResponse {
	pub token:      String,
	pub token_type: String,
	/// Lifetime of the token in seconds
	pub expires_in: i64,
}

impl TokenResponse {
	#[must_use]
	pub fn bearer(token: String, expires_in: i64) -> Self {
		Self { token, token_type: "Bearer".to_string(), expires_in }
	}
}
