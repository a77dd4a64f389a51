use axum::http::StatusCode;
use cinema_backend::models::UserRole;
use cinema_backend::schemas::auth::{LoginRequest, RegisterRequest};
use cinema_backend::schemas::user::{
	ChangePasswordRequest,
	UpdateUserRequest,
	UserResponse,
};

mod common;

use common::{PASSWORD, TestEnv, USER_EMAIL};

fn register_request(email: &str) -> RegisterRequest {
	RegisterRequest {
		name:     "Carol".to_string(),
		email:    email.to_string(),
		password: "carolcarol1234".to_string(),
	}
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires postgres and redis"]
async fn register() {
	let env = TestEnv::new().await;

	let response = env
		.app
		.post("/auth/register")
		.json(&register_request("carol@example.com"))
		.await;

	assert_eq!(response.status_code(), StatusCode::CREATED);

	let body = response.json::<UserResponse>();

	assert_eq!(body.email, "carol@example.com");
	assert_eq!(body.role, UserRole::User);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires postgres and redis"]
async fn register_duplicate_email() {
	let env = TestEnv::new().await;

	let response =
		env.app.post("/auth/register").json(&register_request(USER_EMAIL)).await;

	assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires postgres and redis"]
async fn register_short_password() {
	let env = TestEnv::new().await;

	let response = env
		.app
		.post("/auth/register")
		.json(&RegisterRequest {
			password: "short".to_string(),
			..register_request("carol@example.com")
		})
		.await;

	assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires postgres and redis"]
async fn login_wrong_password() {
	let env = TestEnv::new().await;

	let response = env
		.app
		.post("/auth/login")
		.json(&LoginRequest {
			email:    USER_EMAIL.to_string(),
			password: "notthepassword".to_string(),
		})
		.await;

	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires postgres and redis"]
async fn login_unknown_email() {
	let env = TestEnv::new().await;

	let response = env
		.app
		.post("/auth/login")
		.json(&LoginRequest {
			email:    "nobody@example.com".to_string(),
			password: PASSWORD.to_string(),
		})
		.await;

	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires postgres and redis"]
async fn invalid_token_is_rejected() {
	let env = TestEnv::new().await;

	let response =
		env.app.get("/users/me").authorization_bearer("not-a-session").await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires postgres and redis"]
async fn logout() {
	let env = TestEnv::new().await;
	let token = env.token(USER_EMAIL).await;

	let response = env.app.get("/users/me").authorization_bearer(&token).await;

	assert_eq!(response.status_code(), StatusCode::OK);
	assert_eq!(response.json::<UserResponse>().email, USER_EMAIL);

	let response =
		env.app.post("/auth/logout").authorization_bearer(&token).await;

	assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

	let response = env.app.get("/users/me").authorization_bearer(&token).await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires postgres and redis"]
async fn update_current_user() {
	let env = TestEnv::new().await.login_user().await;

	let response = env
		.app
		.patch("/users/me")
		.json(&UpdateUserRequest { name: Some("Robert".to_string()), email: None })
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<UserResponse>();

	assert_eq!(body.name, "Robert");
	assert_eq!(body.email, USER_EMAIL);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires postgres and redis"]
async fn change_password() {
	let env = TestEnv::new().await.login_user().await;

	let response = env
		.app
		.put("/users/me/password")
		.json(&ChangePasswordRequest {
			current_password: "notthepassword".to_string(),
			new_password:     "anewpassword1234".to_string(),
		})
		.await;

	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

	let response = env
		.app
		.put("/users/me/password")
		.json(&ChangePasswordRequest {
			current_password: PASSWORD.to_string(),
			new_password:     "anewpassword1234".to_string(),
		})
		.await;

	assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

	let response = env
		.app
		.post("/auth/login")
		.json(&LoginRequest {
			email:    USER_EMAIL.to_string(),
			password: "anewpassword1234".to_string(),
		})
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);
}
