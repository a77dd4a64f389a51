use axum::Router;
use axum::routing::{delete, get, post, put};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::auth::{login, logout, register};
use crate::controllers::cinema_hall::{
	create_cinema_hall,
	delete_cinema_hall,
	get_all_cinema_halls,
	get_cinema_hall,
	update_cinema_hall,
};
use crate::controllers::genre::{
	create_genre,
	delete_genre,
	get_all_genres,
	get_genre,
	update_genre,
};
use crate::controllers::healthcheck;
use crate::controllers::movie::{
	create_movie,
	delete_movie,
	get_all_movies,
	get_movie,
	get_movies_by_genre,
	update_movie,
};
use crate::controllers::reservation::{
	create_reservation,
	delete_reservation,
	get_reservation,
	get_reservations,
};
use crate::controllers::seat::{
	create_seat,
	delete_seat,
	get_seat,
	get_seats_for_hall,
	update_seat,
};
use crate::controllers::showtime::{
	create_showtime,
	delete_showtime,
	get_all_showtimes,
	get_showtime,
	get_showtime_seats,
	update_showtime,
};
use crate::controllers::user::{
	change_password,
	get_current_user,
	update_current_user,
};
use crate::middleware::{AdminLayer, AuthLayer};

/// Get the app router
pub fn get_app_router(state: AppState) -> Router {
	let request_timeout = state.config.request_timeout;

	let api_routes = Router::new()
		.route("/healthcheck", get(healthcheck))
		.nest("/auth", auth_routes(&state))
		.nest("/users", user_routes(&state))
		.nest("/genres", genre_routes(&state))
		.nest("/movies", movie_routes(&state))
		.nest("/cinema-halls", cinema_hall_routes(&state))
		.nest("/seats", seat_routes(&state))
		.nest("/showtimes", showtime_routes(&state))
		.nest("/reservations", reservation_routes(&state));

	Router::new()
		.merge(api_routes)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(request_timeout))
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

/// Authentication routes
fn auth_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/register", post(register))
		.route("/login", post(login))
		.route(
			"/logout",
			post(logout).route_layer(AuthLayer::new(state.clone())),
		)
}

/// Routes for the logged in user
fn user_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/me", get(get_current_user).patch(update_current_user))
		.route("/me/password", put(change_password))
		.route_layer(AuthLayer::new(state.clone()))
}

/// Genre routes, writes are admin only
fn genre_routes(state: &AppState) -> Router<AppState> {
	let protected = Router::new()
		.route("/", post(create_genre))
		.route("/{id}", put(update_genre).delete(delete_genre))
		.route_layer(AdminLayer::new());

	Router::new()
		.route("/", get(get_all_genres))
		.route("/{id}", get(get_genre))
		.merge(protected)
		.route_layer(AuthLayer::new(state.clone()))
}

/// Movie routes, writes are admin only
fn movie_routes(state: &AppState) -> Router<AppState> {
	let protected = Router::new()
		.route("/", post(create_movie))
		.route("/{id}", put(update_movie).delete(delete_movie))
		.route_layer(AdminLayer::new());

	Router::new()
		.route("/", get(get_all_movies))
		.route("/{id}", get(get_movie))
		.route("/genre/{genre_id}", get(get_movies_by_genre))
		.merge(protected)
		.route_layer(AuthLayer::new(state.clone()))
}

/// Cinema hall routes, admin only
fn cinema_hall_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/", get(get_all_cinema_halls).post(create_cinema_hall))
		.route(
			"/{id}",
			get(get_cinema_hall)
				.put(update_cinema_hall)
				.delete(delete_cinema_hall),
		)
		.route_layer(AdminLayer::new())
		.route_layer(AuthLayer::new(state.clone()))
}

/// Seat routes, admin only
fn seat_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/", post(create_seat))
		.route("/{id}", get(get_seat).put(update_seat).delete(delete_seat))
		.route("/hall/{hall_id}", get(get_seats_for_hall))
		.route_layer(AdminLayer::new())
		.route_layer(AuthLayer::new(state.clone()))
}

/// Showtime routes, writes are admin only
fn showtime_routes(state: &AppState) -> Router<AppState> {
	let protected = Router::new()
		.route("/", post(create_showtime))
		.route("/{id}", put(update_showtime).delete(delete_showtime))
		.route_layer(AdminLayer::new());

	Router::new()
		.route("/", get(get_all_showtimes))
		.route("/{id}", get(get_showtime))
		.route("/{id}/seats", get(get_showtime_seats))
		.merge(protected)
		.route_layer(AuthLayer::new(state.clone()))
}

/// Reservation routes, deleting is admin only
fn reservation_routes(state: &AppState) -> Router<AppState> {
	let protected = Router::new()
		.route("/{id}", delete(delete_reservation))
		.route_layer(AdminLayer::new());

	Router::new()
		.route("/", get(get_reservations).post(create_reservation))
		.route("/{id}", get(get_reservation))
		.merge(protected)
		.route_layer(AuthLayer::new(state.clone()))
}
