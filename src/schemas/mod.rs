//! Request and response bodies

pub mod auth;
pub mod cinema_hall;
pub mod genre;
pub mod movie;
pub mod reservation;
pub mod seat;
pub mod showtime;
pub mod user;
