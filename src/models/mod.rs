//! Database model definitions

mod cinema_hall;
mod genre;
mod movie;
mod reservation;
mod seat;
mod showtime;
mod user;

pub use cinema_hall::*;
pub use genre::*;
pub use movie::*;
pub use reservation::*;
pub use seat::*;
pub use showtime::*;
pub use user::*;
