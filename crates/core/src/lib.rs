pub mod domain;

pub use domain::customer::{Customer, CustomerId};
pub use domain::reservation::{Reservation, ReservationId};
