use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::customer::CustomerId;

/// Store-generated primary key for a reservation row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub i64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single booking, owned by exactly one customer.
///
/// Customers never hold reservation instances; they are fetched on demand
/// through the reservation repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Option<ReservationId>,
    pub customer_id: CustomerId,
    pub num_guests: i32,
    pub start_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Reservation {
    /// Construct a transient reservation for the given customer.
    pub fn new(
        customer_id: CustomerId,
        num_guests: i32,
        start_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self { id: None, customer_id, num_guests, start_at, notes }
    }
}
