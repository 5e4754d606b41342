use async_trait::async_trait;
use thiserror::Error;

use tablebook_core::domain::customer::{Customer, CustomerId};
use tablebook_core::domain::reservation::Reservation;

pub mod customer;
pub mod memory;
pub mod reservation;

pub use customer::SqlCustomerRepository;
pub use memory::InMemoryStore;
pub use reservation::SqlReservationRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("no such customer: {0}")]
    NotFound(CustomerId),
}

impl RepositoryError {
    /// HTTP-equivalent status for upstream translation of this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Database(_) | Self::Decode(_) => 500,
        }
    }
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// All customers ordered by last name, then first name.
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Customers whose full name contains `term` as a case-insensitive
    /// substring.
    ///
    /// Fetches the same rows as [`list`](Self::list) and filters them
    /// in-process, so the result is `list` ordering restricted to matches.
    /// An empty term matches every customer.
    async fn search(&self, term: &str) -> Result<Vec<Customer>, RepositoryError>;

    /// The customer with the given id, or [`RepositoryError::NotFound`].
    async fn get(&self, id: CustomerId) -> Result<Customer, RepositoryError>;

    /// Up to `limit` customers ranked by descending reservation count.
    ///
    /// Inner-join semantics: a customer must have at least one reservation
    /// to appear. Ties between equal counts fall to the store's ordering.
    async fn best_customers(&self, limit: u32) -> Result<Vec<Customer>, RepositoryError>;

    /// Insert or update keyed on identifier presence.
    ///
    /// A transient customer is inserted and adopts the store-generated id.
    /// A persisted customer is updated in place; updating an id with no
    /// matching row affects zero rows and is not an error.
    async fn save(&self, customer: &mut Customer) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All reservations for the given customer, ordered by start time.
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Reservation>, RepositoryError>;

    /// Insert or update keyed on identifier presence, as for customers.
    async fn save(&self, reservation: &mut Reservation) -> Result<(), RepositoryError>;
}

/// Case-insensitive substring filter over the derived full name. Preserves
/// input order.
pub(crate) fn filter_by_full_name(customers: Vec<Customer>, term: &str) -> Vec<Customer> {
    let needle = term.to_lowercase();
    customers
        .into_iter()
        .filter(|customer| customer.full_name().to_lowercase().contains(&needle))
        .collect()
}
