use chrono::{Duration, TimeZone, Utc};

use tablebook_core::domain::customer::Customer;
use tablebook_core::domain::reservation::Reservation;

use crate::repositories::{
    CustomerRepository, RepositoryError, ReservationRepository, SqlCustomerRepository,
    SqlReservationRepository,
};
use crate::DbPool;

/// Deterministic demo dataset: (first, last, phone, notes, reservation count).
const SEED_CUSTOMERS: &[(&str, &str, Option<&str>, Option<&str>, u32)] = &[
    ("Maria", "Chen", Some("555-0101"), Some("prefers the window table"), 3),
    ("Omar", "Haddad", None, Some("vegetarian tasting menu"), 2),
    ("Ben", "Adams", Some("555-0177"), None, 1),
    ("Alice", "Zhou", None, None, 0),
];

pub struct SeedSummary {
    pub customers: usize,
    pub reservations: usize,
}

/// Seed the sample customers and their reservations through the repositories,
/// so the seed path exercises the same save policy production code uses.
pub async fn seed_sample_data(pool: &DbPool) -> Result<SeedSummary, RepositoryError> {
    let customers = SqlCustomerRepository::new(pool.clone());
    let reservations = SqlReservationRepository::new(pool.clone());

    let base = Utc
        .with_ymd_and_hms(2026, 6, 1, 19, 0, 0)
        .single()
        .ok_or_else(|| RepositoryError::Decode("invalid seed base timestamp".into()))?;

    let mut seeded_reservations = 0usize;
    for (first, last, phone, notes, reservation_count) in SEED_CUSTOMERS {
        let mut customer = Customer::new(
            *first,
            *last,
            phone.map(str::to_string),
            notes.map(str::to_string),
        );
        customers.save(&mut customer).await?;
        let customer_id = customer
            .id
            .ok_or_else(|| RepositoryError::Decode("seeded customer did not adopt an id".into()))?;

        for slot in 0..*reservation_count {
            let start = base + Duration::days(i64::from(slot));
            let mut reservation = Reservation::new(customer_id, 2 + slot as i32, start, None);
            reservations.save(&mut reservation).await?;
            seeded_reservations += 1;
        }
    }

    Ok(SeedSummary { customers: SEED_CUSTOMERS.len(), reservations: seeded_reservations })
}
