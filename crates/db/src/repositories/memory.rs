use std::collections::HashMap;

use tokio::sync::RwLock;

use tablebook_core::domain::customer::{Customer, CustomerId};
use tablebook_core::domain::reservation::{Reservation, ReservationId};

use super::{filter_by_full_name, CustomerRepository, RepositoryError, ReservationRepository};

/// In-memory stand-in for the sqlite store, implementing both repository
/// traits over the same state so the ranking join sees the reservations.
///
/// Observable contracts match the SQL implementations: (last name, first
/// name) listing order, client-side search, inner-join ranking, silent
/// update-miss. Ranking ties break by ascending customer id, the stable
/// order this store provides.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    customers: HashMap<i64, Customer>,
    reservations: HashMap<i64, Reservation>,
    next_customer_id: i64,
    next_reservation_id: i64,
}

impl StoreState {
    fn customers_ordered(&self) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self.customers.values().cloned().collect();
        customers.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        customers
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.customers_ordered())
    }

    async fn search(&self, term: &str) -> Result<Vec<Customer>, RepositoryError> {
        let customers = self.list().await?;
        Ok(filter_by_full_name(customers, term))
    }

    async fn get(&self, id: CustomerId) -> Result<Customer, RepositoryError> {
        let state = self.state.read().await;
        state.customers.get(&id.0).cloned().ok_or(RepositoryError::NotFound(id))
    }

    async fn best_customers(&self, limit: u32) -> Result<Vec<Customer>, RepositoryError> {
        let state = self.state.read().await;

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for reservation in state.reservations.values() {
            *counts.entry(reservation.customer_id.0).or_default() += 1;
        }

        let mut ranked: Vec<(usize, i64)> =
            counts.into_iter().map(|(customer_id, count)| (count, customer_id)).collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        ranked.truncate(limit as usize);

        Ok(ranked
            .into_iter()
            .filter_map(|(_, customer_id)| state.customers.get(&customer_id).cloned())
            .collect())
    }

    async fn save(&self, customer: &mut Customer) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match customer.id {
            None => {
                state.next_customer_id += 1;
                let id = CustomerId(state.next_customer_id);
                customer.id = Some(id);
                state.customers.insert(id.0, customer.clone());
            }
            Some(id) => {
                // Missing id: zero rows affected, no signal.
                if let Some(existing) = state.customers.get_mut(&id.0) {
                    *existing = customer.clone();
                }
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReservationRepository for InMemoryStore {
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let state = self.state.read().await;
        let mut reservations: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|reservation| reservation.customer_id == customer_id)
            .cloned()
            .collect();
        reservations.sort_by_key(|reservation| reservation.start_at);
        Ok(reservations)
    }

    async fn save(&self, reservation: &mut Reservation) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match reservation.id {
            None => {
                state.next_reservation_id += 1;
                let id = ReservationId(state.next_reservation_id);
                reservation.id = Some(id);
                state.reservations.insert(id.0, reservation.clone());
            }
            Some(id) => {
                if let Some(existing) = state.reservations.get_mut(&id.0) {
                    *existing = reservation.clone();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use tablebook_core::domain::customer::{Customer, CustomerId};
    use tablebook_core::domain::reservation::Reservation;

    use crate::repositories::{
        CustomerRepository, InMemoryStore, RepositoryError, ReservationRepository,
    };

    #[tokio::test]
    async fn in_memory_store_lists_in_last_name_first_name_order() {
        let store = InMemoryStore::default();
        save_new(&store, "Maria", "Chen").await;
        save_new(&store, "Alice", "Zhou").await;
        save_new(&store, "Ben", "Chen").await;

        let names: Vec<String> =
            store.list().await.expect("list").iter().map(Customer::full_name).collect();
        assert_eq!(names, vec!["Ben Chen", "Maria Chen", "Alice Zhou"]);
    }

    #[tokio::test]
    async fn in_memory_store_search_matches_sql_search_semantics() {
        let store = InMemoryStore::default();
        save_new(&store, "Maria", "Chen").await;
        save_new(&store, "Alice", "Zhou").await;

        let matches = store.search("aria ch").await.expect("search");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].full_name(), "Maria Chen");

        // A lone space matches every full name through the joining space.
        let everyone = store.search(" ").await.expect("space term");
        assert_eq!(everyone, store.list().await.expect("list"));

        let all = store.search("").await.expect("empty term");
        assert_eq!(all, store.list().await.expect("list"));
    }

    #[tokio::test]
    async fn in_memory_store_get_miss_is_not_found() {
        let store = InMemoryStore::default();
        let missing = store.get(CustomerId(1)).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(CustomerId(1)))));
    }

    #[tokio::test]
    async fn in_memory_store_ranks_by_count_excluding_zero_reservation_customers() {
        let store = InMemoryStore::default();
        let busy = save_new(&store, "Maria", "Chen").await;
        let occasional = save_new(&store, "Ben", "Adams").await;
        save_new(&store, "Alice", "Zhou").await;

        for day in 1..=3 {
            let start = Utc.with_ymd_and_hms(2026, 5, day, 19, 0, 0).unwrap();
            let mut reservation = Reservation::new(busy, 2, start, None);
            ReservationRepository::save(&store, &mut reservation).await.expect("save");
        }
        let start = Utc.with_ymd_and_hms(2026, 5, 9, 19, 0, 0).unwrap();
        let mut reservation = Reservation::new(occasional, 4, start, None);
        ReservationRepository::save(&store, &mut reservation).await.expect("save");

        let best = store.best_customers(10).await.expect("best");
        let ids: Vec<CustomerId> = best.iter().filter_map(|c| c.id).collect();
        assert_eq!(ids, vec![busy, occasional]);

        let top_one = store.best_customers(1).await.expect("best limited");
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].id, Some(busy));
    }

    #[tokio::test]
    async fn in_memory_store_update_miss_is_silent() {
        let store = InMemoryStore::default();
        let kept = save_new(&store, "Maria", "Chen").await;

        let mut ghost = Customer::new("Nobody", "Nowhere", None, None);
        ghost.id = Some(CustomerId(99));
        CustomerRepository::save(&store, &mut ghost).await.expect("no error on miss");

        assert_eq!(store.list().await.expect("list").len(), 1);
        assert!(store.get(kept).await.is_ok());
    }

    async fn save_new(store: &InMemoryStore, first: &str, last: &str) -> CustomerId {
        let mut customer = Customer::new(first, last, None, None);
        CustomerRepository::save(store, &mut customer).await.expect("save customer");
        customer.id.expect("adopted id")
    }
}
