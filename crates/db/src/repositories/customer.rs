use sqlx::{sqlite::SqliteRow, Row};

use tablebook_core::domain::customer::{Customer, CustomerId};

use super::{filter_by_full_name, CustomerRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT
                id,
                first_name,
                last_name,
                phone,
                notes
             FROM customers
             ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(customer_from_row).collect()
    }

    async fn search(&self, term: &str) -> Result<Vec<Customer>, RepositoryError> {
        // Same fetch as list(), filtered in-process. Keeps result ordering
        // identical to list() restricted to matches.
        let customers = self.list().await?;
        Ok(filter_by_full_name(customers, term))
    }

    async fn get(&self, id: CustomerId) -> Result<Customer, RepositoryError> {
        let row = sqlx::query(
            "SELECT
                id,
                first_name,
                last_name,
                phone,
                notes
             FROM customers
             WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => customer_from_row(row),
            None => Err(RepositoryError::NotFound(id)),
        }
    }

    async fn best_customers(&self, limit: u32) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT
                c.id,
                c.first_name,
                c.last_name,
                c.phone,
                c.notes,
                COUNT(r.customer_id) AS reservation_count
             FROM customers AS c
             JOIN reservations AS r ON c.id = r.customer_id
             GROUP BY c.id, c.first_name, c.last_name, c.phone, c.notes
             ORDER BY reservation_count DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(customer_from_row).collect()
    }

    async fn save(&self, customer: &mut Customer) -> Result<(), RepositoryError> {
        match customer.id {
            None => {
                let row = sqlx::query(
                    "INSERT INTO customers (first_name, last_name, phone, notes)
                     VALUES (?, ?, ?, ?)
                     RETURNING id",
                )
                .bind(&customer.first_name)
                .bind(&customer.last_name)
                .bind(customer.phone.as_deref())
                .bind(customer.notes.as_deref())
                .fetch_one(&self.pool)
                .await?;

                let id = CustomerId(row.try_get("id")?);
                customer.id = Some(id);
                tracing::debug!(customer_id = id.0, "inserted customer");
            }
            Some(id) => {
                // No rows-affected check: updating a missing id is a silent
                // no-op, last writer wins.
                sqlx::query(
                    "UPDATE customers
                     SET first_name = ?,
                         last_name = ?,
                         phone = ?,
                         notes = ?
                     WHERE id = ?",
                )
                .bind(&customer.first_name)
                .bind(&customer.last_name)
                .bind(customer.phone.as_deref())
                .bind(customer.notes.as_deref())
                .bind(id.0)
                .execute(&self.pool)
                .await?;

                tracing::debug!(customer_id = id.0, "updated customer");
            }
        }

        Ok(())
    }
}

fn customer_from_row(row: SqliteRow) -> Result<Customer, RepositoryError> {
    Ok(Customer {
        id: Some(CustomerId(row.try_get("id")?)),
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        phone: row.try_get("phone")?,
        notes: row.try_get("notes")?,
    })
}
