use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use tablebook_core::domain::customer::CustomerId;
use tablebook_core::domain::reservation::{Reservation, ReservationId};

use super::{RepositoryError, ReservationRepository};
use crate::DbPool;

pub struct SqlReservationRepository {
    pool: DbPool,
}

impl SqlReservationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReservationRepository for SqlReservationRepository {
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT
                id,
                customer_id,
                num_guests,
                start_at,
                notes
             FROM reservations
             WHERE customer_id = ?
             ORDER BY start_at",
        )
        .bind(customer_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(reservation_from_row).collect()
    }

    async fn save(&self, reservation: &mut Reservation) -> Result<(), RepositoryError> {
        match reservation.id {
            None => {
                let row = sqlx::query(
                    "INSERT INTO reservations (customer_id, num_guests, start_at, notes)
                     VALUES (?, ?, ?, ?)
                     RETURNING id",
                )
                .bind(reservation.customer_id.0)
                .bind(reservation.num_guests)
                .bind(reservation.start_at.to_rfc3339())
                .bind(reservation.notes.as_deref())
                .fetch_one(&self.pool)
                .await?;

                let id = ReservationId(row.try_get("id")?);
                reservation.id = Some(id);
                tracing::debug!(reservation_id = id.0, "inserted reservation");
            }
            Some(id) => {
                sqlx::query(
                    "UPDATE reservations
                     SET customer_id = ?,
                         num_guests = ?,
                         start_at = ?,
                         notes = ?
                     WHERE id = ?",
                )
                .bind(reservation.customer_id.0)
                .bind(reservation.num_guests)
                .bind(reservation.start_at.to_rfc3339())
                .bind(reservation.notes.as_deref())
                .bind(id.0)
                .execute(&self.pool)
                .await?;

                tracing::debug!(reservation_id = id.0, "updated reservation");
            }
        }

        Ok(())
    }
}

fn reservation_from_row(row: SqliteRow) -> Result<Reservation, RepositoryError> {
    Ok(Reservation {
        id: Some(ReservationId(row.try_get("id")?)),
        customer_id: CustomerId(row.try_get("customer_id")?),
        num_guests: row.try_get("num_guests")?,
        start_at: parse_timestamp("start_at", row.try_get("start_at")?)?,
        notes: row.try_get("notes")?,
    })
}

fn parse_timestamp(column: &str, value: String) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(&value).map(|timestamp| timestamp.with_timezone(&Utc)).map_err(
        |error| {
            RepositoryError::Decode(format!("invalid timestamp in `{column}`: `{value}` ({error})"))
        },
    )
}
