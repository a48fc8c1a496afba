//! Repository for the `offers` table.

use sqlx::PgPool;
use bob_core::types::DbId;

use crate::models::offer::Offer;

const COLUMNS: &str = "id, project_id, kind, value, position, created_at";

/// Keeps the most recent batch of offered values per project and kind.
pub struct OfferRepo;

impl OfferRepo {
    /// Replace the current batch of `kind` offers with `values`, in order.
    pub async fn replace_batch(
        pool: &PgPool,
        project_id: DbId,
        kind: &str,
        values: &[String],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM offers WHERE project_id = $1 AND kind = $2")
            .bind(project_id)
            .bind(kind)
            .execute(&mut *tx)
            .await?;

        for (position, value) in values.iter().enumerate() {
            sqlx::query(
                "INSERT INTO offers (project_id, kind, value, position) VALUES ($1, $2, $3, $4)",
            )
            .bind(project_id)
            .bind(kind)
            .bind(value)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    /// The current batch of `kind` offers, in offered order.
    pub async fn list(
        pool: &PgPool,
        project_id: DbId,
        kind: &str,
    ) -> Result<Vec<Offer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offers
             WHERE project_id = $1 AND kind = $2
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(project_id)
            .bind(kind)
            .fetch_all(pool)
            .await
    }
}
