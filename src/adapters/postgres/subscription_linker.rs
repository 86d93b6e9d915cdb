//! PostgreSQL implementation of SubscriptionLinker.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, SubscriptionId};
use crate::domain::membership::CustomerSubscriptionLink;
use crate::ports::SubscriptionLinker;

/// PostgreSQL implementation of the SubscriptionLinker port.
pub struct PostgresSubscriptionLinker {
    pool: PgPool,
}

impl PostgresSubscriptionLinker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionLinker for PostgresSubscriptionLinker {
    async fn create(&self, link: &CustomerSubscriptionLink) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO customer_subscription_links (id, customer_id, subscription_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(link.id.as_uuid())
        .bind(link.customer_id.as_uuid())
        .bind(link.subscription_id.as_uuid())
        .bind(link.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to create link: {}", e))
        })?;
        Ok(())
    }

    async fn dismiss(&self, link: &CustomerSubscriptionLink) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM customer_subscription_links WHERE id = $1")
            .bind(link.id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to dismiss link: {}", e),
                )
            })?;
        Ok(())
    }

    async fn subscription_ids_for(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<SubscriptionId>, DomainError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT subscription_id
            FROM customer_subscription_links
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list links: {}", e))
        })?;

        Ok(rows
            .into_iter()
            .map(|(id,)| SubscriptionId::from_uuid(id))
            .collect())
    }
}
