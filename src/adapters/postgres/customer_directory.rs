//! PostgreSQL implementation of CustomerDirectory.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode};
use crate::ports::CustomerDirectory;

/// PostgreSQL implementation of the CustomerDirectory port.
///
/// Customer identity is owned elsewhere; this adapter only checks for the
/// row's existence.
pub struct PostgresCustomerDirectory {
    pool: PgPool,
}

impl PostgresCustomerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerDirectory for PostgresCustomerDirectory {
    async fn exists(&self, customer_id: &CustomerId) -> Result<bool, DomainError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(customer_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to check customer existence: {}", e),
                    )
                })?;
        Ok(exists)
    }
}
