//! PostgreSQL implementation of MembershipRepository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Money, Timestamp};
use crate::domain::membership::{Membership, PlanTier};
use crate::ports::MembershipRepository;

/// PostgreSQL implementation of the MembershipRepository port.
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a membership plan.
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    tier: String,
    name: String,
    description: String,
    price_cents: i64,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = DomainError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Membership {
            tier: parse_tier(&row.tier)?,
            name: row.name,
            description: row.description,
            price: Money::from_cents(row.price_cents).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid price: {}", e))
            })?,
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_tier(s: &str) -> Result<PlanTier, DomainError> {
    PlanTier::from_str(s).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid tier value: {}", s),
        )
    })
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn find_by_tier(&self, tier: PlanTier) -> Result<Option<Membership>, DomainError> {
        let row: Option<MembershipRow> = sqlx::query_as(
            r#"
            SELECT tier, name, description, price_cents, updated_at
            FROM memberships
            WHERE tier = $1
            "#,
        )
        .bind(tier.display_name())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find plan: {}", e))
        })?;

        row.map(Membership::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Membership>, DomainError> {
        let rows: Vec<MembershipRow> = sqlx::query_as(
            r#"
            SELECT tier, name, description, price_cents, updated_at
            FROM memberships
            ORDER BY price_cents ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list plans: {}", e))
        })?;

        rows.into_iter().map(Membership::try_from).collect()
    }

    async fn update(&self, plan: &Membership) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE memberships SET
                name = $2,
                description = $3,
                price_cents = $4,
                updated_at = $5
            WHERE tier = $1
            "#,
        )
        .bind(plan.tier.display_name())
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price.cents())
        .bind(plan.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update plan: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MembershipNotFound,
                format!("No plan for tier {}", plan.tier),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tier_accepts_the_known_set() {
        assert_eq!(parse_tier("essential").unwrap(), PlanTier::Essential);
        assert_eq!(parse_tier("premium").unwrap(), PlanTier::Premium);
        assert_eq!(parse_tier("elite").unwrap(), PlanTier::Elite);
    }

    #[test]
    fn parse_tier_rejects_unknown_values() {
        assert!(parse_tier("gold").is_err());
        assert!(parse_tier("").is_err());
    }

    #[test]
    fn row_conversion_rejects_negative_price() {
        let row = MembershipRow {
            tier: "premium".to_string(),
            name: "premium".to_string(),
            description: String::new(),
            price_cents: -100,
            updated_at: Utc::now(),
        };
        assert!(Membership::try_from(row).is_err());
    }
}
