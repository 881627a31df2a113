//! # Inbox Repository
//!
//! Pending orders originated outside the register (the companion booking
//! app). Orders sit in `pending_orders` until the register explicitly
//! pulls one with [`InboxRepository::take_next_for`]: an explicit claim,
//! not ambient storage polling. A claimed order is stamped and never
//! handed out again.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// An externally-originated order waiting to be billed.
#[derive(Debug, Clone)]
pub struct PendingOrder {
    pub id: String,
    pub client_id: Option<String>,
    /// Catalog item ids to add to the bill, in order.
    pub item_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct PendingOrderRow {
    id: String,
    client_id: Option<String>,
    item_ids: String,
    created_at: DateTime<Utc>,
}

impl PendingOrderRow {
    fn into_order(self) -> DbResult<PendingOrder> {
        let item_ids: Vec<String> = serde_json::from_str(&self.item_ids)
            .map_err(|e| DbError::CorruptDocument(e.to_string()))?;
        Ok(PendingOrder {
            id: self.id,
            client_id: self.client_id,
            item_ids,
            created_at: self.created_at,
        })
    }
}

/// Repository for the pending-order inbox.
#[derive(Debug, Clone)]
pub struct InboxRepository {
    pool: SqlitePool,
}

impl InboxRepository {
    /// Creates a new InboxRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InboxRepository { pool }
    }

    /// Queues an order from the companion app.
    pub async fn queue(&self, client_id: Option<&str>, item_ids: &[String]) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let payload = serde_json::to_string(item_ids)
            .map_err(|e| DbError::Internal(format!("order encode failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO pending_orders (id, client_id, item_ids, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&id)
        .bind(client_id)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(order_id = %id, items = item_ids.len(), "Pending order queued");
        Ok(id)
    }

    /// Claims the oldest unclaimed order, optionally restricted to one
    /// client. Returns `None` when the inbox is empty.
    ///
    /// The claim stamp and the read are a single statement, so the same
    /// order can never be pulled onto two bills.
    pub async fn take_next_for(&self, client_id: Option<&str>) -> DbResult<Option<PendingOrder>> {
        let row: Option<PendingOrderRow> = sqlx::query_as(
            r#"
            UPDATE pending_orders SET claimed_at = ?1
            WHERE id = (
                SELECT id FROM pending_orders
                WHERE claimed_at IS NULL
                  AND (?2 IS NULL OR client_id = ?2)
                ORDER BY created_at
                LIMIT 1
            )
            RETURNING id, client_id, item_ids, created_at
            "#,
        )
        .bind(Utc::now())
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                debug!(order_id = %row.id, "Pending order claimed");
                Ok(Some(row.into_order()?))
            }
            None => Ok(None),
        }
    }

    /// Counts unclaimed orders (for the inbox badge).
    pub async fn unclaimed_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM pending_orders WHERE claimed_at IS NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_queue_and_take() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let items = vec!["item-1".to_string(), "item-2".to_string()];

        db.inbox().queue(Some("c1"), &items).await.unwrap();
        assert_eq!(db.inbox().unclaimed_count().await.unwrap(), 1);

        let order = db.inbox().take_next_for(Some("c1")).await.unwrap().unwrap();
        assert_eq!(order.item_ids, items);
        assert_eq!(order.client_id.as_deref(), Some("c1"));

        // Claimed orders are never handed out twice.
        assert!(db.inbox().take_next_for(Some("c1")).await.unwrap().is_none());
        assert_eq!(db.inbox().unclaimed_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_take_is_fifo() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let first = db.inbox().queue(None, &["a".to_string()]).await.unwrap();
        let _second = db.inbox().queue(None, &["b".to_string()]).await.unwrap();

        let taken = db.inbox().take_next_for(None).await.unwrap().unwrap();
        assert_eq!(taken.id, first);
    }

    #[tokio::test]
    async fn test_client_filter() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.inbox().queue(Some("c1"), &["a".to_string()]).await.unwrap();

        assert!(db.inbox().take_next_for(Some("c2")).await.unwrap().is_none());
        assert!(db.inbox().take_next_for(Some("c1")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_inbox() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.inbox().take_next_for(None).await.unwrap().is_none());
    }
}
