//! # Invoice Repository
//!
//! Persistence for finalized invoices.
//!
//! ## Storage Model
//! Each invoice is one immutable JSON document keyed by its invoice
//! number, plus a few denormalized columns (client, total, timestamp) for
//! listing without decoding documents. There is no UPDATE path: invoices
//! are INSERT-only.
//!
//! ## Invoice Numbering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  next_invoice_number("2026-08-06")                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO invoice_counters (day, next_seq) VALUES (?, 2)            │
//! │  ON CONFLICT(day) DO UPDATE SET next_seq = next_seq + 1                │
//! │  RETURNING next_seq - 1                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "INV-20260806-0001", -0002, -0003, ...                                │
//! │                                                                         │
//! │  One atomic statement per allocation: rapid sequential checkouts       │
//! │  can never collide (unlike a timestamp-suffix scheme).                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use salon_core::Invoice;

/// Summary row for invoice listings (document not decoded).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceSummary {
    pub invoice_number: String,
    pub client_id: String,
    pub grand_total_paise: i64,
    pub created_at: DateTime<Utc>,
}

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Allocates the next invoice number for the given moment:
    /// `INV-YYYYMMDD-NNNN` with a strictly increasing per-day sequence.
    pub async fn next_invoice_number(&self, now: DateTime<Utc>) -> DbResult<String> {
        let day = now.format("%Y-%m-%d").to_string();

        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_counters (day, next_seq) VALUES (?1, 2)
            ON CONFLICT(day) DO UPDATE SET next_seq = next_seq + 1
            RETURNING next_seq - 1
            "#,
        )
        .bind(&day)
        .fetch_one(&self.pool)
        .await?;

        Ok(format!("INV-{}-{:04}", now.format("%Y%m%d"), seq))
    }

    /// Persists an invoice as a single JSON document. INSERT-only; a
    /// duplicate invoice number is a hard error (the counter should make
    /// this impossible).
    pub async fn insert(&self, invoice: &Invoice) -> DbResult<()> {
        debug!(invoice_number = %invoice.invoice_number, "Persisting invoice");

        let document = serde_json::to_string(invoice)
            .map_err(|e| DbError::Internal(format!("invoice encode failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_number, client_id, grand_total_paise, created_at, document
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&invoice.invoice_number)
        .bind(&invoice.client.id)
        .bind(invoice.totals.grand_total.paise())
        .bind(invoice.created_at)
        .bind(document)
        .execute(&self.pool)
        .await?;

        info!(
            invoice_number = %invoice.invoice_number,
            grand_total = %invoice.totals.grand_total,
            "Invoice persisted"
        );

        Ok(())
    }

    /// Loads an invoice document by its number.
    pub async fn get_by_number(&self, invoice_number: &str) -> DbResult<Option<Invoice>> {
        let document: Option<String> = sqlx::query_scalar(
            r#"
            SELECT document FROM invoices WHERE invoice_number = ?1
            "#,
        )
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?;

        document
            .map(|doc| {
                serde_json::from_str(&doc).map_err(|e| DbError::CorruptDocument(e.to_string()))
            })
            .transpose()
    }

    /// Lists the most recent invoices (summaries only).
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<InvoiceSummary>> {
        let rows: Vec<InvoiceSummary> = sqlx::query_as(
            r#"
            SELECT invoice_number, client_id, grand_total_paise, created_at
            FROM invoices
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use salon_core::billing::{compute_totals, DiscountSelection, RedemptionSelection};
    use salon_core::cart::Cart;
    use salon_core::checkout::assemble_invoice;
    use salon_core::payment::PaymentSplit;
    use salon_core::types::{CatalogItem, Client, ItemKind, TaxRate};

    fn test_invoice(number: &str) -> Invoice {
        let item = CatalogItem {
            id: "i1".to_string(),
            kind: ItemKind::Service,
            code: None,
            name: "Haircut".to_string(),
            category: "Hair".to_string(),
            price_paise: 60000,
            commission_rate_bps: 0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let client = Client {
            id: "c1".to_string(),
            name: "Meera".to_string(),
            phone: "9876500000".to_string(),
            loyalty_points_paise: 0,
            wallet_balance_paise: 0,
            packages: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut cart = Cart::new();
        cart.add_item(&item).unwrap();
        let totals = compute_totals(
            &cart,
            &DiscountSelection::default(),
            &RedemptionSelection::default(),
            TaxRate::from_bps(1800),
        );
        let mut payments = PaymentSplit::new();
        payments.sync_to_total(totals.grand_total);

        assemble_invoice(
            number.to_string(),
            Utc::now(),
            &client,
            &cart,
            &totals,
            &payments,
            &DiscountSelection::default(),
            &RedemptionSelection::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_number_allocation_is_sequential_and_unique() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let mut numbers = Vec::new();
        for _ in 0..5 {
            numbers.push(db.invoices().next_invoice_number(now).await.unwrap());
        }

        let expected_prefix = format!("INV-{}-", now.format("%Y%m%d"));
        for (i, n) in numbers.iter().enumerate() {
            assert!(n.starts_with(&expected_prefix));
            assert!(n.ends_with(&format!("{:04}", i + 1)));
        }

        let mut deduped = numbers.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), numbers.len());
    }

    #[tokio::test]
    async fn test_counter_resets_per_day() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let today = Utc::now();
        let tomorrow = today + chrono::Duration::days(1);

        let a = db.invoices().next_invoice_number(today).await.unwrap();
        let b = db.invoices().next_invoice_number(tomorrow).await.unwrap();

        assert!(a.ends_with("0001"));
        assert!(b.ends_with("0001"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let invoice = test_invoice("INV-20260806-0001");

        db.invoices().insert(&invoice).await.unwrap();

        let back = db
            .invoices()
            .get_by_number("INV-20260806-0001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(back.invoice_number, invoice.invoice_number);
        assert_eq!(back.totals, invoice.totals);
        assert_eq!(back.lines.len(), 1);
        assert_eq!(back.loyalty_earned_points, 7);
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let invoice = test_invoice("INV-20260806-0001");

        db.invoices().insert(&invoice).await.unwrap();
        let err = db.invoices().insert(&invoice).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_recent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.invoices()
            .insert(&test_invoice("INV-20260806-0001"))
            .await
            .unwrap();
        db.invoices()
            .insert(&test_invoice("INV-20260806-0002"))
            .await
            .unwrap();

        let recent = db.invoices().list_recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].grand_total_paise, 70800);
    }
}
