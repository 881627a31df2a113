//! # Voucher & Promotion Repository
//!
//! Lookup for the two catalog-driven discount sources. A voucher miss is
//! returned as `None`; the command layer surfaces it as
//! `InvalidVoucherCode` without touching the bill's discount state.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use salon_core::{Discount, Money, Promotion, Voucher};

/// Row shape shared by `promotions` and `vouchers`:
/// `discount_value` is paise for 'fixed' and basis points for 'percentage'.
fn decode_discount(discount_type: &str, discount_value: i64) -> DbResult<Discount> {
    match discount_type {
        "fixed" => Ok(Discount::Fixed(Money::from_paise(discount_value))),
        "percentage" => Ok(Discount::Percentage(discount_value as u32)),
        other => Err(DbError::CorruptDocument(format!(
            "unknown discount type '{}'",
            other
        ))),
    }
}

fn encode_discount(discount: &Discount) -> (&'static str, i64) {
    match discount {
        Discount::Fixed(amount) => ("fixed", amount.paise()),
        Discount::Percentage(bps) => ("percentage", *bps as i64),
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PromotionRow {
    id: String,
    name: String,
    discount_type: String,
    discount_value: i64,
    is_active: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct VoucherRow {
    code: String,
    discount_type: String,
    discount_value: i64,
    is_active: bool,
}

/// Repository for voucher and promotion lookups.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    pool: SqlitePool,
}

impl VoucherRepository {
    /// Creates a new VoucherRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VoucherRepository { pool }
    }

    /// Looks up an active voucher by code. `None` on a miss.
    pub async fn find_voucher(&self, code: &str) -> DbResult<Option<Voucher>> {
        debug!(code = %code, "Voucher lookup");

        let row: Option<VoucherRow> = sqlx::query_as(
            r#"
            SELECT code, discount_type, discount_value, is_active
            FROM vouchers
            WHERE code = ?1 AND is_active = 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(Voucher {
                code: r.code,
                discount: decode_discount(&r.discount_type, r.discount_value)?,
                is_active: r.is_active,
            })
        })
        .transpose()
    }

    /// Lists all active promotions for the billing screen.
    pub async fn list_promotions(&self) -> DbResult<Vec<Promotion>> {
        let rows: Vec<PromotionRow> = sqlx::query_as(
            r#"
            SELECT id, name, discount_type, discount_value, is_active
            FROM promotions
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(Promotion {
                    id: r.id,
                    name: r.name,
                    discount: decode_discount(&r.discount_type, r.discount_value)?,
                    is_active: r.is_active,
                })
            })
            .collect()
    }

    /// Gets a promotion by ID.
    pub async fn get_promotion(&self, id: &str) -> DbResult<Option<Promotion>> {
        let row: Option<PromotionRow> = sqlx::query_as(
            r#"
            SELECT id, name, discount_type, discount_value, is_active
            FROM promotions
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(Promotion {
                id: r.id,
                name: r.name,
                discount: decode_discount(&r.discount_type, r.discount_value)?,
                is_active: r.is_active,
            })
        })
        .transpose()
    }

    /// Inserts a voucher.
    pub async fn insert_voucher(&self, voucher: &Voucher) -> DbResult<()> {
        let (discount_type, discount_value) = encode_discount(&voucher.discount);

        sqlx::query(
            r#"
            INSERT INTO vouchers (code, discount_type, discount_value, is_active)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&voucher.code)
        .bind(discount_type)
        .bind(discount_value)
        .bind(voucher.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a promotion.
    pub async fn insert_promotion(&self, promotion: &Promotion) -> DbResult<()> {
        let (discount_type, discount_value) = encode_discount(&promotion.discount);

        sqlx::query(
            r#"
            INSERT INTO promotions (id, name, discount_type, discount_value, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&promotion.id)
        .bind(&promotion.name)
        .bind(discount_type)
        .bind(discount_value)
        .bind(promotion.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
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
    async fn test_voucher_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.vouchers()
            .insert_voucher(&Voucher {
                code: "WELCOME50".to_string(),
                discount: Discount::Fixed(Money::from_rupees(50)),
                is_active: true,
            })
            .await
            .unwrap();

        let found = db.vouchers().find_voucher("WELCOME50").await.unwrap().unwrap();
        assert_eq!(found.discount, Discount::Fixed(Money::from_rupees(50)));
    }

    #[tokio::test]
    async fn test_voucher_miss_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let missing = db.vouchers().find_voucher("NOPE").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_inactive_voucher_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.vouchers()
            .insert_voucher(&Voucher {
                code: "EXPIRED".to_string(),
                discount: Discount::Percentage(1000),
                is_active: false,
            })
            .await
            .unwrap();

        assert!(db.vouchers().find_voucher("EXPIRED").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_promotions() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.vouchers()
            .insert_promotion(&Promotion {
                id: "p1".to_string(),
                name: "Festive 10".to_string(),
                discount: Discount::Percentage(1000),
                is_active: true,
            })
            .await
            .unwrap();
        db.vouchers()
            .insert_promotion(&Promotion {
                id: "p2".to_string(),
                name: "Old".to_string(),
                discount: Discount::Fixed(Money::from_rupees(100)),
                is_active: false,
            })
            .await
            .unwrap();

        let promos = db.vouchers().list_promotions().await.unwrap();
        assert_eq!(promos.len(), 1);
        assert_eq!(promos[0].name, "Festive 10");
    }
}
