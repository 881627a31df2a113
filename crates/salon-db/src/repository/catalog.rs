//! # Catalog Repository
//!
//! Database operations for the service/product catalog.
//!
//! `find_by_code` is the lookup capability the register uses for
//! SKU/barcode style entry; name search backs the catalog browser.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use salon_core::{CatalogItem, ItemKind};

/// Row shape for `catalog_items`.
///
/// SQLite integers come back as i64; conversion into the core type
/// narrows and parses the kind discriminator.
#[derive(Debug, sqlx::FromRow)]
struct CatalogItemRow {
    id: String,
    kind: String,
    code: Option<String>,
    name: String,
    category: String,
    price_paise: i64,
    commission_rate_bps: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CatalogItemRow {
    fn into_item(self) -> DbResult<CatalogItem> {
        let kind = match self.kind.as_str() {
            "service" => ItemKind::Service,
            "product" => ItemKind::Product,
            other => {
                return Err(DbError::CorruptDocument(format!(
                    "unknown catalog kind '{}'",
                    other
                )))
            }
        };

        Ok(CatalogItem {
            id: self.id,
            kind,
            code: self.code,
            name: self.name,
            category: self.category,
            price_paise: self.price_paise,
            commission_rate_bps: self.commission_rate_bps as u32,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn kind_str(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Service => "service",
        ItemKind::Product => "product",
    }
}

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Gets a catalog item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogItem>> {
        let row: Option<CatalogItemRow> = sqlx::query_as(
            r#"
            SELECT id, kind, code, name, category, price_paise,
                   commission_rate_bps, is_active, created_at, updated_at
            FROM catalog_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CatalogItemRow::into_item).transpose()
    }

    /// Looks up an active item by its short code (SKU/barcode entry).
    pub async fn find_by_code(&self, code: &str) -> DbResult<Option<CatalogItem>> {
        debug!(code = %code, "Catalog code lookup");

        let row: Option<CatalogItemRow> = sqlx::query_as(
            r#"
            SELECT id, kind, code, name, category, price_paise,
                   commission_rate_bps, is_active, created_at, updated_at
            FROM catalog_items
            WHERE code = ?1 AND is_active = 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CatalogItemRow::into_item).transpose()
    }

    /// Searches active items by name or category prefix.
    pub async fn search(&self, query: &str, limit: i64) -> DbResult<Vec<CatalogItem>> {
        let pattern = format!("%{}%", query);

        let rows: Vec<CatalogItemRow> = sqlx::query_as(
            r#"
            SELECT id, kind, code, name, category, price_paise,
                   commission_rate_bps, is_active, created_at, updated_at
            FROM catalog_items
            WHERE is_active = 1 AND (name LIKE ?1 OR category LIKE ?1)
            ORDER BY name
            LIMIT ?2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CatalogItemRow::into_item).collect()
    }

    /// Lists all active items.
    pub async fn list_active(&self) -> DbResult<Vec<CatalogItem>> {
        let rows: Vec<CatalogItemRow> = sqlx::query_as(
            r#"
            SELECT id, kind, code, name, category, price_paise,
                   commission_rate_bps, is_active, created_at, updated_at
            FROM catalog_items
            WHERE is_active = 1
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CatalogItemRow::into_item).collect()
    }

    /// Counts all catalog items (active and inactive).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts a catalog item.
    pub async fn insert(&self, item: &CatalogItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting catalog item");

        sqlx::query(
            r#"
            INSERT INTO catalog_items (
                id, kind, code, name, category, price_paise,
                commission_rate_bps, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&item.id)
        .bind(kind_str(item.kind))
        .bind(&item.code)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price_paise)
        .bind(item.commission_rate_bps as i64)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
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
    use uuid::Uuid;

    fn test_item(name: &str, code: Option<&str>, price_paise: i64) -> CatalogItem {
        let now = Utc::now();
        CatalogItem {
            id: Uuid::new_v4().to_string(),
            kind: ItemKind::Service,
            code: code.map(|c| c.to_string()),
            name: name.to_string(),
            category: "Hair".to_string(),
            price_paise,
            commission_rate_bps: 1000,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let item = test_item("Haircut", Some("HC-01"), 60000);

        db.catalog().insert(&item).await.unwrap();

        let found = db.catalog().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Haircut");
        assert_eq!(found.price_paise, 60000);
        assert_eq!(found.kind, ItemKind::Service);
    }

    #[tokio::test]
    async fn test_find_by_code() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog()
            .insert(&test_item("Haircut", Some("HC-01"), 60000))
            .await
            .unwrap();

        let found = db.catalog().find_by_code("HC-01").await.unwrap();
        assert!(found.is_some());

        let missing = db.catalog().find_by_code("NOPE").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog()
            .insert(&test_item("Haircut", None, 60000))
            .await
            .unwrap();
        db.catalog()
            .insert(&test_item("Hair Spa", None, 120000))
            .await
            .unwrap();
        db.catalog()
            .insert(&test_item("Pedicure", None, 80000))
            .await
            .unwrap();

        let hits = db.catalog().search("Hair", 20).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog()
            .insert(&test_item("Haircut", Some("HC-01"), 60000))
            .await
            .unwrap();

        let err = db
            .catalog()
            .insert(&test_item("Other", Some("HC-01"), 10000))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
