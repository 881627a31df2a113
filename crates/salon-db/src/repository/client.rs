//! # Client Repository
//!
//! Database operations for the client directory: lookup for the register,
//! and balance settlement when an invoice is finalized.
//!
//! ## Settlement at Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice finalized                                                      │
//! │     │                                                                   │
//! │     ├── settle_after_checkout()                                        │
//! │     │     loyalty  -= points_redeemed   (floor at 0 via CHECK)          │
//! │     │     wallet   -= wallet_redeemed                                   │
//! │     │     loyalty  += loyalty_earned                                    │
//! │     │                                                                   │
//! │     └── consume_package_session()  × one per package-redeemed line      │
//! │           sessions_left -= 1                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use salon_core::{Client, ClientPackage, Money};

/// Row shape for `clients`.
#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: String,
    name: String,
    phone: String,
    loyalty_points_paise: i64,
    wallet_balance_paise: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row shape for `client_packages`.
#[derive(Debug, sqlx::FromRow)]
struct PackageRow {
    name: String,
    sessions_left: i64,
}

impl ClientRow {
    fn into_client(self, packages: Vec<PackageRow>) -> Client {
        Client {
            id: self.id,
            name: self.name,
            phone: self.phone,
            loyalty_points_paise: self.loyalty_points_paise,
            wallet_balance_paise: self.wallet_balance_paise,
            packages: packages
                .into_iter()
                .map(|p| ClientPackage {
                    name: p.name,
                    sessions_left: p.sessions_left,
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Gets a client (with packages) by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as(
            r#"
            SELECT id, name, phone, loyalty_points_paise, wallet_balance_paise,
                   created_at, updated_at
            FROM clients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let packages: Vec<PackageRow> = sqlx::query_as(
            r#"
            SELECT name, sessions_left
            FROM client_packages
            WHERE client_id = ?1
            ORDER BY name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_client(packages)))
    }

    /// Searches clients by name or phone (packages not loaded; use
    /// `get_by_id` when selecting a client onto the register).
    pub async fn search(&self, query: &str, limit: i64) -> DbResult<Vec<Client>> {
        let pattern = format!("%{}%", query);

        let rows: Vec<ClientRow> = sqlx::query_as(
            r#"
            SELECT id, name, phone, loyalty_points_paise, wallet_balance_paise,
                   created_at, updated_at
            FROM clients
            WHERE name LIKE ?1 OR phone LIKE ?1
            ORDER BY name
            LIMIT ?2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_client(vec![])).collect())
    }

    /// Inserts a client and their packages.
    pub async fn insert(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, name = %client.name, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, phone, loyalty_points_paise, wallet_balance_paise,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.phone)
        .bind(client.loyalty_points_paise)
        .bind(client.wallet_balance_paise)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        for package in &client.packages {
            sqlx::query(
                r#"
                INSERT INTO client_packages (id, client_id, name, sessions_left)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&client.id)
            .bind(&package.name)
            .bind(package.sessions_left)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Settles the client's balances after a successful checkout:
    /// debits redeemed points and wallet, credits earned points.
    ///
    /// One UPDATE, so a crash between debit and credit cannot happen.
    /// The schema CHECK constraints reject a debit below zero, which
    /// would indicate a register bug upstream.
    pub async fn settle_after_checkout(
        &self,
        client_id: &str,
        points_redeemed: Money,
        wallet_redeemed: Money,
        loyalty_earned_points: i64,
    ) -> DbResult<()> {
        let now = Utc::now();
        let earned_paise = loyalty_earned_points * 100;

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                loyalty_points_paise = loyalty_points_paise - ?2 + ?3,
                wallet_balance_paise = wallet_balance_paise - ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(client_id)
        .bind(points_redeemed.paise())
        .bind(earned_paise)
        .bind(wallet_redeemed.paise())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", client_id));
        }

        info!(
            client_id = %client_id,
            points_redeemed = %points_redeemed,
            wallet_redeemed = %wallet_redeemed,
            loyalty_earned_points,
            "Client balances settled"
        );

        Ok(())
    }

    /// Consumes one session from the client's package matching the given
    /// service name. Called once per package-redeemed session on the
    /// invoice.
    pub async fn consume_package_session(
        &self,
        client_id: &str,
        package_name: &str,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE client_packages SET
                sessions_left = sessions_left - 1
            WHERE id = (
                SELECT id FROM client_packages
                WHERE client_id = ?1 AND name = ?2 AND sessions_left > 0
                LIMIT 1
            )
            "#,
        )
        .bind(client_id)
        .bind(package_name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Package with sessions left",
                format!("{}/{}", client_id, package_name),
            ));
        }

        debug!(client_id = %client_id, package = %package_name, "Package session consumed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
