//! # Repository Module
//!
//! Database repository implementations for Salon POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tauri Command                                                         │
//! │       │                                                                 │
//! │       │  db.vouchers().find_voucher("WELCOME50")                        │
//! │       ▼                                                                 │
//! │  VoucherRepository                                                     │
//! │  ├── find_voucher(&self, code)                                         │
//! │  ├── list_promotions(&self)                                            │
//! │  └── ...                                                               │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Service/product catalog and code lookup
//! - [`client::ClientRepository`] - Client directory and balance settlement
//! - [`voucher::VoucherRepository`] - Vouchers and promotions
//! - [`invoice::InvoiceRepository`] - Immutable invoice documents + numbering
//! - [`inbox::InboxRepository`] - Pending orders from the companion app

pub mod catalog;
pub mod client;
pub mod inbox;
pub mod invoice;
pub mod voucher;
