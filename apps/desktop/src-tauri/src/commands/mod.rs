//! # Tauri Commands Module
//!
//! All commands exposed to the WebView frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── catalog.rs   ◄─── Catalog search, code lookup
//! ├── client.rs    ◄─── Client search/selection
//! ├── cart.rs      ◄─── Cart ledger + pending-order import
//! ├── billing.rs   ◄─── Discounts and redemptions
//! ├── payment.rs   ◄─── Split-payment ledger
//! ├── checkout.rs  ◄─── Checkout, invoice retrieval
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tauri Command Flow                                   │
//! │                                                                         │
//! │  Frontend                                                               │
//! │  ────────                                                               │
//! │  import { invoke } from '@tauri-apps/api/core';                         │
//! │                                                                         │
//! │  const bill = await invoke('add_to_bill', { itemId: 'xxx' });           │
//! │         │                                                               │
//! │         │ (IPC via WebView)                                             │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  #[tauri::command]                                                      │
//! │  async fn add_to_bill(                                                  │
//! │      db: State<'_, DbState>,            ◄── Injected by Tauri          │
//! │      register: State<'_, RegisterState>,◄── Injected by Tauri          │
//! │      item_id: String,                   ◄── From invoke params         │
//! │  ) -> Result<BillResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Frontend receives: BillResponse                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn search_catalog(db: State<'_, DbState>, ...)
//!
//! // Only needs the register
//! fn get_bill(register: State<'_, RegisterState>)
//!
//! // Needs both
//! async fn add_to_bill(db: State<'_, DbState>, register: State<'_, RegisterState>, ...)
//! ```

pub mod billing;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod config;
pub mod payment;
