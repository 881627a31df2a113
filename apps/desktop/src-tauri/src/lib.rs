//! # Salon Desktop Library
//!
//! Core library for the Salon POS desktop application.
//! This is the main entry point that configures and runs the Tauri app.
//!
//! ## Module Organization
//! ```text
//! salon_desktop_lib/
//! ├── lib.rs          ◄─── You are here (Tauri setup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── register.rs ◄─── The in-progress bill session
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   └── ...         ◄─── catalog, client, cart, billing, payment, checkout
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tauri::Manager;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use salon_db::{Database, DbConfig};
use state::{ConfigState, DbState, RegisterState};

/// Runs the Tauri application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • Defaults + SALON_* environment overrides                          │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • DbState: Wraps Database connection                                │
/// │     • RegisterState: Empty bill with the store tax rate                 │
/// │     • ConfigState: Loaded configuration                                 │
/// │                                                                         │
/// │  5. Build & Run Tauri App ────────────────────────────────────────────► │
/// │     • Register all commands                                             │
/// │     • Manage state                                                      │
/// │     • Launch window                                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() {
    // Initialize tracing (logging)
    init_tracing();

    info!("Starting Salon POS Desktop Application");

    // Build and run the Tauri app
    tauri::Builder::default()
        // Setup hook runs before the app starts
        .setup(|app| {
            let config_state = ConfigState::from_env();

            // Determine database path
            let db_path = get_database_path(app)?;
            info!(?db_path, "Database path determined");

            // Initialize database (blocking in setup, async in runtime)
            let db = tauri::async_runtime::block_on(async {
                let config = DbConfig::new(db_path);
                Database::new(config).await
            })?;

            info!("Database connected and migrations applied");

            // Initialize state objects
            let db_state = DbState::new(db);
            let register_state = RegisterState::new(config_state.tax_rate());

            // Register state with Tauri
            app.manage(db_state);
            app.manage(register_state);
            app.manage(config_state);

            info!("State initialized");
            Ok(())
        })
        // Register all commands
        .invoke_handler(tauri::generate_handler![
            // Catalog commands
            commands::catalog::search_catalog,
            commands::catalog::find_catalog_item_by_code,
            // Client commands
            commands::client::search_clients,
            commands::client::select_client,
            commands::client::clear_client,
            // Cart commands
            commands::cart::get_bill,
            commands::cart::add_to_bill,
            commands::cart::update_line_quantity,
            commands::cart::remove_bill_line,
            commands::cart::assign_line_staff,
            commands::cart::toggle_line_package_redemption,
            commands::cart::reset_bill,
            commands::cart::import_pending_order,
            // Billing commands
            commands::billing::set_manual_discount,
            commands::billing::clear_manual_discount,
            commands::billing::list_promotions,
            commands::billing::apply_promotion,
            commands::billing::apply_voucher_code,
            commands::billing::clear_voucher,
            commands::billing::toggle_redeem_points,
            commands::billing::toggle_redeem_wallet,
            commands::billing::set_points_redemption,
            commands::billing::set_wallet_redemption,
            // Payment commands
            commands::payment::add_payment_method,
            commands::payment::update_payment_entry,
            commands::payment::remove_payment_entry,
            // Checkout commands
            commands::checkout::checkout,
            commands::checkout::get_invoice,
            commands::checkout::list_recent_invoices,
            // Config commands
            commands::config::get_config,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=salon=trace` - Show trace for salon crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,salon=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.salon.pos/salon.db`
/// - **Windows**: `%APPDATA%\salon\pos\salon.db`
/// - **Linux**: `~/.local/share/salon-pos/salon.db`
///
/// ## Development Override
/// Set `SALON_DB_PATH` environment variable to use a custom path.
fn get_database_path(_app: &tauri::App) -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Check for override
    if let Ok(path) = std::env::var("SALON_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    // Use platform-specific app data directory
    let proj_dirs =
        ProjectDirs::from("com", "salon", "pos").ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("salon.db"))
}
