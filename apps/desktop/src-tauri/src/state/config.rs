//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SALON_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.
//! If hot-reloading is added later, we'd wrap in `RwLock`.

use salon_core::TaxRate;
use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// ## Fields
/// Most fields have sensible defaults for development.
/// Production deployments should configure these properly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (displayed on invoices)
    pub store_name: String,

    /// Store address lines (for invoices)
    pub store_address: Vec<String>,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Default tax rate in basis points
    /// e.g., 1800 = 18% GST
    pub default_tax_rate_bps: u32,

    /// Simulated settlement delay before a checkout resolves, in
    /// milliseconds. Duplicate submissions are rejected while it runs.
    pub checkout_settle_ms: u64,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Salon POS Dev Studio"
    /// - Currency: INR (₹)
    /// - Tax: 18% GST
    fn default() -> Self {
        ConfigState {
            store_name: "Salon POS Dev Studio".to_string(),
            store_address: vec![
                "14 MG Road".to_string(),
                "Bengaluru, KA 560001".to_string(),
            ],
            currency_code: "INR".to_string(),
            currency_symbol: "₹".to_string(),
            currency_decimals: 2,
            default_tax_rate_bps: 1800, // 18%
            checkout_settle_ms: 600,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `SALON_STORE_NAME`: Override store name
    /// - `SALON_TAX_RATE`: Override default tax rate (e.g., "18")
    /// - `SALON_SETTLE_MS`: Override the simulated settlement delay
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();

        if let Ok(store_name) = std::env::var("SALON_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(tax_rate_str) = std::env::var("SALON_TAX_RATE") {
            if let Ok(rate) = tax_rate_str.parse::<f64>() {
                config.default_tax_rate_bps = (rate * 100.0) as u32;
            }
        }

        if let Ok(settle_str) = std::env::var("SALON_SETTLE_MS") {
            if let Ok(ms) = settle_str.parse::<u64>() {
                config.checkout_settle_ms = ms;
            }
        }

        config
    }

    /// The default tax rate as a TaxRate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.default_tax_rate_bps)
    }

    /// Formats a paise amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(63720), "₹637.20");
    /// ```
    pub fn format_currency(&self, paise: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = paise / divisor;
        let frac = (paise % divisor).abs();

        format!(
            "{}{}{}",
            if paise < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}
