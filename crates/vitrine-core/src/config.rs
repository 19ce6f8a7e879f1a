//! # Cart Configuration
//!
//! Currency and limits a cart is created with.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VITRINE_CURRENCY=BRL                                               │
//! │     VITRINE_PRECISION=2                                                │
//! │     VITRINE_MAX_ITEMS=100                                              │
//! │     VITRINE_MAX_ITEM_QUANTITY=999                                      │
//! │                                                                         │
//! │  2. TOML Config File (path supplied by the embedder)                   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     BRL, 2 minor-unit digits, 100 lines, 999 units per line            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration is read once at process initialization and handed to
//! [`Cart::with_config`](crate::cart::Cart::with_config). Carts themselves
//! never read files or the environment.
//!
//! ## Configuration File Format
//! ```toml
//! [currency]
//! code = "BRL"
//! precision = 2
//!
//! [limits]
//! max_items = 100
//! max_item_quantity = 999
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::money::Currency;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

pub use crate::money::MAX_PRECISION;

// =============================================================================
// Limits
// =============================================================================

/// Size limits enforced when items are added to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLimits {
    /// Maximum number of distinct lines.
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Maximum quantity on a single line.
    #[serde(default = "default_max_item_quantity")]
    pub max_item_quantity: u32,
}

fn default_max_items() -> usize {
    MAX_CART_ITEMS
}

fn default_max_item_quantity() -> u32 {
    MAX_ITEM_QUANTITY
}

impl Default for CartLimits {
    fn default() -> Self {
        CartLimits {
            max_items: default_max_items(),
            max_item_quantity: default_max_item_quantity(),
        }
    }
}

// =============================================================================
// Cart Configuration
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Currency the cart is denominated in.
    #[serde(default)]
    pub currency: Currency,

    /// Size limits.
    #[serde(default)]
    pub limits: CartLimits,
}

impl CartConfig {
    /// Parses a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        let config: CartConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, if `config_path` is given and exists
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> CoreResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    fn load_with(
        config_path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> CoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<&Path>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        let code = &self.currency.code;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CoreError::InvalidConfig(format!(
                "currency code must be 3 uppercase letters, got: '{}'",
                code
            )));
        }

        if self.currency.precision > MAX_PRECISION {
            return Err(CoreError::InvalidConfig(format!(
                "precision must be at most {}, got: {}",
                MAX_PRECISION, self.currency.precision
            )));
        }

        if self.limits.max_items == 0 {
            return Err(CoreError::InvalidConfig(
                "max_items must be greater than 0".into(),
            ));
        }

        if self.limits.max_item_quantity == 0 {
            return Err(CoreError::InvalidConfig(
                "max_item_quantity must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from any key lookup; unparsable values are skipped.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(code) = lookup("VITRINE_CURRENCY") {
            debug!(currency = %code, "Overriding currency from environment");
            self.currency.code = code.trim().to_uppercase();
        }

        if let Some(precision) = lookup("VITRINE_PRECISION") {
            match precision.parse::<u8>() {
                Ok(p) => self.currency.precision = p,
                Err(_) => warn!(value = %precision, "Ignoring unparsable VITRINE_PRECISION"),
            }
        }

        if let Some(max) = lookup("VITRINE_MAX_ITEMS") {
            match max.parse::<usize>() {
                Ok(m) => self.limits.max_items = m,
                Err(_) => warn!(value = %max, "Ignoring unparsable VITRINE_MAX_ITEMS"),
            }
        }

        if let Some(max) = lookup("VITRINE_MAX_ITEM_QUANTITY") {
            match max.parse::<u32>() {
                Ok(m) => self.limits.max_item_quantity = m,
                Err(_) => warn!(value = %max, "Ignoring unparsable VITRINE_MAX_ITEM_QUANTITY"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.currency.code, "BRL");
        assert_eq!(config.currency.precision, 2);
        assert_eq!(config.limits.max_items, 100);
        assert_eq!(config.limits.max_item_quantity, 999);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = CartConfig::from_toml_str(
            r#"
            [currency]
            code = "USD"
            "#,
        )
        .unwrap();

        assert_eq!(config.currency.code, "USD");
        assert_eq!(config.currency.precision, 2);
        assert_eq!(config.limits, CartLimits::default());
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        let config = CartConfig::from_toml_str("").unwrap();
        assert_eq!(config, CartConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartConfig::default();
        assert!(config.validate().is_ok());

        config.currency.code = "real".to_string();
        assert!(config.validate().is_err());

        config.currency.code = "BRL".to_string();
        config.currency.precision = 9;
        assert!(config.validate().is_err());

        config.currency.precision = 0;
        config.limits.max_items = 0;
        assert!(config.validate().is_err());

        config.limits.max_items = 1;
        config.limits.max_item_quantity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = CartConfig::from_toml_str("[currency\ncode = 1").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("VITRINE_CURRENCY", "usd"),
            ("VITRINE_PRECISION", "3"),
            ("VITRINE_MAX_ITEMS", "not-a-number"),
            ("VITRINE_MAX_ITEM_QUANTITY", "12"),
        ]
        .into_iter()
        .collect();

        let mut config = CartConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.currency.code, "USD");
        assert_eq!(config.currency.precision, 3);
        assert_eq!(config.limits.max_items, 100);
        assert_eq!(config.limits.max_item_quantity, 12);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config =
            CartConfig::load_or_default(Some(Path::new("/nonexistent/vitrine/cart.toml")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cart.toml");
        std::fs::write(
            &path,
            r#"
            [currency]
            code = "USD"
            precision = 3

            [limits]
            max_items = 7
            "#,
        )
        .unwrap();

        let config = CartConfig::load_with(Some(&path), |_| None).unwrap();
        assert_eq!(config.currency, Currency::new("USD", 3));
        assert_eq!(config.limits.max_items, 7);
        assert_eq!(config.limits.max_item_quantity, 999);

        // Environment wins over the file
        let config = CartConfig::load_with(Some(&path), |key| {
            (key == "VITRINE_MAX_ITEMS").then(|| "3".to_string())
        })
        .unwrap();
        assert_eq!(config.limits.max_items, 3);
        assert_eq!(config.currency.code, "USD");

        temp_dir.close().unwrap();
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cart.toml");
        std::fs::write(&path, "[limits\nmax_items = \"many\"").unwrap();

        let err = CartConfig::load_with(Some(&path), |_| None).unwrap_err();
        assert!(err.is_config_error());

        let config = CartConfig::load_or_default(Some(&path));
        assert_eq!(config, CartConfig::default());

        temp_dir.close().unwrap();
    }

    #[test]
    fn test_load_invalid_values_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cart.toml");
        std::fs::write(&path, "[limits]\nmax_items = 0\n").unwrap();

        let err = CartConfig::load_with(Some(&path), |_| None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));

        temp_dir.close().unwrap();
    }

    #[test]
    fn test_toml_serialization() {
        let config = CartConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[currency]"));
        assert!(toml_str.contains("[limits]"));

        let back = CartConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }
}
