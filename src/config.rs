use std::time::Duration;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{AdvanceError, Result};

/// http client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// api root, e.g. `https://api.example.co.ke/api` (no trailing slash)
    pub base_url: String,
    /// per-request timeout in seconds; enforced by the http client
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: 30,
            user_agent: format!("salary-advance-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AdvanceError::Configuration {
                message: format!("base url must be http(s): {}", self.base_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(AdvanceError::Configuration {
                message: "timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}

/// advance rules published by the backend at `/system-config/advance/config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceConfig {
    /// percent per month
    pub advance_default_interest_rate: Rate,
    pub advance_min_amount: Money,
    pub advance_max_amount: Money,
    pub advance_min_repayment_period: u32,
    pub advance_max_repayment_period: u32,
    #[serde(default)]
    pub advance_purposes: Vec<String>,
    pub max_advance_percentage: Rate,
    pub max_active_advances: u32,
}

impl Default for AdvanceConfig {
    /// the values the product falls back to when the config fetch fails
    fn default() -> Self {
        Self {
            advance_default_interest_rate: Rate::from_percentage(1),
            advance_min_amount: Money::from_major(1000),
            advance_max_amount: Money::from_major(1_000_000),
            advance_min_repayment_period: 1,
            advance_max_repayment_period: 3,
            advance_purposes: Vec::new(),
            max_advance_percentage: Rate::from_percentage(50),
            max_active_advances: 1,
        }
    }
}

impl AdvanceConfig {
    /// repayment periods a borrower may choose, in months
    pub fn repayment_periods(&self) -> std::ops::RangeInclusive<u32> {
        self.advance_min_repayment_period.max(1)..=self.advance_max_repayment_period.max(1)
    }

    /// period preselected for a new request
    pub fn default_repayment_period(&self) -> u32 {
        self.advance_max_repayment_period.max(1)
    }

    /// largest amount requestable against a day with `available` funds
    pub fn amount_ceiling(&self, available: Money) -> Money {
        self.advance_max_amount.min(available)
    }
}

/// the config document envelope the backend wraps `AdvanceConfig` in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument<T> {
    #[serde(rename = "_id")]
    pub id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: T,
    pub is_active: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub updated_by: String,
}

/// m-pesa limits applied before a payment call leaves the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileMoneyLimits {
    pub country_code: String,
    pub local_digits: usize,
    pub withdrawal_min: Money,
    pub withdrawal_max: Money,
    pub deposit_min: Money,
}

impl Default for MobileMoneyLimits {
    fn default() -> Self {
        Self {
            country_code: "254".to_string(),
            local_digits: 9,
            withdrawal_min: Money::from_major(10),
            withdrawal_max: Money::from_major(150_000),
            deposit_min: Money::ONE,
        }
    }
}

/// amount step used when picking an advance amount
pub const AMOUNT_STEP: Money = Money::from_decimal(dec!(100));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_trims_trailing_slash() {
        let config = ClientConfig::new("https://api.example.com/api/");
        assert_eq!(config.base_url, "https://api.example.com/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config_rejects_bad_url() {
        let config = ClientConfig::new("ftp://files.example.com");
        assert!(matches!(
            config.validate(),
            Err(AdvanceError::Configuration { .. })
        ));

        let config = ClientConfig::new("https://api.example.com").timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_advance_config_from_backend_document() {
        let json = r#"{
            "_id": "cfg1",
            "key": "advance",
            "type": "advance",
            "data": {
                "advanceDefaultInterestRate": 2.5,
                "advanceMinAmount": 500,
                "advanceMaxAmount": 20000,
                "advanceMinRepaymentPeriod": 1,
                "advanceMaxRepaymentPeriod": 6,
                "advancePurposes": ["Medical", "School fees"],
                "maxAdvancePercentage": 50,
                "maxActiveAdvances": 2
            },
            "isActive": true,
            "description": "advance rules",
            "updatedBy": "admin"
        }"#;

        let doc: ConfigDocument<AdvanceConfig> = serde_json::from_str(json).unwrap();
        let config = doc.data;
        assert_eq!(config.advance_default_interest_rate, Rate::from_percent(dec!(2.5)));
        assert_eq!(config.repayment_periods().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(config.default_repayment_period(), 6);
        assert_eq!(
            config.amount_ceiling(Money::from_major(50_000)),
            Money::from_major(20_000)
        );
        assert_eq!(
            config.amount_ceiling(Money::from_major(7_500)),
            Money::from_major(7_500)
        );
    }

    #[test]
    fn test_fallback_config() {
        let config = AdvanceConfig::default();
        assert_eq!(config.repayment_periods().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(config.advance_default_interest_rate, Rate::from_percentage(1));
    }
}
