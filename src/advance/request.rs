use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AdvanceConfig;
use crate::decimal::Money;
use crate::eligibility::DayEntry;
use crate::errors::ValidationError;
use crate::types::PaymentMethod;

/// longest purpose the backend accepts
pub const MAX_PURPOSE_LEN: usize = 50;

/// the body posted to `/advances`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    pub amount: Money,
    pub purpose: String,
    pub repayment_period: u32,
    pub comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_payment_method: Option<PaymentMethod>,
}

/// builds an `AdvanceRequest`, checking every local rule before a
/// request can exist
#[derive(Debug, Clone, Default)]
pub struct AdvanceRequestBuilder {
    amount: Option<Money>,
    purpose: Option<String>,
    repayment_period: Option<u32>,
    comments: Option<String>,
    payment_method: Option<PaymentMethod>,
    selected_day: Option<DayEntry>,
    today: Option<NaiveDate>,
    config: Option<AdvanceConfig>,
}

impl AdvanceRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    pub fn repayment_period(mut self, months: u32) -> Self {
        self.repayment_period = Some(months);
        self
    }

    pub fn comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// the eligibility day the request draws against, judged as of `today`
    pub fn against_day(mut self, day: &DayEntry, today: NaiveDate) -> Self {
        self.selected_day = Some(day.clone());
        self.today = Some(today);
        self
    }

    pub fn config(mut self, config: &AdvanceConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    pub(crate) fn has_config(&self) -> bool {
        self.config.is_some()
    }

    /// the checks that hold under any config: amount, purpose and the
    /// selected day
    pub fn precheck(&self) -> Result<(), ValidationError> {
        self.checked_basics().map(|_| ())
    }

    fn checked_basics(&self) -> Result<(Money, &str), ValidationError> {
        let amount = self.amount.ok_or(ValidationError::MissingField { field: "amount" })?;
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount { amount });
        }

        let purpose = self.purpose.as_deref().map(str::trim).unwrap_or_default();
        if purpose.is_empty() {
            return Err(ValidationError::MissingPurpose);
        }
        let length = purpose.chars().count();
        if length > MAX_PURPOSE_LEN {
            return Err(ValidationError::PurposeTooLong {
                length,
                max: MAX_PURPOSE_LEN,
            });
        }

        if let (Some(day), Some(today)) = (&self.selected_day, self.today) {
            day.ensure_actionable(today)?;
            if amount > day.available_amount {
                return Err(ValidationError::ExceedsAvailable {
                    available: day.available_amount,
                    requested: amount,
                });
            }
        }
        Ok((amount, purpose))
    }

    pub fn build(self) -> Result<AdvanceRequest, ValidationError> {
        let (amount, purpose) = self.checked_basics()?;
        let purpose = purpose.to_string();

        let config = self.config.unwrap_or_default();
        let repayment_period = self
            .repayment_period
            .unwrap_or_else(|| config.default_repayment_period());
        if repayment_period < 1 {
            return Err(ValidationError::InvalidRepaymentPeriod {
                periods: repayment_period,
            });
        }
        if repayment_period > config.advance_max_repayment_period {
            return Err(ValidationError::RepaymentPeriodTooLong {
                periods: repayment_period,
                maximum: config.advance_max_repayment_period,
            });
        }
        if repayment_period < config.advance_min_repayment_period {
            return Err(ValidationError::RepaymentPeriodTooShort {
                periods: repayment_period,
                minimum: config.advance_min_repayment_period,
            });
        }

        if amount < config.advance_min_amount {
            return Err(ValidationError::BelowMinimum {
                minimum: config.advance_min_amount,
                requested: amount,
            });
        }
        if amount > config.advance_max_amount {
            return Err(ValidationError::AboveMaximum {
                maximum: config.advance_max_amount,
                requested: amount,
            });
        }

        Ok(AdvanceRequest {
            amount,
            purpose,
            repayment_period,
            comments: self.comments.unwrap_or_default().trim().to_string(),
            preferred_payment_method: self.payment_method,
        })
    }
}
