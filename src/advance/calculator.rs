use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::{AdvanceConfig, AMOUNT_STEP};
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ValidationError};

/// interest, total and installment for a proposed advance
///
/// Simple interest charged per period on the full principal:
/// `interest = principal × rate/100 × periods`. No rounding is applied;
/// format at the display edge with `Money::format_kes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentQuote {
    pub principal: Money,
    /// percent per repayment period
    pub interest_rate: Rate,
    pub periods: u32,
    pub total_interest: Money,
    pub total_repayment: Money,
    pub monthly_installment: Money,
}

impl RepaymentQuote {
    /// quote `principal` at `rate` percent per period over `periods` months
    pub fn calculate(principal: Money, rate: Rate, periods: u32) -> Result<Self> {
        if !principal.is_positive() {
            return Err(ValidationError::NonPositiveAmount { amount: principal }.into());
        }
        if periods < 1 {
            return Err(ValidationError::InvalidRepaymentPeriod { periods }.into());
        }
        if rate.is_negative() {
            return Err(ValidationError::NegativeRate { rate }.into());
        }

        let n = Decimal::from(periods);
        let out_of_range = || ValidationError::AmountOutOfRange { amount: principal };
        let total_interest = principal
            .as_decimal()
            .checked_mul(rate.as_fraction())
            .and_then(|interest| interest.checked_mul(n))
            .ok_or_else(out_of_range)?;
        let total_repayment = principal
            .as_decimal()
            .checked_add(total_interest)
            .ok_or_else(out_of_range)?;
        let total_interest = Money::from_decimal(total_interest);
        let total_repayment = Money::from_decimal(total_repayment);
        let monthly_installment = total_repayment / n;

        Ok(Self {
            principal,
            interest_rate: rate,
            periods,
            total_interest,
            total_repayment,
            monthly_installment,
        })
    }
}

/// quotes advances under a backend `AdvanceConfig`
#[derive(Debug, Clone, Default)]
pub struct AdvanceCalculator {
    config: AdvanceConfig,
}

impl AdvanceCalculator {
    pub fn new(config: AdvanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdvanceConfig {
        &self.config
    }

    /// quote at the configured default interest rate
    pub fn quote(&self, principal: Money, periods: u32) -> Result<RepaymentQuote> {
        RepaymentQuote::calculate(principal, self.config.advance_default_interest_rate, periods)
    }

    /// one quote per selectable repayment period
    pub fn quote_all_periods(&self, principal: Money) -> Result<Vec<RepaymentQuote>> {
        self.config
            .repayment_periods()
            .map(|periods| self.quote(principal, periods))
            .collect()
    }

    /// snap an amount to the nearest step of 100, clamped to
    /// `[min amount, ceiling]` for a day with `available` funds
    pub fn snap_amount(&self, amount: Money, available: Money) -> Money {
        let step = AMOUNT_STEP.as_decimal();
        let snapped = Money::from_decimal((amount.as_decimal() / step)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            * step);
        let ceiling = self.config.amount_ceiling(available);
        snapped.max(self.config.advance_min_amount).min(ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AdvanceError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_quote() {
        let quote =
            RepaymentQuote::calculate(Money::from_major(1000), Rate::from_percentage(1), 3).unwrap();

        assert_eq!(quote.total_interest, Money::from_major(30));
        assert_eq!(quote.total_repayment, Money::from_major(1030));
        assert_eq!(quote.monthly_installment.round_dp(2), Money::from_str_exact("343.33").unwrap());
        assert!(quote.monthly_installment.as_decimal() > dec!(343.333333));
    }

    #[test]
    fn test_installments_sum_to_total() {
        for (principal, rate, periods) in [
            (Money::from_major(7_300), Rate::from_percent(dec!(2.5)), 7u32),
            (Money::from_str_exact("12345.67").unwrap(), Rate::from_percent(dec!(0.75)), 11),
            (Money::from_major(1), Rate::ZERO, 1),
        ] {
            let quote = RepaymentQuote::calculate(principal, rate, periods).unwrap();
            let expected = principal.as_decimal()
                + principal.as_decimal() * rate.as_percent() / dec!(100) * Decimal::from(periods);
            assert_eq!(quote.total_repayment.as_decimal(), expected);

            let recombined = quote.monthly_installment * Decimal::from(periods);
            let drift = (recombined - quote.total_repayment).abs();
            assert!(drift.as_decimal() < dec!(0.000000001), "drift {}", drift);
        }
    }

    #[test]
    fn test_zero_rate_has_no_interest() {
        let quote = RepaymentQuote::calculate(Money::from_major(900), Rate::ZERO, 3).unwrap();
        assert!(quote.total_interest.is_zero());
        assert_eq!(quote.monthly_installment, Money::from_major(300));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(RepaymentQuote::calculate(Money::ZERO, Rate::from_percentage(1), 3).is_err());
        assert!(RepaymentQuote::calculate(Money::from_major(-5), Rate::from_percentage(1), 3).is_err());
        assert!(RepaymentQuote::calculate(Money::from_major(100), Rate::from_percentage(1), 0).is_err());
        assert!(
            RepaymentQuote::calculate(Money::from_major(100), Rate::from_percent(dec!(-1)), 3).is_err()
        );
    }

    #[test]
    fn test_huge_principal_is_out_of_range() {
        // overflows on the interest product
        let err = RepaymentQuote::calculate(
            Money::from_decimal(Decimal::from_i128_with_scale(10_i128.pow(27), 0)),
            Rate::from_percentage(1000),
            12,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AdvanceError::InvalidInput(ValidationError::AmountOutOfRange { .. })
        ));

        // overflows on principal + interest
        let err = RepaymentQuote::calculate(Money::from_decimal(Decimal::MAX), Rate::from_percentage(1), 3)
            .unwrap_err();
        assert!(matches!(
            err,
            AdvanceError::InvalidInput(ValidationError::AmountOutOfRange { amount }) if amount.as_decimal() == Decimal::MAX
        ));
    }

    #[test]
    fn test_calculator_uses_config_rate() {
        let config = AdvanceConfig {
            advance_default_interest_rate: Rate::from_percentage(2),
            advance_max_repayment_period: 4,
            ..AdvanceConfig::default()
        };
        let calc = AdvanceCalculator::new(config);
        let quotes = calc.quote_all_periods(Money::from_major(10_000)).unwrap();
        assert_eq!(quotes.len(), 4);
        assert_eq!(quotes[3].total_interest, Money::from_major(800));
        assert_eq!(quotes[0].monthly_installment, Money::from_major(10_200));
    }

    #[test]
    fn test_snap_amount() {
        let calc = AdvanceCalculator::default();
        let available = Money::from_major(4_520);
        assert_eq!(calc.snap_amount(Money::from_major(2_349), available), Money::from_major(2_300));
        assert_eq!(calc.snap_amount(Money::from_major(2_350), available), Money::from_major(2_400));
        assert_eq!(calc.snap_amount(Money::from_major(200), available), Money::from_major(1_000));
        assert_eq!(calc.snap_amount(Money::from_major(9_000), available), available);
    }
}
