use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{info, warn};

use crate::advance::{AdvanceCalculator, AdvanceRequestBuilder, RepaymentQuote, SalaryAdvance};
use crate::config::AdvanceConfig;
use crate::decimal::Money;
use crate::eligibility::{local_today, DayEntry, EligibilitySummary};
use crate::errors::{AdvanceError, Result, ValidationError};
use crate::events::{ClientEvent, EventStore};
use crate::gateway::AdvanceGateway;

pub const SUBMIT_FALLBACK: &str = "Failed to submit advance request";
pub const REPAY_FALLBACK: &str = "Failed to repay advance";

/// Quotes, submits and repays advances for one signed-in user.
///
/// Every submission is validated locally first. A request that fails
/// validation never reaches the gateway; one that passes is sent exactly
/// once, and a rejection is returned as is. Period and amount bounds come
/// from the backend's `AdvanceConfig`, fetched once and kept.
pub struct AdvanceWorkflow<'a> {
    gateway: &'a dyn AdvanceGateway,
    time: &'a SafeTimeProvider,
    config: Option<AdvanceConfig>,
    events: EventStore,
}

impl<'a> AdvanceWorkflow<'a> {
    pub fn new(gateway: &'a dyn AdvanceGateway, time: &'a SafeTimeProvider) -> Self {
        Self {
            gateway,
            time,
            config: None,
            events: EventStore::new(),
        }
    }

    /// use `config` instead of fetching the backend's rules
    pub fn with_config(mut self, config: AdvanceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// today's date in nairobi
    pub fn today(&self) -> NaiveDate {
        local_today(self.time)
    }

    pub fn events(&self) -> &[ClientEvent] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<ClientEvent> {
        self.events.take_events()
    }

    /// The backend's advance rules.
    ///
    /// Fetched on first use and kept. Falls back to the default rules when
    /// the config can't be fetched; a later call tries again.
    pub async fn rules(&mut self) -> AdvanceConfig {
        if let Some(config) = &self.config {
            return config.clone();
        }
        match self.gateway.advance_config().await {
            Ok(config) => {
                self.config = Some(config.clone());
                config
            }
            Err(err) => {
                warn!(error = %err, "advance config unavailable, using defaults");
                AdvanceConfig::default()
            }
        }
    }

    /// the calculator for the backend's current rules
    pub async fn calculator(&mut self) -> AdvanceCalculator {
        AdvanceCalculator::new(self.rules().await)
    }

    pub fn quote(&mut self, calculator: &AdvanceCalculator, principal: Money, periods: u32) -> Result<RepaymentQuote> {
        let quote = calculator.quote(principal, periods)?;
        self.events.emit(ClientEvent::AdvanceQuoted {
            principal: quote.principal,
            periods: quote.periods,
            total_repayment: quote.total_repayment,
        });
        Ok(quote)
    }

    /// Validate `draft` against `selected_day` and send it.
    ///
    /// A draft without its own config is checked against `rules()`. The
    /// amount, purpose and day are checked before the rules are fetched.
    pub async fn submit(
        &mut self,
        draft: AdvanceRequestBuilder,
        selected_day: &DayEntry,
        today: NaiveDate,
    ) -> Result<SalaryAdvance> {
        let draft = draft.against_day(selected_day, today);
        if let Err(err) = draft.precheck() {
            return Err(self.blocked(err));
        }
        let draft = if draft.has_config() {
            draft
        } else {
            let rules = self.rules().await;
            draft.config(&rules)
        };
        let request = match draft.build() {
            Ok(request) => request,
            Err(err) => return Err(self.blocked(err)),
        };

        match self.gateway.request_advance(&request).await {
            Ok(advance) => {
                info!(advance_id = %advance.id, amount = %advance.amount, "advance requested");
                self.events.emit(ClientEvent::AdvanceRequested {
                    advance_id: advance.id.clone(),
                    amount: request.amount,
                    day: Some(selected_day.date),
                    timestamp: self.time.now(),
                });
                Ok(advance)
            }
            Err(err) => {
                warn!(error = %err, "advance request failed");
                self.events.emit(ClientEvent::AdvanceRejected {
                    amount: request.amount,
                    message: err.user_message(SUBMIT_FALLBACK),
                    timestamp: self.time.now(),
                });
                Err(err)
            }
        }
    }

    /// Look up `date` in `summary` and submit against it, using today's
    /// local date.
    pub async fn submit_for_date(
        &mut self,
        draft: AdvanceRequestBuilder,
        summary: &EligibilitySummary,
        date: NaiveDate,
    ) -> Result<SalaryAdvance> {
        let day = summary.day(date)?.clone();
        let today = self.today();
        self.submit(draft, &day, today).await
    }

    /// Repay `amount` of `advance` from the wallet. The amount must be
    /// positive and no more than what is outstanding.
    pub async fn repay(&mut self, advance: &SalaryAdvance, amount: Money) -> Result<serde_json::Value> {
        let outstanding = advance.outstanding();
        if outstanding.is_zero() {
            return Err(self.blocked(ValidationError::NothingToRepay));
        }
        if !amount.is_positive() {
            return Err(self.blocked(ValidationError::NonPositiveAmount { amount }));
        }
        if amount > outstanding {
            return Err(self.blocked(ValidationError::ExceedsAvailable {
                available: outstanding,
                requested: amount,
            }));
        }
        info!(advance_id = %advance.id, amount = %amount, "repaying advance");
        self.gateway.repay_advance(&advance.id, amount).await
    }

    fn blocked(&mut self, err: ValidationError) -> AdvanceError {
        self.events.emit(ClientEvent::AdvanceRequestBlocked {
            reason: err.to_string(),
            timestamp: self.time.now(),
        });
        err.into()
    }
}
