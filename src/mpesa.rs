use std::fmt;

use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::MobileMoneyLimits;
use crate::decimal::Money;
use crate::errors::{AdvanceError, Result, ValidationError};
use crate::events::{ClientEvent, EventStore};
use crate::gateway::MobileMoneyGateway;
use crate::types::User;

/// a safaricom subscriber number held as its 9 local digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
    local: String,
}

impl PhoneNumber {
    /// strict form input: exactly 9 digits after the +254 prefix
    pub fn parse_local(input: &str) -> std::result::Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.len() == 9 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self {
                local: trimmed.to_string(),
            })
        } else {
            Err(ValidationError::InvalidPhoneNumber {
                input: input.to_string(),
            })
        }
    }

    /// lenient contact-book input: `+254 712 345 678`, `254712345678`,
    /// `0712345678`, or anything with at least 9 digits (last 9 kept)
    pub fn from_contact(input: &str) -> std::result::Result<Self, ValidationError> {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
        let local = if let Some(rest) = digits.strip_prefix("254") {
            rest.to_string()
        } else if let Some(rest) = digits.strip_prefix('0') {
            rest.to_string()
        } else if digits.len() >= 9 {
            digits[digits.len() - 9..].to_string()
        } else {
            digits
        };
        Self::parse_local(&local).map_err(|_| ValidationError::InvalidPhoneNumber {
            input: input.to_string(),
        })
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    /// `254XXXXXXXXX`, the form the payment api expects
    pub fn international(&self) -> String {
        format!("254{}", self.local)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+254{}", self.local)
    }
}

/// body for `/payment/initiate-c2b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StkPushRequest {
    pub phone_number: String,
    pub amount: Money,
    pub account_reference: String,
}

/// body for `/wallet-payments/mpesa-to-wallet`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MpesaToWalletRequest {
    pub phone_number: String,
    pub amount: Money,
    pub recipient_wallet_id: String,
}

/// body for `/wallet-payments/wallet-to-mpesa`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub phone_number: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StkPushAck {
    #[serde(default)]
    pub merchant_request_id: String,
    #[serde(default)]
    pub checkout_request_id: String,
    #[serde(default)]
    pub response_description: String,
    #[serde(default)]
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpesaResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<StkPushAck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2CPayout {
    pub transaction_id: String,
    #[serde(default)]
    pub employee_id: String,
    pub amount: Money,
    pub phone_number: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpesaB2CResponse {
    pub success: bool,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<B2CPayout>,
}

/// the account reference the backend matches advance repayments on
pub fn repayment_reference(user: &User) -> String {
    format!("{}:{}:repay-advance", user.first_name, user.id)
}

/// check a wallet → m-pesa withdrawal against limits and balance
pub fn validate_withdrawal(
    amount: Money,
    balance: Money,
    limits: &MobileMoneyLimits,
) -> std::result::Result<(), ValidationError> {
    if amount < limits.withdrawal_min {
        return Err(ValidationError::BelowMinimum {
            minimum: limits.withdrawal_min,
            requested: amount,
        });
    }
    if amount > limits.withdrawal_max {
        return Err(ValidationError::AboveMaximum {
            maximum: limits.withdrawal_max,
            requested: amount,
        });
    }
    if amount > balance {
        return Err(ValidationError::InsufficientBalance {
            balance,
            requested: amount,
        });
    }
    Ok(())
}

/// check an m-pesa → wallet deposit
pub fn validate_deposit(amount: Money, limits: &MobileMoneyLimits) -> std::result::Result<(), ValidationError> {
    if amount < limits.deposit_min {
        return Err(ValidationError::BelowMinimum {
            minimum: limits.deposit_min,
            requested: amount,
        });
    }
    Ok(())
}

/// starts advance repayments through an stk push
pub struct RepaymentInitiator<'a> {
    gateway: &'a dyn MobileMoneyGateway,
    time: &'a SafeTimeProvider,
    events: EventStore,
}

impl<'a> RepaymentInitiator<'a> {
    pub fn new(gateway: &'a dyn MobileMoneyGateway, time: &'a SafeTimeProvider) -> Self {
        Self {
            gateway,
            time,
            events: EventStore::new(),
        }
    }

    pub fn events(&self) -> &[ClientEvent] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<ClientEvent> {
        self.events.take_events()
    }

    /// Prompt `phone` to pay `balance` against `user`'s advances.
    ///
    /// A zero balance or bad phone number fails locally. A response with
    /// `success: false` is treated as a rejection carrying its message.
    pub async fn repay(&mut self, user: &User, phone: &str, balance: Money) -> Result<StkPushAck> {
        if !balance.is_positive() {
            return Err(ValidationError::NothingToRepay.into());
        }
        let phone = PhoneNumber::parse_local(phone)?;
        let request = StkPushRequest {
            phone_number: phone.international(),
            amount: balance,
            account_reference: repayment_reference(user),
        };

        info!(amount = %balance, reference = %request.account_reference, "initiating repayment prompt");
        let outcome = self.gateway.initiate_stk_push(&request).await.and_then(|resp| {
            if resp.success {
                Ok(resp.data.unwrap_or_default())
            } else {
                Err(AdvanceError::RemoteRejection {
                    status: 200,
                    message: Some(resp.message),
                })
            }
        });

        match outcome {
            Ok(ack) => {
                self.events.emit(ClientEvent::RepaymentPromptSent {
                    amount: balance,
                    reference: request.account_reference,
                    checkout_request_id: ack.checkout_request_id.clone(),
                    timestamp: self.time.now(),
                });
                Ok(ack)
            }
            Err(err) => {
                let message = err.user_message(REPAYMENT_FALLBACK);
                warn!(error = %err, "repayment prompt failed");
                self.events.emit(ClientEvent::RepaymentFailed {
                    amount: balance,
                    message,
                    timestamp: self.time.now(),
                });
                Err(err)
            }
        }
    }
}

pub const REPAYMENT_FALLBACK: &str = "Failed to process your repayment request. Please try again.";

/// wallet → m-pesa payout; limits are checked before the call
pub async fn withdraw_to_mpesa(
    gateway: &dyn MobileMoneyGateway,
    phone: &PhoneNumber,
    amount: Money,
    balance: Money,
    limits: &MobileMoneyLimits,
) -> Result<MpesaB2CResponse> {
    validate_withdrawal(amount, balance, limits)?;
    let request = WithdrawalRequest {
        phone_number: phone.international(),
        amount,
    };
    info!(amount = %amount, "withdrawing to m-pesa");
    gateway.wallet_to_mpesa(&request).await
}

/// m-pesa → wallet deposit; prompts `phone` to pay into `wallet_id`
pub async fn deposit_from_mpesa(
    gateway: &dyn MobileMoneyGateway,
    phone: &PhoneNumber,
    amount: Money,
    wallet_id: &str,
    limits: &MobileMoneyLimits,
) -> Result<MpesaResponse> {
    validate_deposit(amount, limits)?;
    let request = MpesaToWalletRequest {
        phone_number: phone.international(),
        amount,
        recipient_wallet_id: wallet_id.to_string(),
    };
    info!(amount = %amount, "depositing from m-pesa");
    gateway.mpesa_to_wallet(&request).await
}
