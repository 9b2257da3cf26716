use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::{Money, Rate};

/// local validation failures, raised before any network call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("amount must be greater than zero: {amount}")]
    NonPositiveAmount {
        amount: Money,
    },

    #[error("amount out of range: {amount}")]
    AmountOutOfRange {
        amount: Money,
    },

    #[error("amount exceeds available limit: available {available}, requested {requested}")]
    ExceedsAvailable {
        available: Money,
        requested: Money,
    },

    #[error("amount below minimum: minimum {minimum}, requested {requested}")]
    BelowMinimum {
        minimum: Money,
        requested: Money,
    },

    #[error("amount above maximum: maximum {maximum}, requested {requested}")]
    AboveMaximum {
        maximum: Money,
        requested: Money,
    },

    #[error("insufficient wallet balance: balance {balance}, requested {requested}")]
    InsufficientBalance {
        balance: Money,
        requested: Money,
    },

    #[error("invalid interest rate: {rate}")]
    NegativeRate {
        rate: Rate,
    },

    #[error("repayment period must be at least 1 month, got {periods}")]
    InvalidRepaymentPeriod {
        periods: u32,
    },

    #[error("repayment period {periods} exceeds configured maximum {maximum}")]
    RepaymentPeriodTooLong {
        periods: u32,
        maximum: u32,
    },

    #[error("repayment period {periods} below configured minimum {minimum}")]
    RepaymentPeriodTooShort {
        periods: u32,
        minimum: u32,
    },

    #[error("purpose is required")]
    MissingPurpose,

    #[error("purpose must be {max} characters or less, got {length}")]
    PurposeTooLong {
        length: usize,
        max: usize,
    },

    #[error("no advance available on {date}")]
    DayNotActionable {
        date: NaiveDate,
    },

    #[error("advances are not available for future dates: {date}")]
    FutureDate {
        date: NaiveDate,
    },

    #[error("invalid phone number format: {input}")]
    InvalidPhoneNumber {
        input: String,
    },

    #[error("national id must be {min}-{max} digits")]
    InvalidNationalId {
        min: usize,
        max: usize,
    },

    #[error("pin must be exactly {length} digits")]
    InvalidPin {
        length: usize,
    },

    #[error("{field} is required")]
    MissingField {
        field: &'static str,
    },

    #[error("nothing to repay")]
    NothingToRepay,
}

#[derive(Error, Debug)]
pub enum AdvanceError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    RemoteRejection {
        status: u16,
        message: Option<String>,
    },

    #[error("service unavailable: {reason}")]
    RemoteUnavailable {
        reason: String,
        message: Option<String>,
    },

    #[error("no eligibility entry for {date}")]
    DayNotFound {
        date: String,
    },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid configuration: {message}")]
    Configuration {
        message: String,
    },

    #[error("not signed in")]
    NotAuthenticated,
}

impl AdvanceError {
    /// the server-supplied message, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AdvanceError::RemoteRejection { message, .. }
            | AdvanceError::RemoteUnavailable { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// the single user-visible message for a failed action
    ///
    /// Remote failures show the server text verbatim when there is one.
    /// Local validation failures show their own description.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AdvanceError::InvalidInput(err) => capitalize(&err.to_string()),
            _ => match self.server_message() {
                Some(msg) if !msg.trim().is_empty() => msg.to_string(),
                _ => fallback.to_string(),
            },
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AdvanceError::RemoteRejection { .. } | AdvanceError::RemoteUnavailable { .. }
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl From<reqwest::Error> for AdvanceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return AdvanceError::Decode(err.to_string());
        }
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "could not connect to server".to_string()
        } else {
            err.to_string()
        };
        AdvanceError::RemoteUnavailable {
            reason,
            message: None,
        }
    }
}

impl From<serde_json::Error> for AdvanceError {
    fn from(err: serde_json::Error) -> Self {
        AdvanceError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdvanceError>;
