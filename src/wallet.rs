use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::ValidationError;
use crate::types::{RecordId, TransactionStatus, WalletTransactionType};

/// body for `/wallet-payments/wallet-to-wallet`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransferRequest {
    pub recipient_wallet_id: String,
    pub amount: Money,
    pub description: String,
}

impl WalletTransferRequest {
    /// Checks a transfer before it is sent: recipient present, amount
    /// positive and covered by `balance`.
    pub fn new(
        recipient_wallet_id: impl Into<String>,
        amount: Money,
        description: impl Into<String>,
        balance: Money,
    ) -> Result<Self, ValidationError> {
        let recipient_wallet_id = recipient_wallet_id.into().trim().to_string();
        if recipient_wallet_id.is_empty() {
            return Err(ValidationError::MissingField {
                field: "recipient wallet id",
            });
        }
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount { amount });
        }
        if amount > balance {
            return Err(ValidationError::InsufficientBalance {
                balance,
                requested: amount,
            });
        }
        Ok(Self {
            recipient_wallet_id,
            amount,
            description: description.into().trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub transaction_id: String,
    pub amount: Money,
    #[serde(default)]
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub recipient_name: String,
    pub sender_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransferResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: TransferReceipt,
}

/// `{walletBalance}` from `/user/wallet-balance`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub wallet_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletOwner {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_mpesa_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_wallet_id: Option<String>,
}

/// an entry in `/wallet-transactions/my-transactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "walletId")]
    pub owner: WalletOwner,
    pub transaction_type: WalletTransactionType,
    pub amount: Money,
    pub transaction_id: String,
    pub transaction_date: DateTime<Utc>,
    pub status: TransactionStatus,
    #[serde(default)]
    pub recipient_details: RecipientDetails,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WalletTransaction {
    /// who the money went to, for list rows
    pub fn counterparty(&self) -> Option<&str> {
        match self.transaction_type {
            WalletTransactionType::Withdrawal => self.recipient_details.recipient_mpesa_number.as_deref(),
            WalletTransactionType::TransferToWallet => self.recipient_details.recipient_wallet_id.as_deref(),
        }
    }
}

/// balance as shown on the wallet card, whole shillings
pub fn format_balance(balance: Money) -> String {
    balance.format_kes_whole()
}
