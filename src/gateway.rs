//! The remote collaborators the client talks to.
//!
//! `ApiClient` implements all of them over http. Workflows take
//! `&dyn Trait` so tests can swap in an in-memory backend.

use async_trait::async_trait;

use crate::advance::{AdvanceRequest, SalaryAdvance};
use crate::auth::{LoginResponse, NationalId, Pin};
use crate::config::AdvanceConfig;
use crate::decimal::Money;
use crate::eligibility::{CurrentAdvanceSummary, EligibilitySummary};
use crate::errors::Result;
use crate::mpesa::{MpesaB2CResponse, MpesaResponse, MpesaToWalletRequest, StkPushRequest, WithdrawalRequest};
use crate::transactions::{Transaction, TransactionPage};
use crate::types::User;
use crate::wallet::{WalletTransaction, WalletTransferRequest, WalletTransferResponse};

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `None` when no employee has this national id
    async fn find_user_by_national_id(&self, national_id: &NationalId) -> Result<Option<User>>;

    async fn login(&self, national_id: &NationalId, pin: &Pin) -> Result<LoginResponse>;
}

#[async_trait]
pub trait AdvanceGateway: Send + Sync {
    async fn advance_config(&self) -> Result<AdvanceConfig>;

    async fn current_summary(&self) -> Result<CurrentAdvanceSummary>;

    /// `month` is 1-based
    async fn eligibility_summary(&self, month: u32, year: i32) -> Result<EligibilitySummary>;

    async fn my_advances(&self) -> Result<Vec<SalaryAdvance>>;

    async fn advance(&self, advance_id: &str) -> Result<SalaryAdvance>;

    async fn request_advance(&self, request: &AdvanceRequest) -> Result<SalaryAdvance>;

    async fn repay_advance(&self, advance_id: &str, amount: Money) -> Result<serde_json::Value>;
}

#[async_trait]
pub trait MobileMoneyGateway: Send + Sync {
    /// push a pin prompt to the payer's phone
    async fn initiate_stk_push(&self, request: &StkPushRequest) -> Result<MpesaResponse>;

    async fn mpesa_to_wallet(&self, request: &MpesaToWalletRequest) -> Result<MpesaResponse>;

    async fn wallet_to_mpesa(&self, request: &WithdrawalRequest) -> Result<MpesaB2CResponse>;
}

#[async_trait]
pub trait WalletGateway: Send + Sync {
    async fn wallet_balance(&self) -> Result<Money>;

    async fn transfer_to_wallet(&self, request: &WalletTransferRequest) -> Result<WalletTransferResponse>;

    async fn wallet_transactions(&self) -> Result<Vec<WalletTransaction>>;

    async fn transactions(&self, page: u32, limit: u32) -> Result<TransactionPage>;

    async fn transaction(&self, transaction_id: &str) -> Result<Transaction>;
}
