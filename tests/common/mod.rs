#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use salary_advance_rs::auth::{LoginResponse, NationalId, Pin};
use salary_advance_rs::gateway::{AdvanceGateway, AuthGateway, MobileMoneyGateway, WalletGateway};
use salary_advance_rs::mpesa::{
    MpesaB2CResponse, MpesaResponse, MpesaToWalletRequest, StkPushAck, StkPushRequest, WithdrawalRequest,
};
use salary_advance_rs::transactions::{Pagination, TransactionPage};
use salary_advance_rs::wallet::{WalletTransferRequest, WalletTransferResponse};
use salary_advance_rs::{
    AdvanceConfig, AdvanceError, Decimal, AdvanceRequest, AdvanceStatus, CurrentAdvanceSummary, DayEntry,
    EligibilitySummary, Money, Rate, Result, SalaryAdvance, Transaction, User, WalletTransaction,
};

/// What the fake backend answers for a call.
pub enum Reply<T> {
    Ok(T),
    Reject(u16, Option<&'static str>),
    Down,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Reject(status, message) => Err(AdvanceError::RemoteRejection {
                status: *status,
                message: message.map(str::to_string),
            }),
            Reply::Down => Err(AdvanceError::RemoteUnavailable {
                reason: "request timed out".to_string(),
                message: None,
            }),
        }
    }
}

/// in-memory backend that records every call it receives
pub struct FakeBackend {
    pub config_reply: Reply<AdvanceConfig>,
    pub advance_reply: Reply<SalaryAdvance>,
    pub stk_reply: Reply<MpesaResponse>,
    pub balance_reply: Reply<Money>,
    pub summary_reply: Reply<CurrentAdvanceSummary>,
    pub page_reply: Reply<TransactionPage>,
    pub calls: AtomicUsize,
    pub advance_requests: Mutex<Vec<AdvanceRequest>>,
    pub stk_requests: Mutex<Vec<StkPushRequest>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            config_reply: Reply::Ok(AdvanceConfig::default()),
            advance_reply: Reply::Ok(advance_record("adv-1", 1_000)),
            stk_reply: Reply::Ok(stk_accepted()),
            balance_reply: Reply::Ok(Money::from_major(2_500)),
            summary_reply: Reply::Ok(current_summary(Money::from_major(1_030))),
            page_reply: Reply::Ok(empty_page()),
            calls: AtomicUsize::new(0),
            advance_requests: Mutex::new(Vec::new()),
            stk_requests: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuthGateway for FakeBackend {
    async fn find_user_by_national_id(&self, national_id: &NationalId) -> Result<Option<User>> {
        self.hit();
        Ok((national_id.as_str() == "12345678").then(user))
    }

    async fn login(&self, _national_id: &NationalId, _pin: &Pin) -> Result<LoginResponse> {
        self.hit();
        Ok(LoginResponse {
            user: user(),
            token: "token-1".to_string(),
        })
    }
}

#[async_trait]
impl AdvanceGateway for FakeBackend {
    async fn advance_config(&self) -> Result<AdvanceConfig> {
        self.hit();
        self.config_reply.get()
    }

    async fn current_summary(&self) -> Result<CurrentAdvanceSummary> {
        self.hit();
        self.summary_reply.get()
    }

    async fn eligibility_summary(&self, _month: u32, _year: i32) -> Result<EligibilitySummary> {
        self.hit();
        Ok(march_summary())
    }

    async fn my_advances(&self) -> Result<Vec<SalaryAdvance>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn advance(&self, advance_id: &str) -> Result<SalaryAdvance> {
        self.hit();
        Ok(advance_record(advance_id, 1_000))
    }

    async fn request_advance(&self, request: &AdvanceRequest) -> Result<SalaryAdvance> {
        self.hit();
        self.advance_requests.lock().unwrap().push(request.clone());
        self.advance_reply.get()
    }

    async fn repay_advance(&self, _advance_id: &str, amount: Money) -> Result<serde_json::Value> {
        self.hit();
        Ok(serde_json::json!({ "amountRepaid": amount }))
    }
}

#[async_trait]
impl MobileMoneyGateway for FakeBackend {
    async fn initiate_stk_push(&self, request: &StkPushRequest) -> Result<MpesaResponse> {
        self.hit();
        self.stk_requests.lock().unwrap().push(request.clone());
        self.stk_reply.get()
    }

    async fn mpesa_to_wallet(&self, _request: &MpesaToWalletRequest) -> Result<MpesaResponse> {
        self.hit();
        Ok(stk_accepted())
    }

    async fn wallet_to_mpesa(&self, request: &WithdrawalRequest) -> Result<MpesaB2CResponse> {
        self.hit();
        Ok(MpesaB2CResponse {
            success: true,
            status: 200,
            message: format!("Withdrawal of {} initiated", request.amount),
            data: None,
        })
    }
}

#[async_trait]
impl WalletGateway for FakeBackend {
    async fn wallet_balance(&self) -> Result<Money> {
        self.hit();
        self.balance_reply.get()
    }

    async fn transfer_to_wallet(&self, _request: &WalletTransferRequest) -> Result<WalletTransferResponse> {
        self.hit();
        Err(AdvanceError::RemoteRejection {
            status: 400,
            message: Some("Recipient wallet not found".to_string()),
        })
    }

    async fn wallet_transactions(&self) -> Result<Vec<WalletTransaction>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn transactions(&self, _page: u32, _limit: u32) -> Result<TransactionPage> {
        self.hit();
        self.page_reply.get()
    }

    async fn transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.hit();
        Err(AdvanceError::RemoteRejection {
            status: 404,
            message: Some(format!("Transaction {} not found", transaction_id)),
        })
    }
}

pub fn user() -> User {
    serde_json::from_value(serde_json::json!({
        "_id": "u-42",
        "firstName": "Amina",
        "lastName": "Otieno",
        "email": "amina@example.com",
        "phoneNumber": "254712345678",
        "nationalId": "12345678",
        "employeeId": "EMP-042"
    }))
    .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(date: NaiveDate, available: i64) -> DayEntry {
    DayEntry {
        date,
        available_amount: Money::from_major(available),
        percentage_of_salary: Rate::from_percentage(50),
        is_weekend: false,
        is_holiday: false,
    }
}

/// March 2024 on a 60,000 salary: 1,000 accrues per day from the 4th
pub fn march_summary() -> EligibilitySummary {
    let daily_advances = (1..=31)
        .map(|d| day(date(2024, 3, d), if d < 4 { 0 } else { (d as i64 - 3) * 1_000 }))
        .collect();
    EligibilitySummary {
        month: "March".to_string(),
        year: 2024,
        basic_salary: Money::from_major(60_000),
        max_advance_percentage: Rate::from_percentage(50),
        max_advance_amount: Money::from_major(30_000),
        daily_advances,
        total_available_today: Money::ZERO,
        previous_advances: Vec::new(),
    }
}

pub fn advance_record(id: &str, amount: i64) -> SalaryAdvance {
    let at = Utc.with_ymd_and_hms(2024, 3, 15, 7, 0, 0).unwrap();
    let principal = Money::from_major(amount);
    let total = principal + principal.percentage(Rate::from_percentage(3));
    SalaryAdvance {
        id: id.to_string(),
        employee: "u-42".to_string(),
        amount: principal,
        amount_repaid: Money::ZERO,
        purpose: "School fees".to_string(),
        status: AdvanceStatus::Pending,
        requested_date: at,
        repayment_period: 3,
        interest_rate: Rate::from_percentage(1),
        total_repayment: total,
        installment_amount: total / Decimal::from(3),
        comments: String::new(),
        created_at: at,
        updated_at: at,
        approved_by: None,
        approved_date: None,
        disbursed_by: None,
        disbursed_date: None,
    }
}

pub fn current_summary(repayment_balance: Money) -> CurrentAdvanceSummary {
    serde_json::from_value(serde_json::json!({
        "availableAdvance": 12_000,
        "maxAdvance": 30_000,
        "basicSalary": 60_000,
        "advancePercentage": 50,
        "previousAdvances": 1_000,
        "nextPayday": "2024-03-28",
        "totalAmountRepaid": 0,
        "repaymentBalance": repayment_balance
    }))
    .unwrap()
}

pub fn stk_accepted() -> MpesaResponse {
    MpesaResponse {
        success: true,
        message: "Request accepted for processing".to_string(),
        data: Some(StkPushAck {
            merchant_request_id: "29115-34620561-1".to_string(),
            checkout_request_id: "ws_CO_150320241000".to_string(),
            response_description: "Success. Request accepted for processing".to_string(),
            transaction_id: "tx-1".to_string(),
        }),
    }
}

pub fn empty_page() -> TransactionPage {
    TransactionPage {
        transactions: Vec::new(),
        pagination: Pagination {
            total: 0,
            page: 1,
            limit: 5,
            total_pages: 0,
            has_next_page: false,
            has_previous_page: false,
        },
    }
}
