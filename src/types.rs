use serde::{Deserialize, Serialize};

/// backend record identifier (a mongo object id string)
pub type RecordId = String;

/// advance lifecycle status as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceStatus {
    /// submitted, awaiting approval
    Pending,
    /// approved but not yet paid out
    Approved,
    /// paid out to the employee
    Disbursed,
    /// repayments under way
    Repaying,
    /// fully repaid
    Repaid,
}

impl AdvanceStatus {
    /// statuses that still carry a balance owed
    pub fn is_outstanding(&self) -> bool {
        matches!(self, AdvanceStatus::Disbursed | AdvanceStatus::Repaying)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdvanceStatus::Pending => "Pending",
            AdvanceStatus::Approved => "Approved",
            AdvanceStatus::Disbursed => "Disbursed",
            AdvanceStatus::Repaying => "Repaying",
            AdvanceStatus::Repaid => "Repaid",
        }
    }
}

/// where an approved advance should be paid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Mpesa,
    Wallet,
}

/// wallet transaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletTransactionType {
    Withdrawal,
    TransferToWallet,
}

/// settlement status shared by wallet and payment transactions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Success,
    Pending,
    Failed,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::Success)
    }
}

/// the person who approved or disbursed an advance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRef {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub employee_id: String,
}

impl StaffRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// employee profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    pub national_id: String,
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub employment_type: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
