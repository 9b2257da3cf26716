use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{AdvanceStatus, RecordId, StaffRef};

/// an advance as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryAdvance {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub employee: String,
    pub amount: Money,
    #[serde(default)]
    pub amount_repaid: Money,
    pub purpose: String,
    pub status: AdvanceStatus,
    pub requested_date: DateTime<Utc>,
    pub repayment_period: u32,
    pub interest_rate: Rate,
    pub total_repayment: Money,
    pub installment_amount: Money,
    #[serde(default)]
    pub comments: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<StaffRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disbursed_by: Option<StaffRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disbursed_date: Option<DateTime<Utc>>,
}

impl SalaryAdvance {
    /// what is still owed, never negative
    pub fn outstanding(&self) -> Money {
        self.total_repayment.saturating_sub(self.amount_repaid)
    }

    pub fn is_settled(&self) -> bool {
        self.status == AdvanceStatus::Repaid || self.outstanding().is_zero()
    }
}

/// body for `/advances/{id}/repay`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepayAdvanceRequest {
    pub amount: Money,
}

/// totals shown above the advance history list
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AdvanceHistory {
    pub count: usize,
    pub total_amount: Money,
    pub total_repaid: Money,
    pub total_outstanding: Money,
}

impl AdvanceHistory {
    pub fn from_advances(advances: &[SalaryAdvance]) -> Self {
        advances.iter().fold(Self::default(), |mut acc, advance| {
            acc.count += 1;
            acc.total_amount += advance.amount;
            acc.total_repaid += advance.amount_repaid;
            if advance.status.is_outstanding() {
                acc.total_outstanding += advance.outstanding();
            }
            acc
        })
    }
}
