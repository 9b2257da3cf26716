use tracing::info;

use crate::decimal::Money;
use crate::eligibility::CurrentAdvanceSummary;
use crate::errors::Result;
use crate::gateway::{AdvanceGateway, WalletGateway};
use crate::transactions::{TransactionPage, DEFAULT_PAGE};

/// the home screen's three panels, each loaded on its own
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub wallet_balance: Result<Money>,
    pub advance_summary: Result<CurrentAdvanceSummary>,
    pub recent_transactions: Result<TransactionPage>,
}

impl DashboardSnapshot {
    /// whether the repay action should be shown
    pub fn can_repay(&self) -> bool {
        self.advance_summary.as_ref().is_ok_and(CurrentAdvanceSummary::can_repay)
    }

    pub fn all_loaded(&self) -> bool {
        self.wallet_balance.is_ok() && self.advance_summary.is_ok() && self.recent_transactions.is_ok()
    }
}

/// Fetch balance, advance summary and the first page of transactions at
/// the same time. A failure in one panel does not affect the others.
pub async fn refresh_dashboard(
    advances: &dyn AdvanceGateway,
    wallet: &dyn WalletGateway,
    page_size: u32,
) -> DashboardSnapshot {
    let (wallet_balance, advance_summary, recent_transactions) = tokio::join!(
        wallet.wallet_balance(),
        advances.current_summary(),
        wallet.transactions(DEFAULT_PAGE, page_size),
    );
    let snapshot = DashboardSnapshot {
        wallet_balance,
        advance_summary,
        recent_transactions,
    };
    info!(complete = snapshot.all_loaded(), "dashboard refreshed");
    snapshot
}
