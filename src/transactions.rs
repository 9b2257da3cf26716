use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::TransactionStatus;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// `{success, data}`, the wrapper the transactions endpoints use
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: T,
}

/// a payment recorded by the backend (stk pushes, paybills, repayments)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(alias = "_id")]
    pub id: String,
    pub transaction_type: String,
    pub amount: Money,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub account_reference: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
}

impl Transaction {
    /// "Paybill Payment" for a `paybill` transaction
    pub fn title(&self) -> String {
        let mut chars = self.transaction_type.chars();
        match chars.next() {
            Some(first) => format!("{}{} Payment", first.to_uppercase(), chars.as_str()),
            None => "Payment".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u32,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
}

/// The transaction list as the user scrolls it.
///
/// Pages are appended in the order they are loaded. Whether more exist is
/// decided only by the last page's `hasNextPage`; the counts are not
/// consulted.
#[derive(Debug, Clone)]
pub struct TransactionFeed {
    limit: u32,
    items: Vec<Transaction>,
    last: Option<Pagination>,
}

impl Default for TransactionFeed {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TransactionFeed {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            items: Vec::new(),
            last: None,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn items(&self) -> &[Transaction] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn can_load_more(&self) -> bool {
        self.last.map_or(true, |p| p.has_next_page)
    }

    /// the page to ask for next, or `None` when the feed is exhausted
    pub fn next_page(&self) -> Option<u32> {
        match self.last {
            None => Some(DEFAULT_PAGE),
            Some(p) if p.has_next_page => Some(p.page + 1),
            Some(_) => None,
        }
    }

    /// Append a loaded page. Page 1 resets the feed (pull to refresh).
    pub fn push_page(&mut self, page: TransactionPage) {
        if page.pagination.page <= DEFAULT_PAGE {
            self.items.clear();
        }
        self.items.extend(page.transactions);
        self.last = Some(page.pagination);
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.last = None;
    }
}
