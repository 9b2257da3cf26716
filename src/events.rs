use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::RecordId;

/// what a client session did, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientEvent {
    // session
    SignedIn {
        user_id: RecordId,
        timestamp: DateTime<Utc>,
    },
    SignedOut {
        timestamp: DateTime<Utc>,
    },

    // advances
    AdvanceQuoted {
        principal: Money,
        periods: u32,
        total_repayment: Money,
    },
    AdvanceRequestBlocked {
        reason: String,
        timestamp: DateTime<Utc>,
    },
    AdvanceRequested {
        advance_id: RecordId,
        amount: Money,
        day: Option<NaiveDate>,
        timestamp: DateTime<Utc>,
    },
    AdvanceRejected {
        amount: Money,
        message: String,
        timestamp: DateTime<Utc>,
    },

    // mobile money
    RepaymentPromptSent {
        amount: Money,
        reference: String,
        checkout_request_id: String,
        timestamp: DateTime<Utc>,
    },
    RepaymentFailed {
        amount: Money,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<ClientEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: ClientEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<ClientEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[ClientEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
