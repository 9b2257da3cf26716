pub mod advance;
pub mod auth;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod decimal;
pub mod eligibility;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod mpesa;
pub mod notifications;
pub mod transactions;
pub mod types;
pub mod view_model;
pub mod wallet;

// re-export key types
pub use advance::{
    AdvanceCalculator, AdvanceHistory, AdvanceRequest, AdvanceRequestBuilder, AdvanceWorkflow,
    RepaymentQuote, SalaryAdvance,
};
pub use auth::{LoginResponse, NationalId, Pin, Session};
pub use client::ApiClient;
pub use config::{AdvanceConfig, ClientConfig, MobileMoneyLimits};
pub use dashboard::{refresh_dashboard, DashboardSnapshot};
pub use decimal::{Money, Rate};
pub use eligibility::{Availability, CurrentAdvanceSummary, DayEntry, EligibilitySummary};
pub use errors::{AdvanceError, Result, ValidationError};
pub use events::{ClientEvent, EventStore};
pub use gateway::{AdvanceGateway, AuthGateway, MobileMoneyGateway, WalletGateway};
pub use mpesa::{PhoneNumber, RepaymentInitiator, StkPushAck};
pub use notifications::{Inbox, InboxItem, InboxKind, Notice, NoticeQueue, NoticeSink};
pub use transactions::{Pagination, Transaction, TransactionFeed, TransactionPage};
pub use types::{AdvanceStatus, PaymentMethod, RecordId, TransactionStatus, User};
pub use view_model::{LoadTicket, Screen, ViewState};
pub use wallet::{WalletTransaction, WalletTransferRequest};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
