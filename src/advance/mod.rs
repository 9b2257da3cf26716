pub mod calculator;
pub mod record;
pub mod request;
pub mod workflow;

pub use calculator::{AdvanceCalculator, RepaymentQuote};
pub use record::{AdvanceHistory, RepayAdvanceRequest, SalaryAdvance};
pub use request::{AdvanceRequest, AdvanceRequestBuilder, MAX_PURPOSE_LEN};
pub use workflow::{AdvanceWorkflow, REPAY_FALLBACK, SUBMIT_FALLBACK};