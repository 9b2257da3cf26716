//! HTTP client for the salary advance backend.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::advance::{AdvanceRequest, RepayAdvanceRequest, SalaryAdvance};
use crate::auth::{LoginRequest, LoginResponse, NationalId, Pin, Session};
use crate::config::{AdvanceConfig, ClientConfig, ConfigDocument};
use crate::decimal::Money;
use crate::eligibility::{month_name, CurrentAdvanceSummary, EligibilitySummary};
use crate::errors::{AdvanceError, Result};
use crate::gateway::{AdvanceGateway, AuthGateway, MobileMoneyGateway, WalletGateway};
use crate::mpesa::{MpesaB2CResponse, MpesaResponse, MpesaToWalletRequest, StkPushRequest, WithdrawalRequest};
use crate::transactions::{ApiEnvelope, Transaction, TransactionPage};
use crate::types::User;
use crate::wallet::{WalletBalance, WalletTransaction, WalletTransferRequest, WalletTransferResponse};

/// Talks to the backend over https.
///
/// Cloning is cheap; clones share the connection pool. Requests carry a
/// bearer token only when built through [`ApiClient::authorized`].
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| AdvanceError::Configuration {
                message: format!("could not build http client: {}", err),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// a client that sends the session's token, if it has one
    pub fn authorized(&self, session: &Session) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: session.token().map(str::to_string),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// the url of `segments` under the base url, each one percent-encoded
    /// so an id can't escape its segment
    fn resource_url(&self, segments: &[&str]) -> Result<String> {
        let invalid = || AdvanceError::Configuration {
            message: format!("base url cannot take a path: {}", self.base_url),
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    fn require_token(&self) -> Result<()> {
        if self.token.is_some() {
            Ok(())
        } else {
            Err(AdvanceError::NotAuthenticated)
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_url(self.url(path)).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        debug!(url = %url, "GET");
        self.send(self.client.get(&url)).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.post_url(self.url(path), body).await
    }

    async fn post_url<B, T>(&self, url: String, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(url = %url, "POST");
        self.send(self.client.post(&url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = classify_failure(status, &body);
            warn!(status = status.as_u16(), error = %err, "request failed");
            return Err(err);
        }
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<MessageField>,
}

/// the `message` of an error body; validation errors send a list, first wins
pub(crate) fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.message? {
        MessageField::One(message) => message,
        MessageField::Many(messages) => messages.into_iter().next()?,
    };
    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

/// map a non-success response onto the error taxonomy
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> AdvanceError {
    let message = error_message(body);
    if status.is_server_error() {
        AdvanceError::RemoteUnavailable {
            reason: format!("server returned {}", status.as_u16()),
            message,
        }
    } else {
        AdvanceError::RemoteRejection {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn find_user_by_national_id(&self, national_id: &NationalId) -> Result<Option<User>> {
        match self.get(&format!("/user/national-id/{}", national_id)).await {
            Ok(user) => Ok(Some(user)),
            Err(AdvanceError::RemoteRejection { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn login(&self, national_id: &NationalId, pin: &Pin) -> Result<LoginResponse> {
        let body = LoginRequest {
            national_id: national_id.as_str(),
            pin: pin.expose(),
        };
        let response: LoginResponse = self.post("/auth/login", &body).await?;
        info!(user_id = %response.user.id, "signed in");
        Ok(response)
    }
}

#[async_trait]
impl AdvanceGateway for ApiClient {
    async fn advance_config(&self) -> Result<AdvanceConfig> {
        let doc: ConfigDocument<AdvanceConfig> = self.get("/system-config/advance/config").await?;
        Ok(doc.data)
    }

    async fn current_summary(&self) -> Result<CurrentAdvanceSummary> {
        self.require_token()?;
        self.get("/advances/summary/current").await
    }

    async fn eligibility_summary(&self, month: u32, year: i32) -> Result<EligibilitySummary> {
        self.require_token()?;
        let name = month_name(month).ok_or_else(|| AdvanceError::Configuration {
            message: format!("month out of range: {}", month),
        })?;
        let summary: EligibilitySummary = self
            .get(&format!("/advances/summary/monthly/{}/{}", name, year))
            .await?;
        info!(month = name, year, days = summary.daily_advances.len(), "loaded eligibility");
        Ok(summary)
    }

    async fn my_advances(&self) -> Result<Vec<SalaryAdvance>> {
        self.require_token()?;
        self.get("/advances/my-advances").await
    }

    async fn advance(&self, advance_id: &str) -> Result<SalaryAdvance> {
        self.require_token()?;
        self.get_url(self.resource_url(&["advances", advance_id])?).await
    }

    async fn request_advance(&self, request: &AdvanceRequest) -> Result<SalaryAdvance> {
        self.require_token()?;
        info!(amount = %request.amount, periods = request.repayment_period, "submitting advance request");
        self.post("/advances", request).await
    }

    async fn repay_advance(&self, advance_id: &str, amount: Money) -> Result<serde_json::Value> {
        self.require_token()?;
        let url = self.resource_url(&["advances", advance_id, "repay"])?;
        self.post_url(url, &RepayAdvanceRequest { amount }).await
    }
}

#[async_trait]
impl MobileMoneyGateway for ApiClient {
    async fn initiate_stk_push(&self, request: &StkPushRequest) -> Result<MpesaResponse> {
        self.require_token()?;
        self.post("/payment/initiate-c2b", request).await
    }

    async fn mpesa_to_wallet(&self, request: &MpesaToWalletRequest) -> Result<MpesaResponse> {
        self.require_token()?;
        self.post("/wallet-payments/mpesa-to-wallet", request).await
    }

    async fn wallet_to_mpesa(&self, request: &WithdrawalRequest) -> Result<MpesaB2CResponse> {
        self.require_token()?;
        self.post("/wallet-payments/wallet-to-mpesa", request).await
    }
}

#[async_trait]
impl WalletGateway for ApiClient {
    async fn wallet_balance(&self) -> Result<Money> {
        self.require_token()?;
        let balance: WalletBalance = self.get("/user/wallet-balance").await?;
        Ok(balance.wallet_balance)
    }

    async fn transfer_to_wallet(&self, request: &WalletTransferRequest) -> Result<WalletTransferResponse> {
        self.require_token()?;
        self.post("/wallet-payments/wallet-to-wallet", request).await
    }

    async fn wallet_transactions(&self) -> Result<Vec<WalletTransaction>> {
        self.require_token()?;
        self.get("/wallet-transactions/my-transactions").await
    }

    async fn transactions(&self, page: u32, limit: u32) -> Result<TransactionPage> {
        self.require_token()?;
        let envelope: ApiEnvelope<TransactionPage> = self
            .get(&format!("/transactions?page={}&limit={}", page, limit))
            .await?;
        Ok(envelope.data)
    }

    async fn transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.require_token()?;
        let envelope: ApiEnvelope<Transaction> = self
            .get_url(self.resource_url(&["transactions", transaction_id])?)
            .await?;
        Ok(envelope.data)
    }
}
