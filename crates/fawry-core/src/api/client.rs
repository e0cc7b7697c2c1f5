//! Fawry REST API client.
//!
//! Every call except card tokenisation is signed by [`RequestSigner`] before it
//! leaves the process. POST bodies are JSON; GET and DELETE carry the signed
//! fields in the query string.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};

use crate::config::FawryConfig;
use crate::signing::{RequestSigner, SignedEnvelope};
use crate::types::{
    CardTokenResponse, ChargeItem, ChargeRequest, CreateCardTokenRequest,
    CreateCardTokenResponse, CreateChargeResponse, CustomerInfo, DeleteCardTokenQuery,
    GatewayResponse, ListCardTokensQuery, ListCardTokensResponse, PaymentCard, PaymentInfo,
    PaymentStatusQuery, PaymentStatusResponse, RefundRequest, RefundResponse,
};
use crate::{Error, Result};

const CARD_TOKEN_PATH: &str = "/ECommerceWeb/Fawry/cards/cardToken";
const REFUND_PATH: &str = "/ECommerceWeb/Fawry/payments/refund";
const CHARGE_PATH: &str = "/ECommerceWeb/Fawry/payments/charge";
const STATUS_PATH: &str = "/ECommerceWeb/Fawry/payments/status";

/// Upper bound on a single retry delay.
const MAX_BACKOFF_MS: u64 = 30_000;

/// Client for the Fawry payment gateway.
pub struct FawryClient {
    config: FawryConfig,
    signer: RequestSigner,
    http_client: reqwest::Client,
}

impl FawryClient {
    #[allow(clippy::result_large_err)]
    pub fn new(config: FawryConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .connect_timeout(StdDuration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            signer: RequestSigner::new(config.security_key.as_str()),
            config,
            http_client,
        })
    }

    /// Build a client from `FAWRY_*` environment variables.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        Self::new(FawryConfig::from_env()?)
    }

    pub fn merchant_code(&self) -> &str {
        &self.config.merchant_code
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_root(), path)
    }

    fn query_url(&self, path: &str, envelope: &SignedEnvelope) -> String {
        format!("{}?{}", self.url(path), envelope.to_query_string())
    }

    /// Execute an HTTP GET with retry and exponential backoff.
    ///
    /// Retries 5xx and 429 responses as well as transport failures. Other 4xx
    /// responses fail immediately.
    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let max_retries = self.config.max_retries.max(1);
        let mut last_error = None;

        for attempt in 0..max_retries {
            match self.http_client.get(url).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response)
                    if response.status().as_u16() == 429 || response.status().is_server_error() =>
                {
                    let status = response.status();
                    let is_rate_limited = status.as_u16() == 429;
                    warn!(
                        attempt = attempt + 1,
                        status = %status,
                        rate_limited = is_rate_limited,
                        "Retryable gateway error, backing off"
                    );
                    let text = response.text().await.unwrap_or_default();
                    last_error = Some(Error::Api {
                        message: format!("{} - {}", status, text),
                        status: Some(status.as_u16()),
                    });

                    if attempt + 1 < max_retries {
                        let base = if is_rate_limited { 2000 } else { 500 };
                        tokio::time::sleep(backoff_delay(base, attempt)).await;
                    }
                    continue;
                }
                Ok(response) => return Err(api_error(response).await),
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        error = %e,
                        "HTTP request failed, backing off"
                    );
                    last_error = Some(Error::Http(e));
                }
            }

            if attempt + 1 < max_retries {
                tokio::time::sleep(backoff_delay(500, attempt)).await;
            }
        }

        Err(last_error.unwrap_or(Error::Api {
            message: "Max retries exceeded".to_string(),
            status: None,
        }))
    }

    async fn post_json(&self, path: &str, body: String) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response)
    }

    /// Tokenise a card so later charges can reference it. Not signed.
    pub async fn create_card_token(
        &self,
        customer: &CustomerInfo,
        card: &PaymentCard,
    ) -> Result<CreateCardTokenResponse> {
        let request = CreateCardTokenRequest {
            merchant_code: self.config.merchant_code.clone(),
            customer: customer.clone(),
            card: card.clone(),
        };
        let body = request.payload().to_json()?;

        debug!(
            customer = %customer.profile_id,
            last_four = %card.last_four(),
            "POST card token"
        );

        let response = self.post_json(CARD_TOKEN_PATH, body).await?;
        let result: CreateCardTokenResponse = checked(response).await?;
        info!(customer = %customer.profile_id, "Card tokenised");
        Ok(result)
    }

    /// Refund all or part of a paid reference.
    pub async fn refund(
        &self,
        reference_number: &str,
        refund_amount: Decimal,
        reason: Option<&str>,
    ) -> Result<RefundResponse> {
        let mut request = RefundRequest::new(
            self.config.merchant_code.as_str(),
            reference_number,
            refund_amount,
        );
        request.reason = reason.map(str::to_string);

        let body = self.signer.sign(&request)?.to_json()?;
        let response = self.post_json(REFUND_PATH, body).await?;
        let result: RefundResponse = checked(response).await?;

        info!(
            reference = %reference_number,
            amount = %refund_amount,
            "Refund accepted"
        );
        Ok(result)
    }

    /// Create a server-side charge.
    pub async fn create_charge(
        &self,
        merchant_ref_num: &str,
        customer: &CustomerInfo,
        payment: &PaymentInfo,
        charge_items: &[ChargeItem],
    ) -> Result<CreateChargeResponse> {
        let request = ChargeRequest {
            merchant_code: self.config.merchant_code.clone(),
            merchant_ref_num: merchant_ref_num.to_string(),
            customer: customer.clone(),
            payment: payment.clone(),
            charge_items: charge_items.to_vec(),
        };

        let body = self.signer.sign(&request)?.to_json()?;
        let response = self.post_json(CHARGE_PATH, body).await?;
        let result: CreateChargeResponse = checked(response).await?;

        info!(
            merchant_ref = %merchant_ref_num,
            method = %payment.payment_method,
            reference = ?result.reference_number,
            "Charge created"
        );
        Ok(result)
    }

    /// List the saved cards of a customer.
    pub async fn list_card_tokens(&self, customer_profile_id: &str) -> Result<ListCardTokensResponse> {
        let query = ListCardTokensQuery {
            merchant_code: self.config.merchant_code.clone(),
            customer_profile_id: customer_profile_id.to_string(),
        };
        let envelope = self.signer.sign(&query)?;

        let response = self
            .get_with_retry(&self.query_url(CARD_TOKEN_PATH, &envelope))
            .await?;
        let result: ListCardTokensResponse = checked(response).await?;

        debug!(
            customer = %customer_profile_id,
            cards = result.cards.len(),
            "Listed card tokens"
        );
        Ok(result)
    }

    /// Current status of a charge by the merchant's own reference.
    pub async fn payment_status(&self, merchant_ref_number: &str) -> Result<PaymentStatusResponse> {
        let query = PaymentStatusQuery {
            merchant_code: self.config.merchant_code.clone(),
            merchant_ref_number: merchant_ref_number.to_string(),
        };
        let envelope = self.signer.sign(&query)?;

        let response = self
            .get_with_retry(&self.query_url(STATUS_PATH, &envelope))
            .await?;
        let result: PaymentStatusResponse = checked(response).await?;

        debug!(
            merchant_ref = %merchant_ref_number,
            status = ?result.payment_status,
            "Fetched payment status"
        );
        Ok(result)
    }

    /// Remove a saved card.
    pub async fn delete_card_token(
        &self,
        customer_profile_id: &str,
        card_token: &str,
    ) -> Result<CardTokenResponse> {
        let query = DeleteCardTokenQuery {
            merchant_code: self.config.merchant_code.clone(),
            customer_profile_id: customer_profile_id.to_string(),
            card_token: card_token.to_string(),
        };
        let envelope = self.signer.sign(&query)?;

        let response = self
            .http_client
            .delete(self.query_url(CARD_TOKEN_PATH, &envelope))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let result: CardTokenResponse = checked(response).await?;

        info!(customer = %customer_profile_id, "Card token deleted");
        Ok(result)
    }
}

impl std::fmt::Debug for FawryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FawryClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Exponential backoff: `base_ms * 2^attempt`, capped at [`MAX_BACKOFF_MS`].
fn backoff_delay(base_ms: u64, attempt: u32) -> StdDuration {
    StdDuration::from_millis(std::cmp::min(
        base_ms.saturating_mul(2u64.saturating_pow(attempt)),
        MAX_BACKOFF_MS,
    ))
}

async fn api_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    Error::Api {
        message: format!("{} - {}", status, text),
        status: Some(status),
    }
}

/// Decode a 2xx body and reject it if the gateway reports a failure inside.
async fn checked<T>(response: reqwest::Response) -> Result<T>
where
    T: DeserializeOwned + GatewayResponse,
{
    let body: T = response.json().await?;
    body.status().check()?;
    Ok(body)
}
