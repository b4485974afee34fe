use anyhow::{Context, Result, bail};
use reqwest::Client;

use crate::config::Credentials;
use crate::types::{QueryResponse, TokenResponse, TollQuery, TollVoucher, cnpj};

const API_BASE: &str = "https://api.godigibee.io/pipeline/braskem/v1";

/// Client for the Braskem toll-voucher pipeline.
///
/// Wraps the two vendor calls: the OAuth client-credentials token exchange
/// and the bearer-authenticated voucher lookup. Each lookup is independent;
/// no token is cached between submissions.
pub struct PedagioClient {
    http: Client,
    credentials: Credentials,
    base_url: String,
}

impl PedagioClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_base_url(credentials, API_BASE)
    }

    /// Build a client against a non-default base URL (used by tests to
    /// point at a mock server)
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            credentials,
            base_url: base_url.into(),
        })
    }

    /// Exchange the client credentials for a bearer token.
    ///
    /// Returns the `access_token` from a 200 response. Any other status
    /// fails with the status code and the raw response body.
    pub async fn fetch_token(&self) -> Result<String> {
        let url = format!(
            "{}/api-token?apikey={}",
            self.base_url, self.credentials.api_key
        );
        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", "token-oauth"),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .context("Token request failed to reach the API")?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            bail!("Failed to obtain token. Status: {}, Response: {}", status, body);
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .context("Token response did not contain an access_token")?;

        tracing::debug!("Token obtained");
        Ok(token.access_token)
    }

    /// Query the toll voucher for a transport document, bearer-authenticated.
    ///
    /// A non-2xx status fails with the status and raw body. A 2xx response
    /// carrying an `error` field fails with the vendor's message; only a
    /// response with a `body` object yields a voucher.
    pub async fn consulta_pedagio(
        &self,
        token: &str,
        cnpj_value: &str,
        doc_transporte: &str,
    ) -> Result<TollVoucher> {
        if !cnpj::is_allowed(cnpj_value) {
            bail!("CNPJ {} is not in the authorized list", cnpj_value);
        }
        if doc_transporte.trim().is_empty() {
            bail!("DOC_TRANSPORTE must not be empty");
        }

        let url = format!(
            "{}/consulta-pedagio?apikey={}",
            self.base_url, self.credentials.api_key
        );
        let query = TollQuery {
            cnpj: cnpj_value.to_string(),
            doc_transporte: doc_transporte.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&query)
            .send()
            .await
            .context("Toll query failed to reach the API")?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            bail!("Toll query failed. Status: {}, Response: {}", status, body);
        }

        let parsed: QueryResponse = serde_json::from_str(&body)
            .context("Failed to parse toll query response")?;

        if let Some(message) = parsed.error {
            bail!("{}", message);
        }

        match parsed.body {
            Some(voucher) => Ok(voucher),
            None => bail!("Toll query response contained neither body nor error"),
        }
    }

    /// Run the full flow for one submission: token first, then the query.
    /// A failure at either step short-circuits.
    pub async fn lookup(&self, cnpj_value: &str, doc_transporte: &str) -> Result<TollVoucher> {
        let token = self.fetch_token().await?;
        tracing::info!(cnpj = cnpj_value, doc_transporte, "Querying toll voucher");
        self.consulta_pedagio(&token, cnpj_value, doc_transporte)
            .await
    }
}
