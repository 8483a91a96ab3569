//! [`LedgerStore`] backed by a running taxtrack server.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use taxtrack_core::calculations::TaxCalculator;
use taxtrack_core::{
    IncomeDraft, IncomeId, IncomeRecord, LedgerError, LedgerFactory, LedgerStore,
    NewIncomeRecord, TaxSummary, ValidationError,
};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to the server's JSON API over HTTP.
///
/// Every call is a network round trip and can fail with
/// [`LedgerError::Transport`]; nothing is retried.
pub struct RemoteLedger {
    client: Client,
    base_url: String,
}

impl RemoteLedger {
    /// `base_url` is the server root, e.g. `http://localhost:5000` or
    /// `http://localhost:5000/api`.
    pub fn new(base_url: &str) -> Result<Self, LedgerError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !is_server_url(base_url) {
            return Err(LedgerError::Configuration(format!(
                "server URL must start with http:// or https://, got '{base_url}'"
            )));
        }
        Ok(Self {
            client: Client::new(),
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(
        &self,
        path: &str,
    ) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn is_server_url(location: &str) -> bool {
    let location = location.trim();
    location.starts_with("http://") || location.starts_with("https://")
}

fn transport(e: reqwest::Error) -> LedgerError {
    LedgerError::Transport(e.to_string())
}

/// Turn an unsuccessful response into the matching [`LedgerError`].
/// `id` is the record a 404 refers to, when there is one.
async fn check(
    response: Response,
    id: Option<IncomeId>,
) -> Result<Response, LedgerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    debug!(%status, error = %message, "server rejected request");

    Err(match (status, id) {
        (StatusCode::BAD_REQUEST, _) => ValidationError::Rejected(message).into(),
        (StatusCode::NOT_FOUND, Some(id)) => LedgerError::NotFound(id),
        _ => LedgerError::Transport(format!("server responded {status}: {message}")),
    })
}

#[async_trait]
impl LedgerStore for RemoteLedger {
    async fn insert(
        &self,
        record: NewIncomeRecord,
    ) -> Result<IncomeRecord, LedgerError> {
        let response = self
            .client
            .post(self.url("/incomes"))
            .json(&IncomeDraft::from(&record))
            .send()
            .await
            .map_err(transport)?;
        let response = check(response, None).await?;
        response.json().await.map_err(transport)
    }

    async fn remove(
        &self,
        id: IncomeId,
    ) -> Result<(), LedgerError> {
        let response = self
            .client
            .delete(self.url(&format!("/incomes/{id}")))
            .send()
            .await
            .map_err(transport)?;
        check(response, Some(id)).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<IncomeRecord>, LedgerError> {
        let response = self
            .client
            .get(self.url("/incomes"))
            .send()
            .await
            .map_err(transport)?;
        let response = check(response, None).await?;
        response.json().await.map_err(transport)
    }

    /// The server's own summary. `calculator` is not consulted: the estimate
    /// follows whatever policy the server was started with.
    async fn summarize(
        &self,
        _calculator: &TaxCalculator,
    ) -> Result<TaxSummary, LedgerError> {
        let response = self
            .client
            .get(self.url("/tax-summary"))
            .send()
            .await
            .map_err(transport)?;
        let response = check(response, None).await?;
        response.json().await.map_err(transport)
    }
}

/// [`LedgerFactory`] for the `"http"` backend. The location is the server's
/// base URL, and any `http://` or `https://` location is taken to be one.
pub struct RemoteLedgerFactory;

#[async_trait]
impl LedgerFactory for RemoteLedgerFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    fn claims(
        &self,
        location: &str,
    ) -> bool {
        is_server_url(location)
    }

    async fn open(
        &self,
        location: &str,
    ) -> Result<Box<dyn LedgerStore>, LedgerError> {
        Ok(Box::new(RemoteLedger::new(location)?))
    }
}
