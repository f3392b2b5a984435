//! Blocking HTTP client that submits documents through a [`GatedInvoker`].

use super::{config::ClientConfig, model::Document};
use crate::error::ClientError;
use crate::rate_limiter::{CancellationToken, GatedInvoker, RateLimiter};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

/// Request header carrying the document signature.
pub const SIGNATURE_HEADER: &str = "Signature";

/// Successful (2xx) answer from the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

/// Submits documents to the "create document" endpoint, never exceeding the
/// configured rate.
///
/// The underlying HTTP client and its connection pool are reused across
/// calls. Clones share both the HTTP client and the limiter.
///
/// ```rust,no_run
/// use window_gate::{ClientConfig, Document, DocumentClient, RateLimiterConfig};
///
/// let client = DocumentClient::new(ClientConfig::new(RateLimiterConfig::per_second(3)))?;
/// let document = Document::builder("doc-1", "LP_INTRODUCE_GOODS")
///     .participant_inn("7700000000")
///     .build();
///
/// let response = client.create_document(&document, "base64-signature")?;
/// println!("{} {}", response.status, response.body);
/// # Ok::<(), window_gate::ClientError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DocumentClient {
    http: Client,
    endpoint: String,
    invoker: GatedInvoker,
}

impl DocumentClient {
    /// Builds a client with its own limiter from `config.rate`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Config`] for an invalid rate, [`ClientError::Transport`]
    /// if the HTTP client cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let limiter = RateLimiter::with_config(config.rate.clone())?;
        Self::with_invoker(config, GatedInvoker::new(limiter))
    }

    /// Builds a client that draws permits from an existing invoker.
    ///
    /// `config.rate` is ignored.
    pub fn with_invoker(config: ClientConfig, invoker: GatedInvoker) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
            invoker,
        })
    }

    /// The invoker gating this client's submissions.
    pub fn invoker(&self) -> &GatedInvoker {
        &self.invoker
    }

    /// The URL documents are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Blocks for a permit, then POSTs `document` as JSON.
    ///
    /// # Errors
    ///
    /// [`ClientError::Serialization`], [`ClientError::Transport`] or
    /// [`ClientError::Status`]. The permit is spent either way.
    pub fn create_document(
        &self,
        document: &Document,
        signature: &str,
    ) -> Result<SubmitResponse, ClientError> {
        self.invoker.execute(|| self.send(document, signature))
    }

    /// Like [`create_document`](Self::create_document), but gives up waiting
    /// for a permit once `token` is cancelled.
    ///
    /// # Errors
    ///
    /// Additionally [`ClientError::Cancelled`], in which case nothing was sent.
    pub fn create_document_cancellable(
        &self,
        token: &CancellationToken,
        document: &Document,
        signature: &str,
    ) -> Result<SubmitResponse, ClientError> {
        Ok(self
            .invoker
            .execute_cancellable(token, || self.send(document, signature))?)
    }

    /// Sends only if a permit is available right now.
    ///
    /// # Errors
    ///
    /// Additionally [`ClientError::Saturated`], in which case nothing was sent.
    pub fn try_create_document(
        &self,
        document: &Document,
        signature: &str,
    ) -> Result<SubmitResponse, ClientError> {
        Ok(self.invoker.try_execute(|| self.send(document, signature))?)
    }

    fn send(&self, document: &Document, signature: &str) -> Result<SubmitResponse, ClientError> {
        let body = serde_json::to_string(document)?;

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                doc_id = document.doc_id(),
                "Document submission rejected"
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(
            status = status.as_u16(),
            doc_id = document.doc_id(),
            "Document submitted"
        );
        Ok(SubmitResponse {
            status: status.as_u16(),
            body,
        })
    }
}
