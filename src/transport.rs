//! The single seam between [`crate::Client`] and the network.
//!
//! [`HttpTransport`] is what the binary uses. Tests hand the client their own
//! [`Transport`] that answers from canned bodies.

use crate::config::ClientConfig;
use crate::error::ApiError;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;

/// Status and raw body of one GET. Classification of the status is the client's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    /// Issue one GET. Only failures to obtain a response at all are errors here.
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, ApiError> {
        (**self).get(url, query)
    }
}

/// Blocking reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: HttpClient,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(Policy::limited(5))
            .user_agent(concat!("ons_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::transport(&config.base_url, e))?;
        Ok(Self { http })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default()).expect("reqwest client build")
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, ApiError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .map_err(|e| ApiError::transport(url, describe(&e)))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| ApiError::transport(url, describe(&e)))?;
        Ok(HttpResponse { status, body })
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}
