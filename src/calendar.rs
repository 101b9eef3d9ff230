//! The calendar HTTP transport (§6): `POST {base}/digest` and
//! `GET {base}/timestamp/{hex}`.
//!
//! [`CalendarClient`] is the abstract collaborator spec.md §1 calls out of
//! scope; [`ReqwestCalendarClient`] (behind the default `client` feature)
//! is this crate's ready-made implementation, grounded on
//! `verifier-rs/src/main.rs`'s `reqwest::get(...).await` request/response
//! shape, generalized from GET-and-decode-JSON to POST/GET-raw-bytes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::NetworkError;

/// Abstract calendar transport. [`crate::submit`] and [`crate::upgrade`]
/// only depend on this trait, never on a concrete HTTP stack.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// `POST {base_url}/digest` with `seed` as the raw body. Returns the
    /// response body (a bare-tree encoding).
    async fn post_digest(
        &self,
        base_url: &str,
        seed: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, NetworkError>;

    /// `GET {base_url}/timestamp/{hex(msg)}`. Returns the response body (a
    /// bare-tree encoding).
    async fn get_timestamp(
        &self,
        base_url: &str,
        msg: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, NetworkError>;
}

/// Default [`CalendarClient`] backed by `reqwest`.
#[cfg(feature = "client")]
#[derive(Debug, Default, Clone)]
pub struct ReqwestCalendarClient {
    client: reqwest::Client,
}

#[cfg(feature = "client")]
impl ReqwestCalendarClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn handle_response(url: String, resp: reqwest::Response) -> Result<Vec<u8>, NetworkError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NetworkError::HttpStatus {
                url,
                status: status.as_u16(),
                body,
            });
        }
        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|err| NetworkError::Transport {
                url,
                source: Box::new(err),
            })
    }
}

#[cfg(feature = "client")]
#[async_trait]
impl CalendarClient for ReqwestCalendarClient {
    async fn post_digest(
        &self,
        base_url: &str,
        seed: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, NetworkError> {
        let url = format!("{}/digest", base_url.trim_end_matches('/'));
        log::info!("POST {url}");
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/octet-stream")
            .body(seed.to_vec())
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| map_send_error(url.clone(), timeout, err))?;
        Self::handle_response(url, resp).await
    }

    async fn get_timestamp(
        &self,
        base_url: &str,
        msg: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, NetworkError> {
        let url = format!(
            "{}/timestamp/{}",
            base_url.trim_end_matches('/'),
            hex::encode(msg)
        );
        log::info!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| map_send_error(url.clone(), timeout, err))?;
        Self::handle_response(url, resp).await
    }
}

#[cfg(feature = "client")]
fn map_send_error(url: String, timeout: Duration, err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout {
            url,
            timeout_secs: timeout.as_secs(),
        }
    } else {
        NetworkError::Transport {
            url,
            source: Box::new(err),
        }
    }
}
