//! JSON-over-HTTP seam used by the network tools.

use std::time::Duration;

use rcommon::BoxFuture;
use reqwest::{Client, StatusCode};
use rtooling::ToolError;
use serde_json::Value;

pub trait JsonFetcher: Send + Sync + std::fmt::Debug {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Value, ToolError>>;
}

#[derive(Debug, Clone)]
pub struct HttpJsonFetcher {
    client: Client,
}

impl HttpJsonFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client))
    }
}

/// 408, 429 and 5xx are worth another attempt; other statuses are final.
pub(crate) fn error_for_status(status: StatusCode, url: &str) -> ToolError {
    let message = format!("GET {url} returned {status}");
    if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        ToolError::transient(message)
    } else {
        ToolError::execution(message)
    }
}

impl JsonFetcher for HttpJsonFetcher {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await.map_err(|err| {
                if err.is_timeout() || err.is_connect() {
                    ToolError::transient(err.to_string())
                } else {
                    ToolError::execution(err.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(error_for_status(status, url));
            }

            response
                .json::<Value>()
                .await
                .map_err(|err| ToolError::execution(format!("invalid JSON from {url}: {err}")))
        })
    }
}
