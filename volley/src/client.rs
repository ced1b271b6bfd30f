//! client module performs the network operation behind every work unit

use crate::config::Config;
use crate::error::Result;
use crate::statistics::Outcome;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// the single operation a worker performs per work unit
#[async_trait]
pub trait Requester: Send + Sync {
    /// issue one request, every error is folded into [Outcome::Failed]
    async fn fetch(&self) -> Outcome;
}

/// [HttpRequester] sends a GET to a fixed url
pub struct HttpRequester {
    client: Client,
    url: String,
}

impl HttpRequester {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Self::build_client(config.timeout)?,
            url: config.url.clone(),
        })
    }

    fn build_client(timeout: Duration) -> Result<Client> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(client)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Requester for HttpRequester {
    async fn fetch(&self) -> Outcome {
        let response = match self.client.get(&self.url).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!("request to {} failed: {}", self.url, err);
                return Outcome::Failed;
            },
        };

        let status = response.status();
        // drain the body so the connection goes back to the pool
        if let Err(err) = response.bytes().await {
            debug!("reading body from {} failed: {}", self.url, err);
        }
        Outcome::Status(status)
    }
}
