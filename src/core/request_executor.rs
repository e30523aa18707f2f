use std::time::{Duration, Instant, SystemTime};

use anyhow::Context;
use reqwest::Client;

use crate::models::outcome::Outcome;

/// Issues single GET requests against the target and times them.
pub struct RequestExecutor {
    client: Client,
    url: String,
}

impl RequestExecutor {
    pub fn new(url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build http client")?;
        Ok(RequestExecutor {
            client,
            url: url.to_string(),
        })
    }

    /// One GET against the target. Transport failures (timeout, refused,
    /// DNS) come back as the 0-status sentinel; this never fails the caller.
    /// The duration covers request start to response or failure, including
    /// a fired timeout.
    pub async fn execute(&self) -> Outcome {
        let start = Instant::now();
        let result = self.client.get(&self.url).send().await;
        let duration = start.elapsed();

        let status = match result {
            Ok(response) => {
                let status = response.status().as_u16();
                // Drain the body so the connection can be reused; the
                // content itself is not inspected.
                let _ = response.bytes().await;
                status
            }
            Err(e) => e.status().map_or(Outcome::ERROR_STATUS, u16::from),
        };

        Outcome {
            status,
            duration,
            completed_at: SystemTime::now(),
        }
    }
}
