use std::time::Duration;

use super::RevocationError;

/// Fetches hosted status list credentials over HTTP with a hard timeout, so
/// an unreachable status host cannot stall verification indefinitely.
pub(crate) struct StatusListResolver {
    client: reqwest::Client,
    timeout: Duration,
}

impl StatusListResolver {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Returns the hosted status list credential in its signed JWT form.
    pub async fn fetch(&self, url: &str) -> Result<String, RevocationError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RevocationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RevocationError::Transport(format!(
                "status list fetch failed with status {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| RevocationError::Transport(e.to_string()))
    }
}
