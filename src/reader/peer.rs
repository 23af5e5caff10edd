// src/reader/peer.rs — Peer service reads
//
// Network failure, timeout, and non-success status are all the same thing
// from the dashboard's point of view: the peer is unreachable this cycle.
// There are no retries; the timeout is the only cancellation mechanism.

use serde::de::DeserializeOwned;
use std::time::Duration;

/// Outcome of a bare reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The peer answered; carries the HTTP status code.
    Status(u16),
    /// Connect failure, timeout, or any other transport error.
    Unreachable,
}

/// Probe a peer URL, caring only about whether anything answers.
pub async fn probe(client: &reqwest::Client, url: &str, timeout: Duration) -> ProbeOutcome {
    match client.get(url).timeout(timeout).send().await {
        Ok(resp) => ProbeOutcome::Status(resp.status().as_u16()),
        Err(e) => {
            tracing::debug!("probe {url} failed: {e}");
            ProbeOutcome::Unreachable
        }
    }
}

/// GET a JSON document from a peer, optionally with a bearer credential.
///
/// Any failure along the way (transport, non-2xx, undecodable body)
/// collapses to `None`.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    timeout: Duration,
) -> Option<T> {
    let mut req = client.get(url).timeout(timeout);
    if let Some(token) = bearer {
        req = req.bearer_auth(token);
    }
    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("peer GET {url} failed: {e}");
            return None;
        }
    };
    if !resp.status().is_success() {
        tracing::debug!("peer GET {url} returned {}", resp.status());
        return None;
    }
    resp.json::<T>().await.ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on this port in the test environment; connects are
    // refused immediately, well inside the timeout.
    const DEAD_PEER: &str = "http://127.0.0.1:9";

    #[tokio::test]
    async fn test_probe_unreachable() {
        let client = reqwest::Client::new();
        let outcome = probe(&client, DEAD_PEER, Duration::from_secs(2)).await;
        assert_eq!(outcome, ProbeOutcome::Unreachable);
    }

    #[tokio::test]
    async fn test_get_json_unreachable_is_none() {
        let client = reqwest::Client::new();
        let got: Option<serde_json::Value> =
            get_json(&client, DEAD_PEER, Some("token"), Duration::from_secs(2)).await;
        assert_eq!(got, None);
    }
}
