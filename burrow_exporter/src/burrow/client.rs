use crate::burrow::{GroupLag, GroupLagResult, LagFetchError, LagFetchErrorKind, StatusResponse};
use anyhow::{anyhow, Context};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the Burrow v2 consumer lag endpoint.
#[derive(Debug, Clone)]
pub struct BurrowClient {
    endpoint: String,
    base_url: Url,
    http: reqwest::Client,
}

impl BurrowClient {
    /// `endpoint` is a `host:port` pair, optionally followed by a path prefix.
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self, anyhow::Error> {
        let base_url = Url::parse(&format!("http://{}/", endpoint.trim_end_matches('/')))
            .with_context(|| format!("While parsing burrow endpoint '{endpoint}'"))?;

        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Burrow endpoint '{endpoint}' can't be used as a base url"));
        }

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("While building burrow http client")?;

        Ok(Self {
            endpoint: endpoint.to_owned(),
            base_url,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn lag_url(&self, cluster: &str, group: &str) -> Result<Url, anyhow::Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Burrow endpoint '{}' can't be used as a base url", self.endpoint))?
            .pop_if_empty()
            .extend(["v2", "kafka", cluster, "consumer", group, "lag"]);

        Ok(url)
    }

    pub async fn fetch_group_lag(&self, cluster: &str, group: &str) -> GroupLagResult {
        match self.try_fetch_group_lag(cluster, group).await {
            Ok(lag) => GroupLagResult::Lag(lag),
            Err((kind, error)) => GroupLagResult::Failure(LagFetchError {
                cluster: cluster.to_owned(),
                group: group.to_owned(),
                kind,
                error,
            }),
        }
    }

    async fn try_fetch_group_lag(
        &self,
        cluster: &str,
        group: &str,
    ) -> Result<GroupLag, (LagFetchErrorKind, anyhow::Error)> {
        let url = self
            .lag_url(cluster, group)
            .map_err(|e| (LagFetchErrorKind::Transport, e))?;

        debug!("Requesting lag status from {url}");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("While requesting {url}"))
            .map_err(|e| (LagFetchErrorKind::Transport, e))?;

        let http_status = response.status();

        // The body is always drained so the connection goes back to the pool.
        let body = response
            .bytes()
            .await
            .with_context(|| format!("While reading response body from {url}"))
            .map_err(|e| (LagFetchErrorKind::Transport, e))?;

        let response = serde_json::from_slice::<StatusResponse>(&body)
            .with_context(|| format!("While decoding response from {url}, http status {http_status}"))
            .map_err(|e| (LagFetchErrorKind::Decode, e))?;

        if response.error {
            return Err((
                LagFetchErrorKind::Upstream,
                anyhow!("Burrow returned an error for group '{group}': {}", response.message),
            ));
        }

        let Some(status) = response.status else {
            return Err((
                LagFetchErrorKind::MissingStatus,
                anyhow!("Response from {url} has no recognizable status, http status {http_status}"),
            ));
        };

        debug!(
            "Got lag status for group {group} in cluster {cluster}: total lag {}",
            status.totallag
        );

        Ok(GroupLag {
            cluster: cluster.to_owned(),
            requested_group: group.to_owned(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_lag_url() {
        let client = BurrowClient::new("127.0.0.1:8080", Duration::from_secs(1)).unwrap();

        let url = client.lag_url("clusterA", "group1").unwrap();

        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/v2/kafka/clusterA/consumer/group1/lag"
        );
    }

    #[test]
    fn keeps_endpoint_path_prefix() {
        let client = BurrowClient::new("burrow.local:8000/burrow/", Duration::from_secs(1)).unwrap();

        let url = client.lag_url("c1", "g1").unwrap();

        assert_eq!(
            url.as_str(),
            "http://burrow.local:8000/burrow/v2/kafka/c1/consumer/g1/lag"
        );
    }

    #[test]
    fn escapes_path_segments() {
        let client = BurrowClient::new("localhost:8080", Duration::from_secs(1)).unwrap();

        let url = client.lag_url("c1", "team/orders group").unwrap();

        assert_eq!(
            url.path(),
            "/v2/kafka/c1/consumer/team%2Forders%20group/lag"
        );
    }

    #[test]
    fn rejects_invalid_endpoint() {
        assert!(BurrowClient::new("bad host:port", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn unreachable_burrow_is_a_transport_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let client = BurrowClient::new(&address.to_string(), Duration::from_secs(2)).unwrap();

        match client.fetch_group_lag("c1", "g1").await {
            GroupLagResult::Failure(failure) => {
                assert_eq!(failure.kind, LagFetchErrorKind::Transport);
                assert_eq!(failure.group, "g1");
                assert_eq!(failure.cluster, "c1");
            }
            GroupLagResult::Lag(lag) => panic!("Expected failure, got {lag:?}"),
        }
    }
}
