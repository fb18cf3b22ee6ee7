use crate::burrow::{BurrowClient, GroupLagResult};
use crate::collector::{MetricDescriptor, MetricSample, MAX_LAG_DESCRIPTOR, TOTAL_LAG_DESCRIPTOR};
use crate::config_store::ClusterGroupMap;
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info_span, warn, Instrument};

#[derive(Debug, Clone, Copy)]
pub struct CollectorSettings {
    pub max_concurrent_requests: usize,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 4,
        }
    }
}

/// Turns the Burrow lag status of every configured consumer group into gauge samples.
///
/// Each collection pass is independent: nothing is cached between passes and
/// concurrent passes share only the read-only cluster map and http client.
#[derive(Debug)]
pub struct Collector {
    cluster_groups: Arc<ClusterGroupMap>,
    client: Arc<BurrowClient>,
    settings: CollectorSettings,
    max_lag: MetricDescriptor,
    total_lag: MetricDescriptor,
}

impl Collector {
    pub fn new(
        cluster_groups: ClusterGroupMap,
        client: BurrowClient,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            cluster_groups: Arc::new(cluster_groups),
            client: Arc::new(client),
            settings,
            max_lag: MAX_LAG_DESCRIPTOR,
            total_lag: TOTAL_LAG_DESCRIPTOR,
        }
    }

    pub fn describe(&self) -> [&MetricDescriptor; 2] {
        [&self.max_lag, &self.total_lag]
    }

    /// Fetches every (cluster, group) pair and sends the resulting samples to `sink`.
    ///
    /// A failing pair is logged and contributes no samples, the rest of the pass goes on.
    /// Returns once every pair has been handled. The sink has to be drained concurrently
    /// when the pass may produce more samples than its capacity.
    #[tracing::instrument(skip_all)]
    pub async fn collect(&self, sink: &Sender<MetricSample>) {
        let permits = self
            .settings
            .max_concurrent_requests
            .clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut tasks = JoinSet::new();

        debug!(
            "Collecting lag for {} groups in {} clusters",
            self.cluster_groups.pairs_count(),
            self.cluster_groups.clusters_count()
        );

        for (cluster, group) in self.cluster_groups.pairs() {
            let client = self.client.clone();
            let semaphore = semaphore.clone();
            let sink = sink.clone();
            let cluster = cluster.to_owned();
            let group = group.to_owned();

            let span = info_span!("Collecting group lag", cluster = %cluster, group = %group);
            let future = async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let result = client.fetch_group_lag(&cluster, &group).await;
                send_group_lag_result(result, &sink).await;
            };

            tasks.spawn(future.instrument(span));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!("Group lag collection task failed: {e:?}");
            }
        }
    }

    /// Runs [`Collector::collect`] in the background. The receiver ends once the pass is complete.
    pub fn collect_to_channel(self: Arc<Self>) -> Receiver<MetricSample> {
        let (tx, rx) = tokio::sync::mpsc::channel(128);

        tokio::task::spawn(async move { self.collect(&tx).await });

        rx
    }
}

async fn send_group_lag_result(result: GroupLagResult, sink: &Sender<MetricSample>) {
    match result {
        GroupLagResult::Lag(lag) => {
            for sample in lag.samples() {
                if sink.send(sample).await.is_err() {
                    debug!("Sample receiver dropped, skipping group {}", lag.requested_group);
                    return;
                }
            }
        }
        GroupLagResult::Failure(failure) => {
            warn!(
                cluster = %failure.cluster,
                group = %failure.group,
                kind = %failure.kind,
                "Cannot retrieve information for group {}: {:?}",
                failure.group,
                failure.error
            );
        }
    }
}
