use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

/// Cluster name to the consumer groups watched in it, as declared in the config file.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClusterGroupMap {
    clusters: HashMap<String, Vec<String>>,
}

impl ClusterGroupMap {
    pub fn from_json_str(json: &str) -> Result<Self, anyhow::Error> {
        let clusters = serde_json::from_str::<HashMap<String, Vec<String>>>(json)
            .context("While parsing cluster groups, expected an object of string arrays")?;

        Ok(Self { clusters })
    }

    #[cfg(test)]
    fn groups(&self, cluster: &str) -> Option<&[String]> {
        self.clusters.get(cluster).map(Vec::as_slice)
    }

    /// Every (cluster, group) pair. Cluster order is unspecified, group order follows the file.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.clusters.iter().flat_map(|(cluster, groups)| {
            groups
                .iter()
                .map(move |group| (cluster.as_str(), group.as_str()))
        })
    }

    pub fn clusters_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn pairs_count(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs_count() == 0
    }
}

pub async fn load_cluster_groups(path: impl AsRef<Path>) -> Result<ClusterGroupMap, anyhow::Error> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("While reading cluster config file {}", path.display()))?;

    ClusterGroupMap::from_json_str(&content)
        .with_context(|| format!("While loading cluster config file {}", path.display()))
}
