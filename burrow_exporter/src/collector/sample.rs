use crate::burrow::GroupLag;
use crate::collector::{MetricDescriptor, MAX_LAG_DESCRIPTOR, TOTAL_LAG_DESCRIPTOR};

#[derive(Debug, Clone, PartialEq)]
pub enum MetricSample {
    MaxLag {
        cluster: String,
        topic: String,
        group: String,
        value: f64,
    },
    TotalLag {
        cluster: String,
        group: String,
        value: f64,
    },
}

impl MetricSample {
    pub fn descriptor(&self) -> &'static MetricDescriptor {
        match self {
            MetricSample::MaxLag { .. } => &MAX_LAG_DESCRIPTOR,
            MetricSample::TotalLag { .. } => &TOTAL_LAG_DESCRIPTOR,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn value(&self) -> f64 {
        match self {
            MetricSample::MaxLag { value, .. } | MetricSample::TotalLag { value, .. } => *value,
        }
    }

    /// Label values in the order of the descriptor's label names.
    pub fn label_values(&self) -> Vec<&str> {
        match self {
            MetricSample::MaxLag {
                cluster,
                topic,
                group,
                ..
            } => vec![cluster.as_str(), topic.as_str(), group.as_str()],
            MetricSample::TotalLag { cluster, group, .. } => vec![cluster.as_str(), group.as_str()],
        }
    }
}

impl GroupLag {
    /// Both gauges of a successful fetch. Group labels come from the response, like Burrow reports them.
    pub fn samples(&self) -> [MetricSample; 2] {
        let status = &self.status;
        [
            MetricSample::MaxLag {
                cluster: self.cluster.clone(),
                topic: status.max_lag_topic().to_owned(),
                group: status.group.clone(),
                value: status.max_lag() as f64,
            },
            MetricSample::TotalLag {
                cluster: self.cluster.clone(),
                group: status.group.clone(),
                value: status.totallag as f64,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burrow::{Lag, Partition, Status};

    fn group_lag() -> GroupLag {
        GroupLag {
            cluster: "c1".to_owned(),
            requested_group: "g1".to_owned(),
            status: Status {
                group: "g1".to_owned(),
                maxlag: Some(Lag {
                    topic: "t1".to_owned(),
                    end: Some(Partition {
                        offset: 10,
                        timestamp: 0,
                        lag: 42,
                    }),
                    ..Default::default()
                }),
                totallag: 100,
                ..Default::default()
            },
        }
    }

    #[test]
    fn maps_group_lag_to_two_samples() {
        let [max_lag, total_lag] = group_lag().samples();

        assert_eq!(max_lag.name(), "kafka_max_lag");
        assert_eq!(max_lag.label_values(), vec!["c1", "t1", "g1"]);
        assert_eq!(max_lag.value(), 42.0);

        assert_eq!(total_lag.name(), "kafka_total_lag");
        assert_eq!(total_lag.label_values(), vec!["c1", "g1"]);
        assert_eq!(total_lag.value(), 100.0);
    }

    #[test]
    fn label_values_match_descriptor_arity() {
        for sample in group_lag().samples() {
            assert_eq!(
                sample.label_values().len(),
                sample.descriptor().label_names.len()
            );
        }
    }

    #[test]
    fn missing_maxlag_reads_as_zero() {
        let mut lag = group_lag();
        lag.status.maxlag = None;

        let [max_lag, _] = lag.samples();

        assert_eq!(max_lag.value(), 0.0);
        assert_eq!(max_lag.label_values(), vec!["c1", "", "g1"]);
    }
}
