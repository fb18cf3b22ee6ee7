/// Static schema of one exported metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub label_names: &'static [&'static str],
}

pub const MAX_LAG_DESCRIPTOR: MetricDescriptor = MetricDescriptor {
    name: "kafka_max_lag",
    help: "Maximum lag",
    label_names: &["cluster", "topic", "group"],
};

pub const TOTAL_LAG_DESCRIPTOR: MetricDescriptor = MetricDescriptor {
    name: "kafka_total_lag",
    help: "Total lag of all partition for a specific group",
    label_names: &["cluster", "group"],
};
