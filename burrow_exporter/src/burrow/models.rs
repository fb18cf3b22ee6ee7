use serde::{Deserialize, Deserializer};

// Burrow answers with lowercase keys, older builds and hand-written fixtures use capitalised ones.

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusResponse {
    #[serde(rename = "error", alias = "Error")]
    pub error: bool,
    #[serde(rename = "message", alias = "Message", deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(rename = "status", alias = "Status")]
    pub status: Option<Status>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Status {
    #[serde(rename = "cluster", alias = "Cluster", deserialize_with = "null_as_default")]
    pub cluster: String,
    #[serde(rename = "group", alias = "Group", deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(rename = "status", alias = "Status", deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "complete", alias = "Complete", deserialize_with = "completeness")]
    pub complete: bool,
    #[serde(rename = "maxlag", alias = "Maxlag", alias = "MaxLag")]
    pub maxlag: Option<Lag>,
    #[serde(rename = "partitions", alias = "Partitions", deserialize_with = "null_as_default")]
    pub partitions: Vec<Lag>,
    #[serde(rename = "totallag", alias = "Totallag", alias = "TotalLag")]
    pub totallag: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Lag {
    #[serde(rename = "topic", alias = "Topic", deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(rename = "partition", alias = "Partition")]
    pub partition: i32,
    #[serde(rename = "status", alias = "Status", deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "start", alias = "Start")]
    pub start: Option<Partition>,
    #[serde(rename = "end", alias = "End")]
    pub end: Option<Partition>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Partition {
    #[serde(rename = "offset", alias = "Offset")]
    pub offset: i64,
    #[serde(rename = "timestamp", alias = "Timestamp")]
    pub timestamp: i64,
    #[serde(rename = "lag", alias = "Lag")]
    pub lag: i64,
}

impl Status {
    /// Lag of the worst partition at the end of the evaluation window, zero when absent.
    pub fn max_lag(&self) -> i64 {
        self.maxlag
            .as_ref()
            .and_then(|lag| lag.end)
            .map(|end| end.lag)
            .unwrap_or_default()
    }

    pub fn max_lag_topic(&self) -> &str {
        self.maxlag
            .as_ref()
            .map(|lag| lag.topic.as_str())
            .unwrap_or_default()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCompleteness {
    Flag(bool),
    Ratio(f64),
}

// Newer Burrow releases report completeness as a ratio in 0..=1.
fn completeness<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let complete = match Option::<RawCompleteness>::deserialize(deserializer)? {
        None => false,
        Some(RawCompleteness::Flag(flag)) => flag,
        Some(RawCompleteness::Ratio(ratio)) => ratio >= 1.0,
    };

    Ok(complete)
}
