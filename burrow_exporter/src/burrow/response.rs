use crate::burrow::Status;
use std::fmt::{Display, Formatter};

/// Outcome of fetching the lag status of one (cluster, group) pair.
#[derive(Debug)]
pub enum GroupLagResult {
    Lag(GroupLag),
    Failure(LagFetchError),
}

#[derive(Debug)]
pub struct GroupLag {
    pub cluster: String,
    pub requested_group: String,
    pub status: Status,
}

#[derive(Debug)]
pub struct LagFetchError {
    pub cluster: String,
    pub group: String,
    pub kind: LagFetchErrorKind,
    pub error: anyhow::Error,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LagFetchErrorKind {
    Transport,
    Decode,
    Upstream,
    MissingStatus,
}

impl Display for LagFetchErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            LagFetchErrorKind::Transport => "transport",
            LagFetchErrorKind::Decode => "decode",
            LagFetchErrorKind::Upstream => "upstream",
            LagFetchErrorKind::MissingStatus => "missing_status",
        };

        write!(f, "{value}")
    }
}
