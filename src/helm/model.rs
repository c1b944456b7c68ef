use async_trait::async_trait;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ReleaseName(pub String);

impl Display for ReleaseName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kinds with a readiness rule. Everything else is ready as soon as it is reported.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResourceKind {
    Job,
    PersistentVolumeClaim,
    Deployment,
    Other,
}

impl ResourceKind {
    pub fn from_simple_type(simple_type: &str) -> ResourceKind {
        match simple_type {
            "Job" => ResourceKind::Job,
            "PersistentVolumeClaim" => ResourceKind::PersistentVolumeClaim,
            "Deployment" => ResourceKind::Deployment,
            _ => ResourceKind::Other,
        }
    }
}

/// Single row of a release status report.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    /// API type as reported, e.g. `v1/Service`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// `resource_type` without the API group, e.g. `Service`.
    pub simple_type: String,
    pub is_ready: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_to_date: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successful: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "- {} ({})", self.name, self.resource_type)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Error getting status from {command}: {reason}\n{diagnostics}")]
pub struct FetchFailed {
    pub command: String,
    pub reason: String,
    pub diagnostics: String,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("Malformed {resource_type} row. Column {column} is not a number: {line:?}")]
pub struct MalformedRow {
    pub resource_type: String,
    pub line: String,
    pub column: usize,
}

#[async_trait]
pub trait StatusFetcher {
    async fn fetch_status(&self, release: &ReleaseName) -> Result<String, FetchFailed>;
}
