use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::helm::model::{FetchFailed, ReleaseName, StatusFetcher};

/// Replays the given reports one per call. The last one is repeated forever.
pub struct Scripted {
    reports: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<ReleaseName>>,
}

impl Scripted {
    pub fn new<I, S>(reports: I) -> Scripted
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scripted {
            reports: Mutex::new(reports.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ReleaseName> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusFetcher for Scripted {
    async fn fetch_status(&self, release: &ReleaseName) -> Result<String, FetchFailed> {
        self.calls.lock().unwrap().push(release.clone());
        let mut reports = self.reports.lock().unwrap();
        let report = if reports.len() > 1 {
            reports.pop_front()
        } else {
            reports.front().cloned()
        };
        Ok(report.unwrap_or_default())
    }
}

pub struct AlwaysFail;

#[async_trait]
impl StatusFetcher for AlwaysFail {
    async fn fetch_status(&self, release: &ReleaseName) -> Result<String, FetchFailed> {
        Err(FetchFailed {
            command: "helm".to_owned(),
            reason: "exit status: 1".to_owned(),
            diagnostics: format!("Error: release: \"{release}\" not found"),
        })
    }
}
