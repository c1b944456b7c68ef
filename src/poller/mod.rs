pub mod display;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::helm::model::{FetchFailed, MalformedRow, ReleaseName, Resource, StatusFetcher};
use crate::helm::parser;
use crate::poller::display::ProgressDisplay;

pub type PollerStatusFetcher = Arc<dyn StatusFetcher + Send + Sync + 'static>;

pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Fetch(#[from] FetchFailed),
    #[error(transparent)]
    Malformed(#[from] MalformedRow),
    #[error("Rendering progress failed. Reason: {0}")]
    Render(#[from] std::io::Error),
}

#[derive(Debug, Eq, PartialEq)]
pub enum PollOutcome {
    Succeeded,
    TimedOut,
}

pub struct Config {
    pub interval: Duration,
    pub timeout: Duration,
}

/// ReadinessPoller asks for a fresh status report until every resource of the release is ready.
/// Only one fetch is in flight at a time. The deadline is checked after each pause, so a fetch
/// running when the timeout passes is always allowed to finish.
pub struct ReadinessPoller<W: Write> {
    fetcher: PollerStatusFetcher,
    config: Config,
    display: ProgressDisplay<W>,
}

impl<W: Write> ReadinessPoller<W> {
    pub fn new(fetcher: PollerStatusFetcher, config: Config, out: W) -> ReadinessPoller<W> {
        ReadinessPoller {
            fetcher,
            config,
            display: ProgressDisplay::new(out),
        }
    }

    pub async fn wait_until_ready(
        &mut self,
        release: &ReleaseName,
    ) -> Result<PollOutcome, PollError> {
        let started = Instant::now();
        let deadline = started + self.config.timeout;

        loop {
            let report = self.fetcher.fetch_status(release).await?;
            let resources = parser::parse(&report)?;
            let not_ready: Vec<&Resource> = resources.iter().filter(|r| !r.is_ready).collect();
            debug!(
                %release,
                resources = resources.len(),
                not_ready = not_ready.len(),
                "Polled release status"
            );

            if not_ready.is_empty() {
                info!(%release, elapsed = ?started.elapsed(), "Release is ready");
                return Ok(PollOutcome::Succeeded);
            }

            self.display.render(started.elapsed(), &not_ready)?;
            tokio::time::sleep(self.config.interval).await;

            if Instant::now() >= deadline {
                warn!(%release, timeout = ?self.config.timeout, "Release did not become ready in time");
                return Ok(PollOutcome::TimedOut);
            }
        }
    }
}
