mod configuration;
mod helm;
mod poller;

use clap::Parser;
use std::sync::Arc;
use tracing::info;

use crate::helm::command::CommandBased;
use crate::helm::model::{ReleaseName, StatusFetcher};
use crate::helm::parser;
use crate::poller::{PollOutcome, PollerStatusFetcher, ReadinessPoller, POLL_INTERVAL};

const TIMEOUT_EXIT_CODE: i32 = 55;

pub fn init_log() {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
    // stdout belongs to the progress display.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("WAIT_FOR_RELEASE_LOG")
                .from_env_lossy(),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_log();
    let args = configuration::Args::parse();

    let command_config = match &args.config {
        Some(path) => configuration::load_from_yaml(path)?,
        None => configuration::StatusCommandConfig::default(),
    };
    let fetcher: PollerStatusFetcher = Arc::new(CommandBased::new(command_config.into()));
    let release = ReleaseName(args.release.clone());

    if args.dump {
        print!("{}", dump(fetcher, &release).await?);
        return Ok(());
    }

    let timeout = args.timeout();
    info!(%release, ?timeout, "Waiting for release to become ready");

    let config = poller::Config {
        interval: POLL_INTERVAL,
        timeout,
    };
    let mut poller = ReadinessPoller::new(fetcher, config, std::io::stdout());
    match poller.wait_until_ready(&release).await? {
        PollOutcome::Succeeded => Ok(()),
        PollOutcome::TimedOut => {
            println!("Timeout expired while waiting for {release} to become ready, aborting.");
            std::process::exit(TIMEOUT_EXIT_CODE)
        }
    }
}

/// Fetches the status once and renders the parsed resources as YAML.
async fn dump(fetcher: PollerStatusFetcher, release: &ReleaseName) -> anyhow::Result<String> {
    let report = fetcher.fetch_status(release).await?;
    let resources = parser::parse(&report)?;
    Ok(serde_yaml::to_string(&resources)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helm::stubs::{AlwaysFail, Scripted};

    const BASIC: &str = include_str!("helm/fixtures/basic.txt");

    fn release() -> ReleaseName {
        ReleaseName("cit".to_owned())
    }

    #[tokio::test]
    async fn dump_uses_report_field_names() {
        let yaml = dump(Arc::new(Scripted::new([BASIC])), &release())
            .await
            .unwrap();
        let resources: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        let service = &resources[1];
        assert_eq!(service["name"].as_str(), Some("cit-nginx"));
        assert_eq!(service["type"].as_str(), Some("v1/Service"));
        assert_eq!(service["simpleType"].as_str(), Some("Service"));
        assert_eq!(service["isReady"].as_bool(), Some(true));
        assert!(service.get("desired").is_none());
        assert!(service.get("volume").is_none());

        let deployment = &resources[2];
        assert_eq!(deployment["desired"].as_u64(), Some(1));
        assert_eq!(deployment["upToDate"].as_u64(), Some(1));
        assert_eq!(deployment["available"].as_u64(), Some(1));
        assert!(deployment.get("up_to_date").is_none());
        assert!(deployment.get("successful").is_none());
    }

    #[tokio::test]
    async fn dump_of_release_without_resources_is_empty_list() {
        let yaml = dump(Arc::new(Scripted::new([""])), &release()).await.unwrap();

        assert_eq!(yaml.trim(), "[]");
    }

    #[tokio::test]
    async fn dump_propagates_fetch_failure() {
        let error = dump(Arc::new(AlwaysFail), &release()).await.unwrap_err();

        assert!(error.to_string().starts_with("Error getting status from helm:"));
    }
}
