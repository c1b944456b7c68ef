use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::helm::command as command_fetcher;
use crate::poller::DEFAULT_TIMEOUT;

#[derive(clap::Parser, Debug)]
#[command(version, about = "Waits until every resource of a helm release is ready", long_about = None)]
pub struct Args {
    /// Release to wait for
    pub release: String,
    /// Timeout in whole seconds. Falls back to 300 when absent or not a positive number
    #[arg(allow_negative_numbers = true)]
    pub timeout: Option<String>,
    /// YAML file describing the status command
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Print the parsed resources once and exit instead of waiting
    #[arg(long)]
    pub dump: bool,
}

impl Args {
    pub fn timeout(&self) -> Duration {
        parse_timeout(self.timeout.as_deref())
    }
}

fn parse_timeout(raw: Option<&str>) -> Duration {
    raw.and_then(|seconds| seconds.trim().parse::<u64>().ok())
        .filter(|seconds| *seconds > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT)
}

// YAML specific configuration

#[derive(Debug, PartialEq, serde::Deserialize)]
pub struct StatusCommandConfig {
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default = "HashMap::new")]
    pub envs: HashMap<String, String>,
}

fn default_command() -> String {
    "helm".to_owned()
}

fn default_args() -> Vec<String> {
    vec!["status".to_owned()]
}

impl Default for StatusCommandConfig {
    fn default() -> Self {
        StatusCommandConfig {
            command: default_command(),
            args: default_args(),
            envs: HashMap::new(),
        }
    }
}

impl From<StatusCommandConfig> for command_fetcher::Config {
    fn from(value: StatusCommandConfig) -> Self {
        command_fetcher::Config {
            envs: value.envs,
            command: value.command,
            args: value.args,
        }
    }
}

pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> anyhow::Result<StatusCommandConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml(&content)
}

fn parse_yaml(content: &str) -> anyhow::Result<StatusCommandConfig> {
    // Workaround for merge anchors.
    // https://github.com/dtolnay/serde-yaml/issues/317
    let mut yaml_value: serde_yaml::Value = serde_yaml::from_str(content)?;
    yaml_value.apply_merge()?;
    Ok(serde_yaml::from_value(yaml_value)?)
}
