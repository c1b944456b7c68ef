use async_trait::async_trait;
use std::collections::HashMap;

use crate::helm::model::{FetchFailed, ReleaseName, StatusFetcher};

#[derive(Clone, Debug)]
pub struct Config {
    pub envs: HashMap<String, String>,
    pub command: String,
    pub args: Vec<String>,
}

/// Reads the release status by running an external command, `helm status <release>` by default.
/// The release name is appended after the configured arguments.
pub struct CommandBased {
    config: Config,
}

impl CommandBased {
    pub fn new(config: Config) -> CommandBased {
        CommandBased { config }
    }

    fn failed(&self, reason: String, diagnostics: String) -> FetchFailed {
        FetchFailed {
            command: self.config.command.clone(),
            reason,
            diagnostics,
        }
    }
}

#[async_trait]
impl StatusFetcher for CommandBased {
    async fn fetch_status(&self, release: &ReleaseName) -> Result<String, FetchFailed> {
        let output = async_process::Command::new(&self.config.command)
            .args(&self.config.args)
            .arg(&release.0)
            .envs(&self.config.envs)
            .output()
            .await
            .map_err(|e| self.failed(e.to_string(), String::new()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(self.failed(output.status.to_string(), stderr));
        }

        String::from_utf8(output.stdout).map_err(|e| self.failed(e.to_string(), String::new()))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> CommandBased {
        CommandBased::new(Config {
            envs: HashMap::from([("GREETING".to_owned(), "hello".to_owned())]),
            command: "sh".to_owned(),
            args: vec!["-c".to_owned(), script.to_owned(), "sh".to_owned()],
        })
    }

    #[tokio::test]
    async fn captures_stdout_with_release_as_last_argument() {
        let fetcher = shell(r#"echo "$GREETING $1""#);

        let status = fetcher
            .fetch_status(&ReleaseName("my-release".to_owned()))
            .await
            .unwrap();

        assert_eq!(status, "hello my-release\n");
    }

    #[tokio::test]
    async fn non_zero_exit_carries_stderr() {
        let fetcher = shell("echo 'release: not found' >&2; exit 3");

        let failure = fetcher
            .fetch_status(&ReleaseName("missing".to_owned()))
            .await
            .unwrap_err();

        assert_eq!(failure.command, "sh");
        assert_eq!(failure.diagnostics, "release: not found\n");
        assert!(failure.to_string().starts_with("Error getting status from sh:"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_fetch_failure() {
        let fetcher = CommandBased::new(Config {
            envs: HashMap::new(),
            command: "this-binary-does-not-exist-anywhere".to_owned(),
            args: vec!["status".to_owned()],
        });

        let failure = fetcher
            .fetch_status(&ReleaseName("any".to_owned()))
            .await
            .unwrap_err();

        assert_eq!(failure.command, "this-binary-does-not-exist-anywhere");
        assert!(failure.diagnostics.is_empty());
    }
}
