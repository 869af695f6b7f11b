use serde::Deserialize;

use crate::orchestrator::Strategy;

/// Config compiled into the binary; used when CONFIG_FILE is not set.
pub const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub aws: AwsConfig,
    pub target: TargetConfig,
    pub orchestrator: OrchestratorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom CloudWatch endpoint (e.g. a local emulator).
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_region() -> String {
    "eu-west-2".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_dimension_name")]
    pub dimension_name: String,
    pub resource_group: String,
    /// Trailing window ending at invocation time.
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    #[serde(default = "default_period_secs")]
    pub period_secs: i32,
}

fn default_namespace() -> String {
    "AWS/EC2".into()
}

fn default_dimension_name() -> String {
    "AutoScalingGroupName".into()
}

fn default_window_hours() -> u32 {
    72
}

fn default_period_secs() -> i32 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    pub strategy: Strategy,
    /// Abandon unfinished pipelines after this long. None: rely on the runtime's own timeout.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_path(&path),
            Err(_) => Self::load_from_str(DEFAULT_CONFIG),
        }
    }

    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read config {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.aws.region.is_empty(), "aws.region must be non-empty");
        if let Some(url) = &self.aws.endpoint_url {
            anyhow::ensure!(!url.is_empty(), "aws.endpoint_url must be non-empty when set");
        }
        anyhow::ensure!(
            !self.target.namespace.is_empty(),
            "target.namespace must be non-empty"
        );
        anyhow::ensure!(
            !self.target.dimension_name.is_empty(),
            "target.dimension_name must be non-empty"
        );
        anyhow::ensure!(
            !self.target.resource_group.is_empty(),
            "target.resource_group must be non-empty"
        );
        anyhow::ensure!(
            self.target.period_secs > 0 && self.target.period_secs % 60 == 0,
            "target.period_secs must be a positive multiple of 60, got {}",
            self.target.period_secs
        );
        anyhow::ensure!(
            self.target.window_hours > 0
                && u64::from(self.target.window_hours) * 3600 > self.target.period_secs as u64,
            "target.window_hours must be > 0 and longer than one period, got {}",
            self.target.window_hours
        );
        if let Some(deadline_ms) = self.orchestrator.deadline_ms {
            anyhow::ensure!(
                deadline_ms > 0,
                "orchestrator.deadline_ms must be > 0 when set, got {}",
                deadline_ms
            );
        }
        Ok(())
    }
}
