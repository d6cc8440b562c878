// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PROD: &str = "prod";
pub const TEST: &str = "test";

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 << 20;
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Upstream {
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    pub max_body_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestHeader {
    pub name: String,
    pub value: String,
}

/// A single upstream subscription document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Subscribe {
    pub name: String,
    pub url: String,
}

/// Named bundle of subscriptions sharing request and forwarding policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscribeGroup {
    pub name: String,
    #[serde(default)]
    pub request_headers: Vec<RequestHeader>,
    #[serde(default)]
    pub pass_response_headers: Vec<String>,
    #[serde(default)]
    pub subscribes: Vec<Subscribe>,
}

/// Membership of a user in a group, naming the permitted subscriptions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSubscribeGroup {
    pub name: String,
    #[serde(default)]
    pub subscribes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub name: String,
    pub token: String,
    pub default_subscribe_group: Option<String>,
    #[serde(default)]
    pub subscribe_groups: Vec<UserSubscribeGroup>,
}

impl User {
    /// Returns the membership entry for the given group name.
    pub fn membership(&self, group: &str) -> Option<&UserSubscribeGroup> {
        self.subscribe_groups.iter().find(|g| g.name == group)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub env: Option<String>,
    pub logs: Option<Logs>,
    pub port: String,
    #[serde(default)]
    pub context_path: String,
    pub cache_dir: PathBuf,
    #[serde(default)]
    pub cors_origin: String,
    #[serde(default, with = "humantime_serde")]
    pub wait_timeout: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
    pub upstream: Option<Upstream>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub subscribe_groups: Vec<SubscribeGroup>,
    #[serde(skip)]
    users_by_token: HashMap<String, usize>,
    #[serde(skip)]
    groups_by_name: HashMap<String, usize>,
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::from_yaml(&data).with_context(|| format!("load config from {:?}", abs_path))
    }

    /// Parses, validates and indexes a YAML document.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.prepare()
    }

    /// Validates the raw configuration and builds the lookup indexes.
    pub fn prepare(mut self) -> Result<Self> {
        if self.port.trim().is_empty() {
            anyhow::bail!("invalid port: {:?}", self.port);
        }
        if self.cache_dir.as_os_str().is_empty() {
            anyhow::bail!("cache_dir must be configured");
        }

        // Longer inner waits would be cut off by the request timeout with a 408.
        let request_timeout = self.request_timeout();
        if self.wait_timeout() >= request_timeout {
            anyhow::bail!(
                "wait_timeout {:?} must be shorter than request_timeout {:?}",
                self.wait_timeout(),
                request_timeout
            );
        }
        if self.upstream_timeout() >= request_timeout {
            anyhow::bail!(
                "upstream.timeout {:?} must be shorter than request_timeout {:?}",
                self.upstream_timeout(),
                request_timeout
            );
        }

        self.context_path = normalize_context_path(&self.context_path);

        self.users_by_token.clear();
        for (idx, user) in self.users.iter().enumerate() {
            if user.token.is_empty() {
                anyhow::bail!("user {} has an empty token", user.name);
            }
            if self.users_by_token.insert(user.token.clone(), idx).is_some() {
                anyhow::bail!("duplicate token configured for user {}", user.name);
            }
        }

        self.groups_by_name.clear();
        for (idx, group) in self.subscribe_groups.iter().enumerate() {
            if self.groups_by_name.insert(group.name.clone(), idx).is_some() {
                anyhow::bail!("duplicate subscribe group {}", group.name);
            }
        }

        Ok(self)
    }

    pub fn is_prod(&self) -> bool {
        self.env.as_deref() == Some(PROD)
    }

    pub fn log_level(&self) -> &str {
        self.logs
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    /// Looks up a user by its access token.
    pub fn user_by_token(&self, token: &str) -> Option<&User> {
        self.users_by_token.get(token).map(|&idx| &self.users[idx])
    }

    /// Looks up a subscribe group by name.
    pub fn group(&self, name: &str) -> Option<&SubscribeGroup> {
        self.groups_by_name
            .get(name)
            .map(|&idx| &self.subscribe_groups[idx])
    }

    /// Parsed CORS origin list. Empty when CORS is not configured.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn upstream_timeout(&self) -> Duration {
        self.upstream
            .as_ref()
            .and_then(|u| u.timeout)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT)
    }

    pub fn max_body_size(&self) -> usize {
        self.upstream
            .as_ref()
            .and_then(|u| u.max_body_size)
            .unwrap_or(DEFAULT_MAX_BODY_SIZE)
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Joins the context path with a route suffix starting with '/'.
    pub fn route(&self, suffix: &str) -> String {
        format!("{}{}", self.context_path, suffix)
    }
}

/// Context path is either empty or "/segment[/segment...]" without a trailing slash.
fn normalize_context_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

mod test_config;
pub use test_config::new_test_config;
