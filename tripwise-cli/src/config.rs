use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tripwise_model::{DEFAULT_RETRYABLE_STATUS_CODES, RetryPolicy};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Application settings loaded from TOML. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub identity: IdentityConfig,
    pub model: ModelConfig,
    pub retry: RetryConfig,
    pub session: SessionConfig,
}

/// Which session a run belongs to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            app_name: "travel_agent".to_string(),
            user_id: "usertravel1".to_string(),
            session_id: "1002".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub name: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { name: DEFAULT_MODEL.to_string(), base_url: None, timeout_secs: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub attempts: u32,
    pub exp_base: f64,
    pub initial_delay_secs: f64,
    pub max_delay_secs: Option<f64>,
    pub http_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            exp_base: 7.0,
            initial_delay_secs: 1.0,
            max_delay_secs: None,
            http_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.to_vec(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        let initial = Duration::try_from_secs_f64(self.initial_delay_secs)
            .with_context(|| format!("invalid retry initial_delay_secs {}", self.initial_delay_secs))?;
        let mut policy = RetryPolicy::default()
            .with_attempts(self.attempts)
            .with_exp_base(self.exp_base)
            .with_initial_delay(initial)
            .with_status_codes(self.http_status_codes.iter().copied());
        if let Some(max) = self.max_delay_secs {
            let max = Duration::try_from_secs_f64(max)
                .with_context(|| format!("invalid retry max_delay_secs {max}"))?;
            policy = policy.with_max_delay(max);
        }
        policy.validate()?;
        Ok(policy)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// JSON file backing the session store. In-memory when unset.
    pub store: Option<PathBuf>,
}

impl AppConfig {
    /// `<config dir>/tripwise/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripwise").join("config.toml"))
    }

    /// Load from `path`, or from [`AppConfig::default_path`] when `None`.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading config {}", path.display()));
            }
        };

        let config = Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        let id = &self.identity;
        for (field, value) in
            [("app_name", &id.app_name), ("user_id", &id.user_id), ("session_id", &id.session_id)]
        {
            if value.trim().is_empty() {
                bail!("identity.{field} must not be empty");
            }
        }
        if self.model.name.trim().is_empty() {
            bail!("model.name must not be empty");
        }
        if self.model.timeout_secs == 0 {
            bail!("model.timeout_secs must be at least 1");
        }
        if self.retry.initial_delay_secs < 0.0 {
            bail!("retry.initial_delay_secs must not be negative");
        }
        self.retry.to_policy()?;
        Ok(())
    }

    /// Apply command-line identity overrides.
    pub fn with_identity(
        mut self,
        app_name: Option<String>,
        user_id: Option<String>,
        session_id: Option<String>,
    ) -> Self {
        if let Some(app_name) = app_name {
            self.identity.app_name = app_name;
        }
        if let Some(user_id) = user_id {
            self.identity.user_id = user_id;
        }
        if let Some(session_id) = session_id {
            self.identity.session_id = session_id;
        }
        self
    }
}

/// API key from `GOOGLE_API_KEY`, falling back to `GEMINI_API_KEY`.
pub fn api_key_from_env() -> Result<String> {
    std::env::var("GOOGLE_API_KEY")
        .or_else(|_| std::env::var("GEMINI_API_KEY"))
        .map_err(|_| anyhow::anyhow!("GOOGLE_API_KEY or GEMINI_API_KEY environment variable not set"))
}
