//! Layered settings: `.env`, an optional `radiant.toml`, then `RADIANT_*`
//! environment variables.
//!
//! ```rust
//! use radiant::config::Settings;
//!
//! let settings = Settings::from_toml_str("model_id = \"gpt-4o\"\ntemperature = 0.2").unwrap();
//! assert_eq!(settings.model_id, "gpt-4o");
//! assert_eq!(settings.max_tokens, 500);
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use ragent::{AgentConfig, DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE};
use rcommon::GenerationOptions;
use rprovider::{RetryPolicy, SecretString};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "radiant";
pub const ENV_PREFIX: &str = "RADIANT";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("no LLM API key configured (set RADIANT_LLM_API_KEY)")]
    MissingApiKey,
}

impl SettingsError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,
    #[serde(default)]
    llm_api_key: Option<String>,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_retry_delay_ms")]
    pub initial_retry_delay_ms: u64,
    /// Cap on a single retry delay; unset means the doubling is never cut short.
    #[serde(default)]
    pub max_retry_delay_ms: Option<u64>,
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_binance_base_url")]
    pub binance_base_url: String,
    #[serde(default = "default_dexscreener_base_url")]
    pub dexscreener_base_url: String,
    #[serde(default = "default_monitor_poll_secs")]
    pub monitor_poll_secs: u64,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model_id() -> String {
    "gpt-4o-mini".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

const fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

const fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_retry_delay_ms() -> u64 {
    1_000
}

const fn default_tool_timeout_secs() -> u64 {
    30
}

const fn default_http_timeout_secs() -> u64 {
    15
}

fn default_binance_base_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_dexscreener_base_url() -> String {
    "https://api.dexscreener.com".to_string()
}

const fn default_monitor_poll_secs() -> u64 {
    30
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Settings {
    /// Loads `.env` (if any), `radiant.toml` from the working directory (if
    /// any), and `RADIANT_*` variables, later sources winning.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE), false)
    }

    /// Like [`Settings::load`] with an explicit config file path.
    pub fn load_from(path: &Path, required: bool) -> Result<Self, SettingsError> {
        let builder = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .ignore_empty(true),
            );
        Self::build(builder)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        Self::build(Config::builder().add_source(File::from_str(source, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.model_id.trim().is_empty() {
            return Err(SettingsError::invalid("model_id", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(SettingsError::invalid(
                "temperature",
                format!("{} is outside 0.0..=2.0", self.temperature),
            ));
        }
        if self.max_tokens == 0 {
            return Err(SettingsError::invalid("max_tokens", "must be positive"));
        }
        if self.max_retries == 0 {
            return Err(SettingsError::invalid("max_retries", "must be at least 1"));
        }
        if let Some(max_delay) = self.max_retry_delay_ms
            && max_delay < self.initial_retry_delay_ms
        {
            return Err(SettingsError::invalid(
                "max_retry_delay_ms",
                format!(
                    "{max_delay} is below initial_retry_delay_ms ({})",
                    self.initial_retry_delay_ms
                ),
            ));
        }
        for (field, secs) in [
            ("tool_timeout_secs", self.tool_timeout_secs),
            ("http_timeout_secs", self.http_timeout_secs),
            ("monitor_poll_secs", self.monitor_poll_secs),
        ] {
            if secs == 0 {
                return Err(SettingsError::invalid(field, "must be positive"));
            }
        }
        for (field, url) in [
            ("llm_base_url", &self.llm_base_url),
            ("binance_base_url", &self.binance_base_url),
            ("dexscreener_base_url", &self.dexscreener_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SettingsError::invalid(field, format!("`{url}` is not an http(s) URL")));
            }
        }
        Ok(())
    }

    pub fn api_key(&self) -> Result<SecretString, SettingsError> {
        match self.llm_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(SecretString::new(key)),
            _ => Err(SettingsError::MissingApiKey),
        }
    }

    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig::new(self.model_id.clone())
            .with_system_prompt(self.system_prompt.clone())
            .with_options(
                GenerationOptions::default()
                    .with_temperature(self.temperature)
                    .with_max_tokens(self.max_tokens),
            )
    }

    /// Backoff for the model call; also reused by the network tools. Without
    /// `max_retry_delay_ms` the cap is the last delay the budget can reach.
    pub fn retry_policy(&self) -> RetryPolicy {
        let initial = Duration::from_millis(self.initial_retry_delay_ms);
        let max = match self.max_retry_delay_ms {
            Some(max_delay) => Duration::from_millis(max_delay),
            None => {
                let doublings = self.max_retries.saturating_sub(2).min(31);
                initial.saturating_mul(1_u32 << doublings)
            }
        };

        RetryPolicy::new(self.max_retries)
            .with_initial_backoff(initial)
            .with_max_backoff(max)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn monitor_poll_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_poll_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm_base_url: default_llm_base_url(),
            llm_api_key: None,
            model_id: default_model_id(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_max_retries(),
            initial_retry_delay_ms: default_initial_retry_delay_ms(),
            max_retry_delay_ms: None,
            tool_timeout_secs: default_tool_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            binance_base_url: default_binance_base_url(),
            dexscreener_base_url: default_dexscreener_base_url(),
            monitor_poll_secs: default_monitor_poll_secs(),
            log_filter: default_log_filter(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model_id", &self.model_id)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("monitor_poll_secs", &self.monitor_poll_secs)
            .field("log_filter", &self.log_filter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Settings, SettingsError};

    #[test]
    fn empty_source_yields_documented_defaults() {
        let settings = Settings::from_toml_str("").expect("defaults should load");

        assert_eq!(settings.llm_base_url, "https://api.openai.com/v1");
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.max_tokens, 500);
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.monitor_poll_interval(), Duration::from_secs(30));
        assert_eq!(settings.log_filter, "info");

        let policy = settings.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_backoff, Duration::from_secs(1));
        assert_eq!(policy.max_backoff, Duration::from_secs(2));
    }

    #[test]
    fn toml_values_override_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            llm_base_url = "http://localhost:8080/v1"
            llm_api_key = "sk-local"
            model_id = "llama-3.1-8b"
            max_tokens = 128
            monitor_poll_secs = 5
            "#,
        )
        .expect("settings should load");

        assert_eq!(settings.llm_base_url, "http://localhost:8080/v1");
        assert_eq!(settings.model_id, "llama-3.1-8b");
        assert_eq!(settings.api_key().expect("key").expose(), "sk-local");

        let agent = settings.agent_config();
        assert_eq!(agent.model, "llama-3.1-8b");
        assert_eq!(agent.options.max_tokens, Some(128));
        assert_eq!(agent.options.temperature, Some(0.7));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let error = Settings::from_toml_str("temperature = 3.5").expect_err("should reject");
        assert!(matches!(
            error,
            SettingsError::Invalid {
                field: "temperature",
                ..
            }
        ));

        let error = Settings::from_toml_str("max_retries = 0").expect_err("should reject");
        assert!(matches!(
            error,
            SettingsError::Invalid {
                field: "max_retries",
                ..
            }
        ));

        let error = Settings::from_toml_str("binance_base_url = \"ftp://nope\"")
            .expect_err("should reject");
        assert!(error.to_string().contains("binance_base_url"));
    }

    #[test]
    fn long_initial_delay_keeps_doubling() {
        let settings =
            Settings::from_toml_str("initial_retry_delay_ms = 10000").expect("settings");
        let policy = settings.retry_policy();

        assert_eq!(policy.backoff_for_attempt(1), Duration::from_secs(10));
        assert_eq!(policy.backoff_for_attempt(2), Duration::from_secs(20));
        assert_eq!(policy.delay_after(2, true), Some(Duration::from_secs(20)));
        assert_eq!(policy.delay_after(3, true), None);
    }

    #[test]
    fn configured_retry_cap_bounds_each_delay() {
        let settings = Settings::from_toml_str(
            "max_retries = 5\ninitial_retry_delay_ms = 500\nmax_retry_delay_ms = 1500",
        )
        .expect("settings");
        let policy = settings.retry_policy();

        let delays = (1..5)
            .map(|attempt| policy.backoff_for_attempt(attempt))
            .collect::<Vec<_>>();
        assert_eq!(delays, [500, 1000, 1500, 1500].map(Duration::from_millis).to_vec());

        let error = Settings::from_toml_str("initial_retry_delay_ms = 2000\nmax_retry_delay_ms = 100")
            .expect_err("cap below the first delay should fail");
        assert!(matches!(
            error,
            SettingsError::Invalid {
                field: "max_retry_delay_ms",
                ..
            }
        ));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        for (source, expected) in [
            ("tool_timeout_secs = 0", "tool_timeout_secs"),
            ("http_timeout_secs = 0", "http_timeout_secs"),
            ("monitor_poll_secs = 0", "monitor_poll_secs"),
        ] {
            let error = Settings::from_toml_str(source).expect_err("zero should be rejected");
            assert!(
                matches!(error, SettingsError::Invalid { field, .. } if field == expected),
                "{source}: {error}"
            );
        }
    }

    #[test]
    fn blank_api_key_is_missing_and_debug_redacts_it() {
        let settings = Settings::from_toml_str("llm_api_key = \"   \"").expect("settings");
        assert!(matches!(settings.api_key(), Err(SettingsError::MissingApiKey)));

        let settings = Settings::from_toml_str("llm_api_key = \"sk-secret\"").expect("settings");
        assert!(!format!("{settings:?}").contains("sk-secret"));
    }
}
