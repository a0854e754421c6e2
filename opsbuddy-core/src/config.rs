use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

use crate::error::{OpsBuddyError, OpsBuddyResult};

pub const DEFAULT_GREETING: &str =
    "Hello! I'm OpsBuddy, your intelligent incident resolution assistant. How can I help you today?";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OpsBuddyConfig {
    pub backend: BackendConfig,
    pub llm: LlmConfig,
    pub chat: ChatConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

/// Where fallback-analysis questions go once the local checks are exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// LLM when a key is set, then canned analysis.
    #[default]
    Local,
    /// Backend first, then the LLM when a key is set, then canned analysis.
    Backend,
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseMode::Local => write!(f, "local"),
            ResponseMode::Backend => write!(f, "backend"),
        }
    }
}

impl FromStr for ResponseMode {
    type Err = OpsBuddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "mock" => Ok(ResponseMode::Local),
            "backend" | "rest" => Ok(ResponseMode::Backend),
            other => Err(OpsBuddyError::InvalidConfigValue {
                key: "chat.mode".to_string(),
                message: format!("Unknown response mode '{}'. Use local or backend", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,

    #[serde(default = "default_backend_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_api_base")]
    pub api_base: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub mode: ResponseMode,

    #[serde(default = "default_think_delay")]
    pub think_delay_ms: u64,

    #[serde(default = "default_typing_per_char")]
    pub typing_ms_per_char: u64,

    #[serde(default = "default_max_typing_delay")]
    pub max_typing_delay_ms: u64,

    #[serde(default = "default_greeting")]
    pub greeting: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// JSON file replacing the bundled incident fixture.
    #[serde(default)]
    pub incidents_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_probe_timeout() -> u64 {
    3000
}

fn default_backend_timeout() -> u64 {
    30
}

fn default_llm_api_base() -> String {
    "https://api.openai.com".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_think_delay() -> u64 {
    1000
}

fn default_typing_per_char() -> u64 {
    30
}

fn default_max_typing_delay() -> u64 {
    1500
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_time_format() -> String {
    "%H:%M".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            probe_timeout_ms: default_probe_timeout(),
            request_timeout_secs: default_backend_timeout(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_llm_api_base(),
            model: default_llm_model(),
            api_key: None,
            request_timeout_secs: default_llm_timeout(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            mode: ResponseMode::default(),
            think_delay_ms: default_think_delay(),
            typing_ms_per_char: default_typing_per_char(),
            max_typing_delay_ms: default_max_typing_delay(),
            greeting: default_greeting(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            time_format: default_time_format(),
        }
    }
}

impl ChatConfig {
    /// Chat settings with every artificial delay removed.
    pub fn instant() -> Self {
        Self {
            think_delay_ms: 0,
            typing_ms_per_char: 0,
            max_typing_delay_ms: 0,
            ..Self::default()
        }
    }
}

impl OpsBuddyConfig {
    pub fn load() -> OpsBuddyResult<Self> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> OpsBuddyResult<Self> {
        load_dotenv_files();

        let env = Environment::with_prefix("OPSBUDDY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);

        let mut opsbuddy_config = Self::build(paths, Some(env))?;
        opsbuddy_config.apply_env_overrides()?;
        opsbuddy_config.validate()?;

        Ok(opsbuddy_config)
    }

    /// Reads only the given files, ignoring the process environment.
    pub fn load_files(paths: Vec<PathBuf>) -> OpsBuddyResult<Self> {
        let opsbuddy_config = Self::build(paths, None)?;
        opsbuddy_config.validate()?;
        Ok(opsbuddy_config)
    }

    fn build(paths: Vec<PathBuf>, env: Option<Environment>) -> OpsBuddyResult<Self> {
        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let mut opsbuddy_config: OpsBuddyConfig = builder.build()?.try_deserialize()?;
        if !opsbuddy_config.has_llm_key() {
            opsbuddy_config.llm.api_key = None;
        }

        Ok(opsbuddy_config)
    }

    fn apply_env_overrides(&mut self) -> OpsBuddyResult<()> {
        if let Ok(url) = std::env::var("OPSBUDDY_BACKEND_URL") {
            self.backend.url = url;
        }

        if !self.has_llm_key() {
            self.llm.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        if let Ok(mode) = std::env::var("OPSBUDDY_MODE") {
            self.chat.mode = mode.parse()?;
        }

        if let Ok(level) = std::env::var("OPSBUDDY_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }

        Ok(())
    }

    pub fn validate(&self) -> OpsBuddyResult<()> {
        validate_http_url("backend.url", &self.backend.url)?;
        validate_http_url("llm.api_base", &self.llm.api_base)?;

        if self.llm.model.trim().is_empty() {
            return Err(OpsBuddyError::InvalidConfigValue {
                key: "llm.model".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        if self.backend.probe_timeout_ms == 0 {
            return Err(OpsBuddyError::InvalidConfigValue {
                key: "backend.probe_timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        for directive in self.logging.level.split(',').map(str::trim) {
            if !is_valid_directive(directive) {
                return Err(OpsBuddyError::InvalidConfigValue {
                    key: "logging.level".to_string(),
                    message: format!(
                        "Invalid log directive '{}'. Use a level (off, error, warn, info, debug, trace), a module path, or module=level",
                        directive
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    /// True when a non-blank LLM key is configured.
    pub fn has_llm_key(&self) -> bool {
        self.llm
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

fn validate_http_url(key: &str, url: &str) -> OpsBuddyResult<()> {
    if url.trim().is_empty() {
        return Err(OpsBuddyError::InvalidConfigValue {
            key: key.to_string(),
            message: "Must not be empty".to_string(),
        });
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(OpsBuddyError::InvalidConfigValue {
            key: key.to_string(),
            message: "Must be an http:// or https:// URL".to_string(),
        });
    }

    Ok(())
}

/// Accepts the directive forms `EnvFilter` understands: a bare level, a
/// module path, or `target[span]=level`. A lone word that is neither a
/// level nor shaped like a module path is rejected as a likely typo.
fn is_valid_directive(directive: &str) -> bool {
    if directive.is_empty() {
        return true;
    }

    match directive.rsplit_once('=') {
        Some((target, level)) => {
            !target.is_empty() && level.trim().parse::<LevelFilter>().is_ok()
        }
        None => {
            directive.parse::<LevelFilter>().is_ok()
                || directive.contains("::")
                || directive.contains('_')
                || directive.contains('[')
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("opsbuddy.toml"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".opsbuddy").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    let mut env_paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        env_paths.push(cwd.join(".env"));
        env_paths.push(cwd.join(".env.local"));
    }

    if let Some(home) = dirs::home_dir() {
        env_paths.push(home.join(".opsbuddy").join(".env"));
    }

    for path in env_paths {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("opsbuddy"))
}
