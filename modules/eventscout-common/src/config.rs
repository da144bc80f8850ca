use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ScoutError;

// =============================================================================
// AppConfig (environment)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Gemini,
    Claude,
}

impl AiProvider {
    pub fn key_var(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "GEMINI_API_KEY",
            AiProvider::Claude => "ANTHROPIC_API_KEY",
        }
    }
}

/// Secrets and provider selection, loaded from environment variables.
/// Policy (queries, allowlist, month set) lives in the TOML [`FileConfig`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: AiProvider,
    pub api_key: String,
    /// Model override; `None` means the provider default.
    pub model: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ScoutError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ScoutError> {
        let provider = match lookup("EVENTSCOUT_AI_PROVIDER")
            .map(|p| p.trim().to_lowercase())
            .as_deref()
        {
            None | Some("") | Some("gemini") => AiProvider::Gemini,
            Some("claude") | Some("anthropic") => AiProvider::Claude,
            Some(other) => {
                return Err(ScoutError::Config(format!(
                    "EVENTSCOUT_AI_PROVIDER must be \"gemini\" or \"claude\", got {other:?}"
                )))
            }
        };

        let api_key = lookup(provider.key_var())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ScoutError::Config(format!(
                    "{} environment variable is required",
                    provider.key_var()
                ))
            })?;

        let model = lookup("EVENTSCOUT_AI_MODEL").filter(|m| !m.trim().is_empty());

        Ok(Self {
            provider,
            api_key,
            model,
        })
    }

    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val
                .char_indices()
                .nth(5)
                .map(|(i, _)| i)
                .unwrap_or(val.len());
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  EVENTSCOUT_AI_PROVIDER: {:?}", self.provider);
        tracing::info!("  {}: {}", self.provider.key_var(), preview(&self.api_key));
        tracing::info!(
            "  EVENTSCOUT_AI_MODEL: {}",
            self.model.as_deref().unwrap_or("<provider default>")
        );
    }
}

// =============================================================================
// FileConfig (TOML)
// =============================================================================

/// Run policy loaded from disk. Every section falls back to the built-in
/// defaults, so an empty file (or no file) is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub identity: IdentityConfig,
    pub search: SearchConfig,
    pub links: LinkConfig,
    pub verification: VerificationConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Locality every accepted event must be in.
    pub locality: String,
    /// Events must be dated on or after this (free text, fed to the verifier).
    pub future_cutoff: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            locality: "Singapore".to_string(),
            future_cutoff: "December 2025".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub queries: Vec<String>,
    pub trusted_domains: Vec<String>,
    pub max_results: usize,
    pub timeout_secs: u64,
    pub endpoint: String,
    pub user_agent: String,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            queries: [
                "Singapore events December 2025",
                "Singapore concerts 2025 2026",
                "Singapore festivals upcoming",
                "Singapore exhibitions now",
                "things to do Singapore this month",
                "Singapore free events",
                "Singapore Christmas events 2025",
                "Singapore family activities",
            ]
            .map(String::from)
            .to_vec(),
            trusted_domains: [
                "marinabay",
                "sentosa",
                "esplanade",
                "gardens",
                "sistic",
                "ticketmaster",
                "timeout",
                "marinabaysands",
                "mandai",
                "rwsentosa",
                "nhb.gov.sg",
                "nationalgallery",
                "thehoneycombers",
                "livenation",
                "eventbrite",
                "peatix",
            ]
            .map(String::from)
            .to_vec(),
            max_results: 5,
            timeout_secs: 10,
            endpoint: "https://www.google.com/search".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub timeout_secs: u64,
}

impl LinkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Minimum pause after every verification attempt.
    pub delay_ms: u64,
    pub timeout_secs: u64,
}

impl VerificationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            timeout_secs: 30,
        }
    }
}

/// What the staleness filter does with date text that carries neither a
/// recurrence marker nor a forward month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnrecognizedDates {
    #[default]
    Drop,
    Retain,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
    pub recurrence_markers: Vec<String>,
    pub forward_months: Vec<String>,
    pub unrecognized_dates: UnrecognizedDates,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("events.json"),
            recurrence_markers: ["daily", "weekend", "until"].map(String::from).to_vec(),
            forward_months: ["dec", "jan", "feb", "mar", "apr", "may", "jun"]
                .map(String::from)
                .to_vec(),
            unrecognized_dates: UnrecognizedDates::Drop,
        }
    }
}

impl FileConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ScoutError> {
        toml::from_str(content).map_err(|e| ScoutError::Config(format!("Invalid config: {e}")))
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig, ScoutError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ScoutError::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;
    FileConfig::from_toml_str(&content)
        .map_err(|e| ScoutError::Config(format!("{}: {e}", path.display())))
}
