//! Application configuration. Paths, company identity, AI credentials.

use serde::Deserialize;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_COMPANY_NAME: &str = "Tesla Electricidad y Automatización S.A.C.";
pub use crate::domain::brain::DEFAULT_VALIDITY_DAYS;
/// How many documents the history view shows.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Root for documents and the sequence file. Read from COTIZADOR_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Where Markdown/CSV exports go. Defaults to `{data_dir}/exports`.
    #[serde(default)]
    pub exports_dir: Option<String>,

    /// Company name printed on every document. Read from COTIZADOR_COMPANY_NAME.
    #[serde(default)]
    pub company_name: Option<String>,

    /// Quote validity in days. Read from COTIZADOR_VALIDITY_DAYS.
    #[serde(default)]
    pub validity_days: Option<u32>,

    #[serde(default)]
    pub history_limit: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// AI API key (e.g., OpenAI). Read from COTIZADOR_AI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// AI API URL. Defaults to OpenAI. Read from COTIZADOR_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// AI model name. Defaults to "gpt-4o-mini". Read from COTIZADOR_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("COTIZADOR"));
        if let Ok(path) = std::env::var("COTIZADOR_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // Numeric env values arrive as strings; parse them explicitly
        if let Ok(s) = std::env::var("COTIZADOR_VALIDITY_DAYS") {
            if let Ok(days) = s.parse::<u32>() {
                cfg.validity_days = Some(days);
            }
        }
        if let Ok(s) = std::env::var("COTIZADOR_HISTORY_LIMIT") {
            if let Ok(n) = s.parse::<usize>() {
                cfg.history_limit = Some(n);
            }
        }
        Ok(cfg)
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
    }

    pub fn exports_dir_or_default(&self) -> String {
        self.exports_dir
            .clone()
            .unwrap_or_else(|| format!("{}/exports", self.data_dir_or_default()))
    }

    pub fn company_name_or_default(&self) -> String {
        self.company_name
            .clone()
            .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string())
    }

    /// Returns quote validity in days. Zero is treated as unset.
    pub fn validity_days_or_default(&self) -> u32 {
        self.validity_days
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_VALIDITY_DAYS)
    }

    pub fn history_limit_or_default(&self) -> usize {
        self.history_limit
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the AI API key if configured. Reads from config or COTIZADOR_AI_API_KEY env.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| std::env::var("COTIZADOR_AI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Returns the AI API URL. Defaults to OpenAI chat completions endpoint.
    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string())
    }

    /// Returns the AI model name. Defaults to "gpt-4o-mini".
    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| "gpt-4o-mini".to_string())
    }

    /// Returns true if AI is configured (API key present).
    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key().is_some()
    }
}
