use std::{collections::HashMap, fs};

use tracing::warn;
use url::Url;

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: roster_client::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Layered settings: compiled-in default, then `roster.toml`, then env vars.
/// A `--server-url` flag on top of this is applied by the caller.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("roster.toml") {
        apply_file_settings(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("base_url") {
            settings.base_url = v.clone();
        }
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("ROSTER_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = var("APP__BASE_URL") {
        settings.base_url = v;
    }
}

/// Normalizes and syntax-checks the configured base URL. An override that does
/// not parse falls back to the compiled-in default rather than aborting.
pub fn validate_settings(mut settings: Settings) -> Settings {
    settings.base_url = normalize_base_url(&settings.base_url);
    if Url::parse(&settings.base_url).is_err() {
        warn!(
            base_url = %settings.base_url,
            "invalid base URL override; falling back to default"
        );
        settings.base_url = Settings::default().base_url;
    }
    settings
}

fn normalize_base_url(raw_base_url: &str) -> String {
    let raw_base_url = raw_base_url.trim();

    if raw_base_url.is_empty() {
        return Settings::default().base_url;
    }

    // Trailing slashes would double up when the id segment is appended.
    raw_base_url.trim_end_matches('/').to_string()
}
