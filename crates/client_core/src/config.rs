use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "moodtunes.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub service_url: String,
    pub min_loading_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_url: "https://music-recommender-tcip.fly.dev".into(),
            min_loading_delay_ms: 2000,
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn min_loading_delay(&self) -> Duration {
        Duration::from_millis(self.min_loading_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    service_url: Option<String>,
    min_loading_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `moodtunes.toml` in the working directory, then the environment.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    if Path::new(DEFAULT_SETTINGS_FILE).exists() {
        match load_settings_file(Path::new(DEFAULT_SETTINGS_FILE)) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(error) => tracing::warn!(%error, "ignoring unreadable settings file"),
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();
    apply_file(&mut settings, load_settings_file(path)?);
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn load_settings_file(path: &Path) -> anyhow::Result<SettingsFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

fn apply_file(settings: &mut ClientSettings, file_cfg: SettingsFile) {
    if let Some(v) = file_cfg.service_url {
        settings.service_url = v;
    }
    if let Some(v) = file_cfg.min_loading_delay_ms {
        settings.min_loading_delay_ms = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

fn apply_env_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("MOODTUNES_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = lookup("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = lookup("APP__MIN_LOADING_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.min_loading_delay_ms = parsed;
        }
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}
