use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub playlist_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".into(),
            playlist_url: "https://www.youtube.com/playlist?list=PLstub-road-trip".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    bind_addr: Option<String>,
    playlist_url: Option<String>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    let path = Path::new("stub_server.toml");
    if path.exists() {
        match read_settings_file(path) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.bind_addr = v;
                }
                if let Some(v) = file_cfg.playlist_url {
                    settings.playlist_url = v;
                }
            }
            Err(error) => tracing::warn!(%error, "ignoring unreadable stub_server.toml"),
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn read_settings_file(path: &Path) -> anyhow::Result<SettingsFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse '{}'", path.display()))
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("STUB_SERVER_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = lookup("APP__PLAYLIST_URL") {
        settings.playlist_url = v;
    }
}
