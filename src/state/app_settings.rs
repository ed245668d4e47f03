use crate::i18n::Language;
use crate::state::playback::PlaybackSpeed;
use anyhow::Context;
use log::LevelFilter;
use olympics_api::client::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_URL_VAR: &str = "OLYTUI_API_URL";
pub const LOG_LEVEL_VAR: &str = "OLYTUI_LOG";

/// Choices that survive a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: Language,
    pub playback_speed: PlaybackSpeed,
}

impl Preferences {
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read preferences from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parse preferences in {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        std::fs::write(path, payload).with_context(|| format!("write {}", path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api_url: String,
    pub preferences: Preferences,
    pub preferences_path: PathBuf,
}

impl AppSettings {
    pub fn load() -> Self {
        let mut settings = Self::from_env(|name| std::env::var(name).ok());
        match Preferences::load_from(&settings.preferences_path) {
            Ok(preferences) => settings.preferences = preferences,
            Err(e) if settings.preferences_path.exists() => {
                log::warn!("ignoring preferences: {e:#}");
            }
            Err(_) => {}
        }
        settings
    }

    fn from_env(var: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = var(API_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let log_level = var(LOG_LEVEL_VAR).and_then(|level| level.trim().parse().ok());

        Self {
            full_screen: false,
            log_level,
            api_url,
            preferences: Preferences::default(),
            preferences_path: preferences_path(&var),
        }
    }

    pub fn save_preferences(&self) -> anyhow::Result<()> {
        self.preferences.save_to(&self.preferences_path)
    }
}

fn preferences_path(var: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(config_dir) = var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("olytui").join("preferences.json");
    }
    if let Some(home) = var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("olytui")
            .join("preferences.json");
    }
    PathBuf::from("olytui-preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_the_local_backend() {
        let settings = AppSettings::from_env(env(&[]));
        assert_eq!(settings.api_url, "http://localhost:8000/api");
        assert_eq!(settings.log_level, None);
        assert_eq!(settings.preferences_path, PathBuf::from("olytui-preferences.json"));
    }

    #[test]
    fn environment_overrides_url_and_log_level() {
        let settings = AppSettings::from_env(env(&[
            (API_URL_VAR, " http://stats.internal:9000/api "),
            (LOG_LEVEL_VAR, "debug"),
            ("HOME", "/home/ana"),
        ]));
        assert_eq!(settings.api_url, "http://stats.internal:9000/api");
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
        assert_eq!(
            settings.preferences_path,
            PathBuf::from("/home/ana/.config/olytui/preferences.json")
        );
    }

    #[test]
    fn xdg_config_home_wins_over_home() {
        let settings = AppSettings::from_env(env(&[("XDG_CONFIG_HOME", "/cfg"), ("HOME", "/home/ana")]));
        assert_eq!(settings.preferences_path, PathBuf::from("/cfg/olytui/preferences.json"));
    }

    #[test]
    fn preferences_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!("olytui-prefs-{}", std::process::id()));
        let path = dir.join("preferences.json");
        let preferences =
            Preferences { language: Language::Portuguese, playback_speed: PlaybackSpeed::Fast };

        preferences.save_to(&path).unwrap();
        assert_eq!(Preferences::load_from(&path).unwrap(), preferences);

        std::fs::write(&path, r#"{"language": "Portuguese"}"#).unwrap();
        let partial = Preferences::load_from(&path).unwrap();
        assert_eq!(partial.playback_speed, PlaybackSpeed::Normal);

        let _ = std::fs::remove_dir_all(dir);
    }
}
