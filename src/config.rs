use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV_PREFIX: &str = "FOLIO";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub ui: UIConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub portfolio: PortfolioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UIConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

fn default_theme() -> String {
    "default".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default = "default_mpv_path")]
    pub mpv_path: String,
    #[serde(default = "default_fullscreen")]
    pub fullscreen: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mpv_path: default_mpv_path(),
            fullscreen: default_fullscreen(),
        }
    }
}

fn default_mpv_path() -> String {
    "mpv".into()
}

fn default_fullscreen() -> bool {
    false
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormConfig {
    /// Simulated delivery delay before the contact form reports success.
    #[serde(default = "default_submit_delay", with = "humantime_serde")]
    pub submit_delay: Duration,
    /// How long the confirmation message stays on screen.
    #[serde(default = "default_message_ttl", with = "humantime_serde")]
    pub message_ttl: Duration,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            submit_delay: default_submit_delay(),
            message_ttl: default_message_ttl(),
        }
    }
}

fn default_submit_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_message_ttl() -> Duration {
    Duration::from_secs(5)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PortfolioConfig {
    /// Portfolio YAML to load. Absent means the built-in sample content.
    #[serde(default)]
    pub content_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        if path.exists() {
            let from_file = read_config_file(path)?;
            cfg = merge_config(cfg, from_file);
        }
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    apply_env(&mut cfg, prefix);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if !other.ui.theme.is_empty() {
        base.ui.theme = other.ui.theme;
    }

    if !other.player.mpv_path.is_empty() {
        base.player.mpv_path = other.player.mpv_path;
    }
    base.player.fullscreen = other.player.fullscreen;

    if !other.form.submit_delay.is_zero() {
        base.form.submit_delay = other.form.submit_delay;
    }
    if !other.form.message_ttl.is_zero() {
        base.form.message_ttl = other.form.message_ttl;
    }

    if other.portfolio.content_file.is_some() {
        base.portfolio.content_file = other.portfolio.content_file;
    }

    base
}

fn apply_env(cfg: &mut Config, prefix: &str) {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    for (key, value) in map {
        apply_env_value(cfg, &key, value);
    }
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "ui.theme" => cfg.ui.theme = value,
        "player.mpv_path" => cfg.player.mpv_path = value,
        "player.fullscreen" => {
            cfg.player.fullscreen = matches!(value.as_str(), "1" | "true" | "TRUE" | "True");
        }
        "form.submit_delay" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.form.submit_delay = duration;
            }
        }
        "form.message_ttl" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.form.message_ttl = duration;
            }
        }
        "portfolio.content_file" => {
            cfg.portfolio.content_file = Some(PathBuf::from(value));
        }
        _ => {}
    }
}

pub fn default_path() -> Option<PathBuf> {
    default_config_path()
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("folio-tui").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_defaults_without_files() {
        let cfg = load(LoadOptions {
            config_file: Some(PathBuf::from("/nonexistent/config.yaml")),
            env_prefix: Some("FOLIO_DEFAULTS_TEST".to_string()),
        })
        .unwrap();
        assert_eq!(cfg.ui.theme, "default");
        assert_eq!(cfg.player.mpv_path, "mpv");
        assert_eq!(cfg.form.submit_delay, Duration::from_secs(2));
        assert_eq!(cfg.form.message_ttl, Duration::from_secs(5));
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "player:\n  mpv_path: /opt/mpv/bin/mpv\n  fullscreen: true\nform:\n  submit_delay: 1s\n"
        )
        .unwrap();
        let cfg = load(LoadOptions {
            config_file: Some(file.path().to_path_buf()),
            env_prefix: Some("FOLIO_TEST_NONE".to_string()),
        })
        .unwrap();
        assert_eq!(cfg.player.mpv_path, "/opt/mpv/bin/mpv");
        assert!(cfg.player.fullscreen);
        assert_eq!(cfg.form.submit_delay, Duration::from_secs(1));
        assert_eq!(cfg.form.message_ttl, Duration::from_secs(5));
    }

    #[test]
    fn env_overrides() {
        env::set_var("FOLIO_ENVTEST_UI__THEME", "dracula");
        env::set_var("FOLIO_ENVTEST_PLAYER__MPV_PATH", "/usr/local/bin/mpv");
        let cfg = load(LoadOptions {
            config_file: Some(PathBuf::from("/nonexistent/config.yaml")),
            env_prefix: Some("FOLIO_ENVTEST".to_string()),
        })
        .unwrap();
        assert_eq!(cfg.ui.theme, "dracula");
        assert_eq!(cfg.player.mpv_path, "/usr/local/bin/mpv");
        env::remove_var("FOLIO_ENVTEST_UI__THEME");
        env::remove_var("FOLIO_ENVTEST_PLAYER__MPV_PATH");
    }
}
