use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::params::{PARAM_MAX, PARAM_MIN};

/// A familiarity button: `label` is shown, `value` is sent to the trainer verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceButton {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_param_debounce_ms")]
    pub param_debounce_ms: u64,
    #[serde(default = "default_initial_a")]
    pub initial_a: u32,
    #[serde(default = "default_initial_b")]
    pub initial_b: u32,
    #[serde(default)]
    pub file_id: Option<u64>,
    #[serde(default)]
    pub file_shared: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_choices")]
    pub choices: Vec<ChoiceButton>,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_param_debounce_ms() -> u64 {
    300
}
fn default_initial_a() -> u32 {
    5
}
fn default_initial_b() -> u32 {
    10
}
fn default_choices() -> Vec<ChoiceButton> {
    [("Unfamiliar", "L"), ("Vague", "M"), ("Familiar", "H")]
        .into_iter()
        .map(|(label, value)| ChoiceButton {
            label: label.to_string(),
            value: value.to_string(),
        })
        .collect()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            theme: default_theme(),
            request_timeout_secs: default_request_timeout_secs(),
            param_debounce_ms: default_param_debounce_ms(),
            initial_a: default_initial_a(),
            initial_b: default_initial_b(),
            file_id: None,
            file_shared: false,
            log_level: default_log_level(),
            choices: default_choices(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };
        config.normalize();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocadrill")
            .join("config.toml")
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocadrill")
    }

    /// `None` disables the per-request timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn param_debounce(&self) -> Duration {
        Duration::from_millis(self.param_debounce_ms)
    }

    /// Repair values a hand-edited file may carry: parameters outside the
    /// trainer's range and an empty choice list.
    pub fn normalize(&mut self) {
        self.initial_a = self.initial_a.clamp(PARAM_MIN, PARAM_MAX);
        self.initial_b = self.initial_b.clamp(PARAM_MIN, PARAM_MAX);
        if self.choices.is_empty() {
            self.choices = default_choices();
        }
        // Only digits 1..=9 are bound to choices.
        self.choices.truncate(9);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server_url, "http://127.0.0.1:5000");
        assert_eq!(config.param_debounce_ms, 300);
        assert_eq!(config.initial_a, 5);
        assert_eq!(config.initial_b, 10);
        assert_eq!(config.file_id, None);
        assert!(!config.file_shared);
        let values: Vec<&str> = config.choices.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["L", "M", "H"]);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let toml_str = r#"
server_url = "https://trainer.example"
file_id = 12
file_shared = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server_url, "https://trainer.example");
        assert_eq!(config.file_id, Some(12));
        assert!(config.file_shared);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.file_id = Some(3);
        config.theme = "terminal-default".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.file_id, Some(3));
        assert_eq!(loaded.theme, "terminal-default");
        assert_eq!(loaded.choices, config.choices);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.server_url, default_server_url());
    }

    #[test]
    fn normalize_clamps_params_and_restores_choices() {
        let mut config = Config::default();
        config.initial_a = 0;
        config.initial_b = 500;
        config.choices.clear();
        config.normalize();
        assert_eq!(config.initial_a, 1);
        assert_eq!(config.initial_b, 100);
        assert_eq!(config.choices.len(), 3);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let mut config = Config::default();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        config.request_timeout_secs = 0;
        assert_eq!(config.request_timeout(), None);
    }
}
