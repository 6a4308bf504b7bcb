use anyhow::{Context, Result, anyhow, bail};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".fitlog";
const CONFIG_FILE: &str = "config.json";
const DATA_FILE: &str = "fitness_activities.csv";
const DEFAULT_CHART_WIDTH: usize = 40;
const MIN_CHART_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_path: PathBuf,
    pub report_dir: PathBuf,
    pub chart_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        let root = default_root_dir();

        Self {
            data_path: root.join(DATA_FILE),
            report_dir: root.join("reports"),
            chart_width: DEFAULT_CHART_WIDTH,
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        default_root_dir().join(CONFIG_FILE)
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.chart_width = config.chart_width.max(MIN_CHART_WIDTH);

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
        set_mode_600(config_path)?;

        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match normalize_config_key(key) {
            "data_path" => {
                if value.trim().is_empty() {
                    bail!("data_path must not be empty");
                }
                self.data_path = expand_home(value.trim());
            }
            "report_dir" => {
                if value.trim().is_empty() {
                    bail!("report_dir must not be empty");
                }
                self.report_dir = expand_home(value.trim());
            }
            "chart_width" => {
                let parsed = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow!("chart_width must be a number"))?;
                if parsed < MIN_CHART_WIDTH {
                    bail!("chart_width must be at least {MIN_CHART_WIDTH}");
                }
                self.chart_width = parsed;
            }
            _ => {
                bail!(
                    "Unsupported config key: {key}. Supported keys: data_path|data.path, report_dir|report.dir, chart_width|chart.width"
                );
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Option<String> {
        match normalize_config_key(key) {
            "data_path" => Some(self.data_path.display().to_string()),
            "report_dir" => Some(self.report_dir.display().to_string()),
            "chart_width" => Some(self.chart_width.to_string()),
            _ => None,
        }
    }
}

fn normalize_config_key(key: &str) -> &str {
    match key {
        "data_path" | "data.path" => "data_path",
        "report_dir" | "report.dir" => "report_dir",
        "chart_width" | "chart.width" => "chart_width",
        _ => key,
    }
}

pub fn expand_home(raw: &str) -> PathBuf {
    raw.strip_prefix("~/")
        .and_then(|stripped| home_dir().map(|home| home.join(stripped)))
        .unwrap_or_else(|| PathBuf::from(raw))
}

fn default_root_dir() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn set_mode_600(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set file permissions: {}", path.display()))?;
    }

    Ok(())
}
