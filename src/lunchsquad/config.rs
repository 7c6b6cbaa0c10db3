use crate::catalog::Catalog;
use crate::error::{LunchError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_SESSION: &str = "default";

/// Keys accepted by [`LunchConfig::get`] and [`LunchConfig::set`].
pub const CONFIG_KEYS: [&str; 3] = ["session", "font_paths", "max_number"];

/// Configuration for lunchsquad, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LunchConfig {
    /// Prefix for every persisted key; separate sessions never see each other's orders.
    #[serde(default = "default_session")]
    pub session: String,

    /// TrueType fonts tried in order for the image report.
    #[serde(default = "default_font_paths")]
    pub font_paths: Vec<PathBuf>,

    #[serde(default)]
    pub catalog: Catalog,
}

fn default_session() -> String {
    DEFAULT_SESSION.to_string()
}

fn default_font_paths() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

impl Default for LunchConfig {
    fn default() -> Self {
        Self {
            session: default_session(),
            font_paths: default_font_paths(),
            catalog: Catalog::default(),
        }
    }
}

impl LunchConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: LunchConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "session" => Some(self.session.clone()),
            "font_paths" => Some(
                self.font_paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            "max_number" => Some(self.catalog.numbered.max_number.to_string()),
            _ => None,
        }
    }

    /// Update a single key. `font_paths` takes a comma-separated list.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "session" => {
                if value.is_empty() || value.contains(['/', '\\', '.']) {
                    return Err(LunchError::Api(format!("Invalid session name: {:?}", value)));
                }
                self.session = value.to_string();
            }
            "font_paths" => {
                self.font_paths = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from)
                    .collect();
            }
            "max_number" => {
                let n: u32 = value
                    .parse()
                    .map_err(|_| LunchError::Api(format!("Invalid number: {}", value)))?;
                if n == 0 {
                    return Err(LunchError::Api("max_number must be at least 1".to_string()));
                }
                self.catalog.numbered.max_number = n;
            }
            _ => {
                return Err(LunchError::Api(format!(
                    "Unknown config key: {} (known: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}
