use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

const DEFAULT_DIR_NAME: &str = ".brewcost";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Returns the application data directory, defaulting to `~/.brewcost`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BREWCOST_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Percentages applied by the server-side price calculation, pre-filled into
/// every new pricing form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingDefaults {
    pub profit_margin: f64,
    pub card_fee: f64,
    pub sanitation_percent: f64,
    pub tax_percent: f64,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            profit_margin: 30.0,
            card_fee: 3.5,
            sanitation_percent: 2.0,
            tax_percent: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_url: String,
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub plain_output: bool,
    #[serde(default)]
    pub pricing: PricingDefaults,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_recipe_id: Option<i64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            plain_output: false,
            pricing: PricingDefaults::default(),
            last_recipe_id: None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    /// Builds a manager rooted at an explicit directory instead of the
    /// platform default. Used by embedders and the test suites.
    pub fn with_base_dir(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let base = base.into();
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path()).expect("manager");
        let config = manager.load().expect("load");
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.currency, "BRL");
        assert!((config.pricing.profit_margin - 30.0).abs() < f64::EPSILON);
        assert!(config.last_recipe_id.is_none());
    }

    #[test]
    fn save_and_reload_round_trips() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path()).expect("manager");
        let mut config = Config::default();
        config.server_url = "http://brew.local:8080".into();
        config.pricing.card_fee = 4.2;
        config.last_recipe_id = Some(7);
        manager.save(&config).expect("save");

        let reloaded = manager.load().expect("reload");
        assert_eq!(reloaded.server_url, "http://brew.local:8080");
        assert!((reloaded.pricing.card_fee - 4.2).abs() < f64::EPSILON);
        assert_eq!(reloaded.last_recipe_id, Some(7));
        assert!(!manager.path().with_extension("json.tmp").exists());
    }
}
