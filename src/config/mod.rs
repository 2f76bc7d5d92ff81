use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    core::utils::{app_data_dir, config_file_in},
    errors::ConfigError,
    ledger::{CategoryList, DEFAULT_CATEGORIES},
};

const TMP_SUFFIX: &str = "tmp";

/// User preferences persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_dir: Option<PathBuf>,
    pub default_categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "English".into(),
            language_dir: None,
            default_categories: DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect(),
            last_opened: None,
        }
    }
}

impl Config {
    /// Categories a new ledger starts with. An empty list in the file falls
    /// back to the built-in set.
    pub fn default_category_list(&self) -> CategoryList {
        let list = CategoryList::from_names(&self.default_categories);
        if list.is_empty() {
            CategoryList::with_defaults()
        } else {
            list
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: config_file_in(&base),
        }
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            debug!(path = %self.path.display(), "no config file; using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let mut tmp = self.path.clone();
        tmp.set_extension(format!("json.{TMP_SUFFIX}"));
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
