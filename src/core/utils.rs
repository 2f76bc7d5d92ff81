use dirs::home_dir;
use std::{env, path::PathBuf};

/// Environment variable that relocates every file the crate manages.
pub const HOME_ENV: &str = "MONTHLY_BUDGET_HOME";
const DEFAULT_DIR_NAME: &str = ".monthly_budget";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.monthly_budget`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the preferences file inside `base`.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn config_file() -> PathBuf {
    config_file_in(&app_data_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_under_base() {
        let base = PathBuf::from("/tmp/mbf-home");
        assert_eq!(config_file_in(&base), base.join("config.json"));
    }
}
