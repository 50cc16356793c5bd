pub mod init;
mod schema;

pub use schema::{default_users, Config};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::tournament::validation::validate_roster;

/// Environment variable overriding the tournament document path
pub const ENV_DATA_VAR: &str = "ASADO_TORNEO_DATA";

/// Environment variable overriding the access code
pub const ENV_CODE_VAR: &str = "ASADO_TORNEO_CODE";

/// Get the config directory path (~/.config/asado-torneo/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("asado-torneo")
}

/// Get the default config file path (~/.config/asado-torneo/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Get the default tournament document path (~/.config/asado-torneo/torneo.json)
pub fn get_default_data_path() -> PathBuf {
    get_config_dir().join("torneo.json")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/asado-torneo/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error: the built-in defaults apply.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Write configuration as YAML, atomically
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref code) = config.access_code {
        if code.trim().is_empty() {
            errors.push("access_code: must not be blank (omit it to disable)".to_string());
        }
    }

    if let Some(ref path) = config.data_path {
        if path.trim().is_empty() {
            errors.push("data_path: must not be blank (omit it for the default)".to_string());
        }
    }

    if config.users.is_empty() {
        errors.push("users: roster must not be empty".to_string());
    }

    if let Err(roster_errors) = validate_roster(&config.users) {
        errors.extend(roster_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Read a trimmed, non-empty environment variable
fn env_value(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

impl Config {
    /// Document path by precedence: CLI flag, ASADO_TORNEO_DATA, config file, default
    pub fn resolve_data_path(&self, flag: Option<&str>) -> PathBuf {
        flag.map(str::to_string)
            .or_else(|| env_value(ENV_DATA_VAR))
            .or_else(|| self.data_path.clone())
            .map(|p| expand_home(&p))
            .unwrap_or_else(get_default_data_path)
    }

    /// Access code by precedence: ASADO_TORNEO_CODE, config file
    pub fn resolve_access_code(&self) -> Option<String> {
        env_value(ENV_CODE_VAR).or_else(|| {
            self.access_code
                .as_deref()
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::types::User;
    use std::env;

    #[test]
    fn test_missing_explicit_config_is_error() {
        let missing = env::temp_dir().join("asado_torneo_test_missing_config.yaml");
        let _ = fs::remove_file(&missing);
        assert!(load_config(Some(missing)).is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = env::temp_dir().join("asado_torneo_test_config_roundtrip.yaml");
        let _ = fs::remove_file(&path);

        let config = Config {
            data_path: Some("/tmp/torneo.json".to_string()),
            access_code: Some("20182024".to_string()),
            users: default_users(),
        };
        save_config(&path, &config).unwrap();
        let loaded = load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let path = env::temp_dir().join("asado_torneo_test_config_invalid.yaml");
        fs::write(&path, "users: [[[").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid YAML"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = Config {
            data_path: Some(" ".to_string()),
            access_code: Some("".to_string()),
            users: vec![User {
                id: "1".to_string(),
                name: "Seba".to_string(),
                birthday: "3/4".to_string(),
            }],
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("access_code"));
        assert!(errors[1].contains("data_path"));
        assert!(errors[2].contains("birthday"));
    }

    #[test]
    fn test_validate_empty_roster() {
        let config = Config {
            users: vec![],
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("roster"));
    }

    #[test]
    fn test_data_path_flag_wins() {
        let config = Config {
            data_path: Some("/srv/torneo.json".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_data_path(Some("/tmp/other.json")),
            PathBuf::from("/tmp/other.json")
        );
    }

    #[test]
    fn test_access_code_from_file_is_trimmed() {
        let config: Config = serde_saphyr::from_str("access_code: \" 1234 \"\n").unwrap();
        if std::env::var(ENV_CODE_VAR).is_err() {
            let expected = config.resolve_access_code();
            assert_eq!(expected.as_deref(), Some("1234"));
            assert!(crate::tournament::verify_code(expected.as_deref(), Some("1234")).is_ok());
        }
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/torneo.json"), home.join("torneo.json"));
        }
        assert_eq!(expand_home("/abs/torneo.json"), PathBuf::from("/abs/torneo.json"));
    }
}
