use crate::error::{CflError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Environment variable that relocates the config directory (used by tests).
pub const CONFIG_DIR_ENV: &str = "CFL_CONFIG_DIR";

/// Prefixes checked for overrides, highest priority first.
const ENV_PREFIXES: [&str; 2] = ["CFL_", "ATLASSIAN_"];

/// Keys accepted by `cfl config get/set`.
pub const CONFIG_KEYS: [&str; 4] = ["url", "email", "api-token", "default-space"];

/// Connection settings, stored in `<config dir>/config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CflConfig {
    /// Site root, e.g. `https://example.atlassian.net`
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub api_token: String,

    /// Space key used when a command needs one and none was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_space: Option<String>,
}

/// Returns the directory holding `config.json`.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "cfl", "cfl")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| CflError::Config("Could not determine config directory".into()))
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}

impl CflConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let path = config_path(config_dir.as_ref());

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let mut config: CflConfig = serde_json::from_str(&content)
            .map_err(|e| CflError::Config(format!("{}: {}", path.display(), e)))?;
        config.url = normalize_url(&config.url);
        Ok(config)
    }

    /// File values overlaid with environment overrides.
    pub fn resolve<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let mut config = Self::load(config_dir)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<PathBuf> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let path = config_path(config_dir);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Applies `CFL_*` overrides, falling back to `ATLASSIAN_*`.
    ///
    /// Empty variables are ignored, so an exported-but-blank `CFL_URL` does not
    /// wipe the file value.
    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        let lookup_key = |key: &str| {
            ENV_PREFIXES
                .iter()
                .filter_map(|prefix| lookup(&format!("{}{}", prefix, key)))
                .find(|v| !v.is_empty())
        };

        if let Some(url) = lookup_key("URL") {
            self.url = normalize_url(&url);
        }
        if let Some(email) = lookup_key("EMAIL") {
            self.email = email;
        }
        if let Some(token) = lookup_key("API_TOKEN") {
            self.api_token = token;
        }
        if let Some(space) = lookup_key("DEFAULT_SPACE") {
            self.default_space = Some(space);
        }
    }

    /// Checks that everything needed to talk to the backend is present.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("url", &self.url),
            ("email", &self.email),
            ("api-token", &self.api_token),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CflError::validation(format!(
                "missing configuration: {} (run `cfl init` or set CFL_* environment variables)",
                missing.join(", ")
            )))
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "url" => Ok(non_empty(&self.url)),
            "email" => Ok(non_empty(&self.email)),
            "api-token" => Ok(non_empty(&self.api_token)),
            "default-space" => Ok(self.default_space.clone()),
            other => Err(unknown_key(other)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "url" => self.url = normalize_url(value),
            "email" => self.email = value.to_string(),
            "api-token" => self.api_token = value.to_string(),
            "default-space" => self.default_space = non_empty(value),
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }

    /// All keys with display values. The token is masked.
    pub fn list_all(&self) -> Vec<(String, String)> {
        vec![
            ("url".to_string(), self.url.clone()),
            ("email".to_string(), self.email.clone()),
            ("api-token".to_string(), mask(&self.api_token)),
            (
                "default-space".to_string(),
                self.default_space.clone().unwrap_or_default(),
            ),
        ]
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn unknown_key(key: &str) -> CflError {
    CflError::validation(format!(
        "unknown config key '{}' (known keys: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn mask(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    let tail: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn sample() -> CflConfig {
        CflConfig {
            url: "https://file.atlassian.net".into(),
            email: "file@example.com".into(),
            api_token: "file-token".into(),
            default_space: Some("FILE".into()),
        }
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CflConfig::load(dir.path()).unwrap(), CflConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        sample().save(&nested).unwrap();
        assert_eq!(CflConfig::load(&nested).unwrap(), sample());
    }

    #[test]
    fn test_cfl_env_beats_file() {
        let mut config = sample();
        config.apply_env(env(&[("CFL_URL", "https://env.atlassian.net/")]));
        assert_eq!(config.url, "https://env.atlassian.net");
        assert_eq!(config.email, "file@example.com");
    }

    #[test]
    fn test_cfl_env_beats_atlassian_env() {
        let mut config = sample();
        config.apply_env(env(&[
            ("CFL_API_TOKEN", "cfl-token"),
            ("ATLASSIAN_API_TOKEN", "shared-token"),
            ("ATLASSIAN_EMAIL", "shared@example.com"),
        ]));
        assert_eq!(config.api_token, "cfl-token");
        assert_eq!(config.email, "shared@example.com");
    }

    #[test]
    fn test_empty_env_does_not_override() {
        let mut config = sample();
        config.apply_env(env(&[("CFL_EMAIL", ""), ("ATLASSIAN_EMAIL", "")]));
        assert_eq!(config.email, "file@example.com");

        config.apply_env(env(&[("CFL_EMAIL", ""), ("ATLASSIAN_EMAIL", "a@b.c")]));
        assert_eq!(config.email, "a@b.c");
    }

    #[test]
    fn test_validate_names_missing_keys() {
        let err = CflConfig {
            url: "https://x.atlassian.net".into(),
            ..CflConfig::default()
        }
        .validate()
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("email, api-token"), "{}", msg);
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_get_set_keys() {
        let mut config = CflConfig::default();
        config.set("url", "https://x.atlassian.net/").unwrap();
        config.set("default-space", "DEV").unwrap();
        assert_eq!(
            config.get("url").unwrap().as_deref(),
            Some("https://x.atlassian.net")
        );
        assert_eq!(config.get("default-space").unwrap().as_deref(), Some("DEV"));
        assert_eq!(config.get("email").unwrap(), None);
        assert!(config.set("colour", "blue").is_err());
    }

    #[test]
    fn test_list_all_masks_token() {
        let listed = sample().list_all();
        let token = listed.iter().find(|(k, _)| k == "api-token").unwrap();
        assert_eq!(token.1, "****oken");
    }
}
