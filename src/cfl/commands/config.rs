use crate::commands::{CmdMessage, CmdResult};
use crate::config::{config_path, CflConfig};
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Resolved values (file + environment)
    ShowAll,
    ShowKey(String),
    /// Writes to the file only; environment overrides still win at runtime
    Set(String, String),
    Path,
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = CflConfig::resolve(config_dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = CflConfig::resolve(config_dir)?;
            let value = config.get(&key)?;
            let mut result = CmdResult::default();
            if value.is_none() {
                result.add_message(CmdMessage::info(format!("{} is not set", key)));
            }
            Ok(result.with_value(value))
        }
        ConfigAction::Set(key, value) => {
            let mut config = CflConfig::load(config_dir)?;
            config.set(&key, &value)?;
            let path = config.save(config_dir)?;

            let mut result = CmdResult::default();
            result.add_message(CmdMessage::success(format!("{} updated", key)));
            Ok(result.with_config(config).with_config_path(path))
        }
        ConfigAction::Path => {
            let path = config_path(config_dir);
            let mut result = CmdResult::default();
            if !path.exists() {
                result.add_message(CmdMessage::info(
                    "(file does not exist yet; run `cfl init` to create it)",
                ));
            }
            Ok(result.with_config_path(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_show_key() {
        let dir = tempfile::tempdir().unwrap();
        run(
            dir.path(),
            ConfigAction::Set("email".into(), "me@example.com".into()),
        )
        .unwrap();

        let loaded = CflConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.email, "me@example.com");
    }

    #[test]
    fn set_unknown_key_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path(), ConfigAction::Set("nope".into(), "x".into())).is_err());
        assert!(!config_path(dir.path()).exists());
    }

    #[test]
    fn path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::Path).unwrap();
        assert_eq!(result.config_path.unwrap(), dir.path().join("config.json"));
        assert_eq!(result.messages.len(), 1);
    }
}
