use crate::commands::{CmdMessage, CmdResult};
use crate::config::CflConfig;
use crate::error::Result;
use std::path::Path;

/// Writes a complete configuration record, replacing any existing one.
pub fn run(config_dir: &Path, config: CflConfig) -> Result<CmdResult> {
    config.validate()?;
    let path = config.save(config_dir)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Configuration saved to {}",
        path.display()
    )));
    Ok(result.with_config_path(path))
}
