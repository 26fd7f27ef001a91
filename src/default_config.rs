use directories::ProjectDirs;
use keyrank_core::config::CONFIG_FILE_NAME;
use std::path::PathBuf;

/// `keyrank.toml` in the platform config directory, if one can be determined.
pub(crate) fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "keyrank")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push(CONFIG_FILE_NAME);
    Some(path)
}
