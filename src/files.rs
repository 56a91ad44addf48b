//! Configuration file lookup
use std::path::{Path, PathBuf};

/// Directory under the user's home that holds configuration files
const CONFIG_DIRECTORY: &str = ".zwalker";

/// Build the path of a configuration file under a base directory
///
/// # Arguments
/// * `base` - base directory, normally the user's home
/// * `name` - configuration file name
///
/// # Returns
/// Path to `<base>/.zwalker/<name>`
pub fn config_path(base: &Path, name: &str) -> PathBuf {
    base.join(CONFIG_DIRECTORY).join(name)
}

/// Check whether a file exists
///
/// # Arguments
/// * `path` - path to check
///
/// # Returns
/// [Some] path if the file exists, [None] if it doesn't or the check failed
pub fn check_existing(path: &Path) -> Option<PathBuf> {
    match path.try_exists() {
        Ok(b) => {
            if b {
                Some(path.to_path_buf())
            } else {
                None
            }
        }
        Err(e) => {
            info!(target: "app::trace", "Error checking existence of {}: {}", path.display(), e);
            None
        }
    }
}

/// Locate a configuration file in the user's configuration directory
///
/// # Arguments
/// * `name` - configuration file name
///
/// # Returns
/// [Some] path if the file exists, [None] if not
pub fn config_file(name: &str) -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    check_existing(&config_path(&home, name))
}
