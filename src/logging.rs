//! Logging setup
use std::path::Path;

use crate::files;

/// Initialize log4rs from `log4rs.yml` in the configuration directory
///
/// # Returns
/// `true` if logging was configured, `false` if no configuration was found or it failed to load
pub fn init() -> bool {
    match files::config_file("log4rs.yml") {
        Some(path) => init_file(&path),
        None => false,
    }
}

/// Initialize log4rs from a specific file
///
/// # Arguments
/// * `path` - log4rs YAML configuration
///
/// # Returns
/// `true` if logging was configured
pub fn init_file(path: &Path) -> bool {
    let ok = log4rs::init_file(path, Default::default()).is_ok();
    if ok {
        set_instruction_count(0);
        info!(target: "app::trace", "Logging initialized from {}", path.display());
    }
    ok
}

/// Update the instruction counter carried in the logging context
///
/// # Arguments
/// * `count` - instructions executed so far
pub fn set_instruction_count(count: usize) {
    log_mdc::insert("instruction_count", format!("{:8x}", count));
}
