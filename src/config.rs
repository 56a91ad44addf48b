//! Runtime configuration
use serde_yaml::{self, Value};
use std::fs::File;

use crate::{
    error::{ErrorCode, RuntimeError},
    files, recoverable_error,
    zmachine::ErrorHandling,
};

/// Default instruction cap for a single `run`
pub const DEFAULT_MAX_INSTRUCTIONS: usize = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Runtime configuration data
pub struct Config {
    /// Is logging enabled?
    logging: bool,
    /// Recoverable error handling
    error_handling: ErrorHandling,
    /// Instruction cap used by [run_default](crate::zmachine::ZMachine::run_default)
    max_instructions: usize,
    /// Deterministic RNG seed, if any
    random_seed: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            logging: false,
            error_handling: ErrorHandling::ContinueWarnOnce,
            max_instructions: DEFAULT_MAX_INSTRUCTIONS,
            random_seed: None,
        }
    }
}

impl TryFrom<File> for Config {
    type Error = RuntimeError;

    fn try_from(value: File) -> Result<Self, Self::Error> {
        match serde_yaml::from_reader::<File, Value>(value) {
            Ok(data) => {
                let logging = match data["logging"].as_str() {
                    Some(t) => t == "enabled",
                    None => false,
                };
                let error_handling = match data["error_handling"].as_str() {
                    Some(t) => match t {
                        "continue_warn_always" => ErrorHandling::ContinueWarnAlways,
                        "continue_warn_once" => ErrorHandling::ContinueWarnOnce,
                        "ignore" => ErrorHandling::Ignore,
                        "abort" => ErrorHandling::Abort,
                        _ => ErrorHandling::ContinueWarnOnce,
                    },
                    None => ErrorHandling::ContinueWarnOnce,
                };
                let max_instructions = match data["max_instructions"].as_u64() {
                    Some(v) if v > 0 => v as usize,
                    _ => DEFAULT_MAX_INSTRUCTIONS,
                };
                let random_seed = match data["random_seed"].as_u64() {
                    Some(v) if v > 0 => Some(v as u16),
                    _ => None,
                };
                Ok(Config::new(
                    logging,
                    error_handling,
                    max_instructions,
                    random_seed,
                ))
            }
            Err(e) => recoverable_error!(ErrorCode::ConfigError, "{}", e),
        }
    }
}

impl Config {
    /// Constructor
    ///
    /// # Arguments
    /// * `logging` - Logging enabled flag
    /// * `error_handling` - Recoverable error handling mode
    /// * `max_instructions` - Default instruction cap per run
    /// * `random_seed` - Deterministic RNG seed, or [None] to seed from entropy
    pub fn new(
        logging: bool,
        error_handling: ErrorHandling,
        max_instructions: usize,
        random_seed: Option<u16>,
    ) -> Self {
        Config {
            logging,
            error_handling,
            max_instructions,
            random_seed,
        }
    }

    /// Load `config.yml` from the configuration directory, falling back to defaults
    ///
    /// # Returns
    /// Configuration
    pub fn load() -> Self {
        if let Some(path) = files::config_file("config.yml") {
            match File::open(&path) {
                Ok(f) => match Config::try_from(f) {
                    Ok(config) => return config,
                    Err(e) => {
                        warn!(target: "app::trace", "Error parsing {}: {}", path.display(), e)
                    }
                },
                Err(e) => warn!(target: "app::trace", "Error opening {}: {}", path.display(), e),
            }
        }

        Config::default()
    }

    /// Get the logging flag
    ///
    /// # Returns
    /// Logging flag
    pub fn logging(&self) -> bool {
        self.logging
    }

    /// Get the recoverable error handling mode
    ///
    /// # Returns
    /// Error handling mode
    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    pub fn max_instructions(&self) -> usize {
        self.max_instructions
    }

    pub fn random_seed(&self) -> Option<u16> {
        self.random_seed
    }
}
