//! Error types for the economic simulation core.
//!
//! Following the error taxonomy in the design document: configuration
//! problems are boundary errors (caught before a [`crate::scheduler::Simulation`]
//! is ever constructed), while degenerate numeric states inside a running
//! simulation are handled with epsilon floors rather than raised as errors.
//!
//! # Examples
//!
//! ```
//! use economy_abm::config::ModelConfig;
//!
//! let mut config = ModelConfig::default();
//! config.banks.capital_requirement = 2.0; // out of range
//! match config.validate() {
//!     Ok(()) => println!("config ok"),
//!     Err(e) => println!("rejected: {}", e),
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Custom error type for the simulation core.
#[derive(Debug)]
pub enum SimulationError {
    /// Error occurred while reading a configuration file from disk.
    ConfigFileRead(io::Error),

    /// Error occurred while parsing YAML configuration.
    YamlParse(String),

    /// Error occurred while parsing TOML configuration.
    TomlParse(String),

    /// Configuration file has an unrecognised extension.
    UnsupportedConfigFormat(String),

    /// Configuration validation failed (out-of-range parameter).
    ValidationError(String),

    /// Error occurred while writing an output file.
    IoError(io::Error),

    /// Error occurred while serializing JSON output.
    JsonSerialize(String),

    /// A sweep combination's factory closure failed.
    FactoryError(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::ConfigFileRead(e) => {
                write!(f, "failed to read configuration file: {}", e)
            }
            SimulationError::YamlParse(msg) => {
                write!(f, "failed to parse YAML configuration: {}", msg)
            }
            SimulationError::TomlParse(msg) => {
                write!(f, "failed to parse TOML configuration: {}", msg)
            }
            SimulationError::UnsupportedConfigFormat(ext) => {
                write!(
                    f,
                    "unsupported configuration file format: '{}'. Use .yaml, .yml, or .toml",
                    ext
                )
            }
            SimulationError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
            SimulationError::IoError(e) => write!(f, "I/O error: {}", e),
            SimulationError::JsonSerialize(msg) => {
                write!(f, "failed to serialize JSON: {}", msg)
            }
            SimulationError::FactoryError(msg) => {
                write!(f, "sweep combination failed: {}", msg)
            }
        }
    }
}

impl StdError for SimulationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SimulationError::ConfigFileRead(e) | SimulationError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SimulationError {
    fn from(err: io::Error) -> Self {
        SimulationError::IoError(err)
    }
}

/// Type alias for `Result` with [`SimulationError`].
pub type Result<T> = std::result::Result<T, SimulationError>;
