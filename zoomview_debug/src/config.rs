// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON view configuration loading.
//!
//! Fields missing from the document keep their [`ViewConfig::new`] values.
//! The result is validated before it is returned.

use std::fmt;
use std::io::Read;

use zoomview_core::config::{ConfigError, ViewConfig};

/// Why a configuration document was rejected.
#[derive(Debug)]
pub enum ConfigLoadError {
    /// The document is not valid JSON for a [`ViewConfig`].
    Parse(serde_json::Error),
    /// The document parsed but describes an unusable configuration.
    Invalid(ConfigError),
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(_) => f.write_str("failed to parse view config"),
            Self::Invalid(_) => f.write_str("invalid view config"),
        }
    }
}

impl core::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ConfigLoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<ConfigError> for ConfigLoadError {
    fn from(e: ConfigError) -> Self {
        Self::Invalid(e)
    }
}

/// Parses and validates a configuration from a JSON string.
pub fn load_config(json: &str) -> Result<ViewConfig, ConfigLoadError> {
    let config: ViewConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Parses and validates a configuration from a reader.
pub fn load_config_from_reader(reader: impl Read) -> Result<ViewConfig, ConfigLoadError> {
    let config: ViewConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}
