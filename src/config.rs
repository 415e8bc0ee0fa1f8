//! Defaults for request construction and diagnostics

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use log::{debug, error};

/// Values pre-filled into every builder created from a config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults
{   /// Model identifier
    pub model: Option<String>
  , /// Max tokens to generate
    pub max_tokens: Option<u32>
  , /// System prompt
    pub system: Option<String>
  , /// Opaque end-user id sent as metadata
    pub user_id: Option<String>
}

/// Crate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{   /// Builder defaults
    pub defaults: RequestDefaults
  , /// Indent JSON in diagnostic output
    pub pretty_diagnostics: bool
}

impl Default for Config
{   fn default() -> Self
    {   Config
        {   defaults: RequestDefaults::default()
          , pretty_diagnostics: false
        }
    }
}

impl Config
{   /// Parse a config document
    pub fn from_json_str(s: &str)
      -> Result<Self, crate::error::Error>
    {   serde_json::from_str(s).map_err(|e| {
          error!("Config parse error: {}", e);
          crate::error::Error::InvalidConfiguration(e.to_string())
        })
    }

    /// Load a config document from disk
    pub fn from_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let config_str = fs::read_to_string(path).map_err(|e| {
          error!("Failed to read {}: {}", path.display(), e);
          crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          )
        })?;
        Config::from_json_str(&config_str)
    }
}
