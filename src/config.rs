//! Driver selection from a TOML file.
//!
//! ```toml
//! driver = "mvnc"
//!
//! [mvnc]
//! library_path = "/opt/movidius/lib/libmvnc.so"
//!
//! [mock]
//! device_count = 2
//! io_timeout_ms = 500
//! ```
//!
//! `NCS_MVNC_LIBRARY` in the environment overrides `mvnc.library_path`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[cfg(feature = "mock")]
pub use ncs_core::mock::MockConfig;
#[cfg(feature = "mvnc")]
pub use ncs_mvnc::{MvncConfig, LIBRARY_ENV as MVNC_LIBRARY_ENV};

/// Which [`Driver`](ncs_core::Driver) implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Native `libmvnc`.
    Mvnc,
    /// In-process stand-in.
    Mock,
}

impl Default for DriverKind {
    fn default() -> Self {
        if cfg!(feature = "mvnc") {
            DriverKind::Mvnc
        } else {
            DriverKind::Mock
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NcsConfig {
    pub driver: DriverKind,

    #[cfg(feature = "mvnc")]
    pub mvnc: MvncConfig,

    #[cfg(feature = "mock")]
    pub mock: MockConfig,
}

impl NcsConfig {
    #[cfg(feature = "mock")]
    pub fn mock(config: MockConfig) -> Self {
        Self {
            driver: DriverKind::Mock,
            mock: config,
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), driver = ?config.driver, "Loaded config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}
