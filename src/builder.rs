//! Builder for configuring and constructing an [`Ncs`].

use crate::config::NcsConfig;
use crate::error::{Error, Result};
use crate::system::Ncs;
use ncs_core::Driver;
use std::path::Path;
use std::sync::Arc;

/// An explicit driver wins over a configuration. Without either, `build`
/// fails.
///
/// # Example
///
/// ```ignore
/// use ncs::prelude::*;
///
/// let ncs = Ncs::builder()
///     .config_file("ncs.toml")?
///     .build()?;
/// ```
#[derive(Default)]
pub struct NcsBuilder {
    driver: Option<Arc<dyn Driver>>,
    config: Option<NcsConfig>,
}

impl NcsBuilder {
    pub fn driver(mut self, driver: Arc<dyn Driver>) -> Self {
        self.driver = Some(driver);
        self
    }

    pub fn config(mut self, config: NcsConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        Ok(self.config(NcsConfig::load(path)?))
    }

    pub fn build(self) -> Result<Ncs> {
        if let Some(driver) = self.driver {
            return Ok(Ncs::new(driver));
        }
        let config = self.config.ok_or_else(|| {
            Error::InvalidConfig(
                "No driver configured. Use .driver() or .config() to set one.".to_string(),
            )
        })?;
        Ncs::from_config(&config)
    }
}
