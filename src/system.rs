//! Entry point: a driver plus factories for owned handles.

use crate::builder::NcsBuilder;
use crate::config::{DriverKind, NcsConfig};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::fifo::Fifo;
use crate::graph::Graph;
use ncs_core::{Driver, FifoType};
use std::sync::Arc;

/// Neural Compute Stick API bound to one driver.
///
/// Cloning is cheap; every clone and every handle shares the driver.
#[derive(Clone)]
pub struct Ncs {
    driver: Arc<dyn Driver>,
}

impl Ncs {
    pub fn builder() -> NcsBuilder {
        NcsBuilder::default()
    }

    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    /// Bindings over the in-process stand-in driver.
    #[cfg(feature = "mock")]
    pub fn mock(config: ncs_core::mock::MockConfig) -> Self {
        Self::new(Arc::new(ncs_core::mock::MockDriver::new(config)))
    }

    /// Bindings over native `libmvnc`, found through `config`.
    #[cfg(feature = "mvnc")]
    pub fn mvnc(config: &ncs_mvnc::MvncConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(ncs_mvnc::MvncDriver::load(config)?)))
    }

    pub fn from_config(config: &NcsConfig) -> Result<Self> {
        match config.driver {
            #[cfg(feature = "mvnc")]
            DriverKind::Mvnc => Self::mvnc(&config.mvnc),
            #[cfg(feature = "mock")]
            DriverKind::Mock => Ok(Self::mock(config.mock.clone())),
            #[allow(unreachable_patterns)]
            kind => Err(Error::InvalidConfig(format!(
                "driver {:?} is not enabled in this build",
                kind
            ))),
        }
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Create a handle for the device at `index`. The device is not opened.
    pub fn device(&self, index: i32) -> Result<Device> {
        Device::create(self.driver.clone(), index)
    }

    pub fn graph(&self, name: &str) -> Result<Graph> {
        Graph::create(self.driver.clone(), name)
    }

    pub fn fifo(&self, name: &str, fifo_type: FifoType) -> Result<Fifo> {
        Fifo::create(self.driver.clone(), name, fifo_type)
    }
}

impl std::fmt::Debug for Ncs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ncs")
            .field("driver", &self.driver.name())
            .finish()
    }
}
