//! Owned device handle.

use crate::error::{DriverResultExt, Error, Result};
use crate::query;
use ncs_core::{
    DeviceHwVersion, DeviceOption, DeviceState, Driver, NcsOption, Operation, OptionValue,
    RawDevice, ThermalThrottle,
};
use std::sync::Arc;

/// A Neural Compute Stick at a fixed index.
///
/// The handle is created by [`Ncs::device`](crate::Ncs::device) and destroyed
/// exactly once: by [`Device::destroy`] or when dropped.
pub struct Device {
    driver: Arc<dyn Driver>,
    raw: Option<RawDevice>,
    index: i32,
}

impl Device {
    pub(crate) fn create(driver: Arc<dyn Driver>, index: i32) -> Result<Self> {
        let raw = driver.device_create(index).during(Operation::DeviceCreate)?;
        tracing::debug!(index, raw = ?raw, "device created");
        Ok(Self {
            driver,
            raw: Some(raw),
            index,
        })
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    /// Raw token, or [`Error::Destroyed`] after destruction.
    pub fn raw(&self) -> Result<RawDevice> {
        self.raw.ok_or(Error::Destroyed("device"))
    }

    pub fn is_destroyed(&self) -> bool {
        self.raw.is_none()
    }

    /// Boot the device and open the communication channel.
    pub fn open(&self) -> Result<()> {
        self.driver
            .device_open(self.raw()?)
            .during(Operation::DeviceOpen)
    }

    pub fn close(&self) -> Result<()> {
        self.driver
            .device_close(self.raw()?)
            .during(Operation::DeviceClose)
    }

    /// Destroy the handle. On success the device no longer holds a token and
    /// every later call returns [`Error::Destroyed`]; on failure it keeps the
    /// token so the call can be retried.
    pub fn destroy(&mut self) -> Result<()> {
        let raw = self.raw()?;
        self.driver
            .device_destroy(raw)
            .during(Operation::DeviceDestroy)?;
        self.raw = None;
        Ok(())
    }

    /// Raw option bytes, sized by a probing call first.
    pub fn get_option(&self, option: DeviceOption) -> Result<Vec<u8>> {
        let raw = self.raw()?;
        query::query(option, Operation::DeviceGetOption, |buf| {
            self.driver.device_get_option(raw, option.code(), buf)
        })
    }

    /// Raw option bytes with the byte size given up front.
    pub fn get_option_with_byte_size(&self, option: DeviceOption, size: usize) -> Result<Vec<u8>> {
        let raw = self.raw()?;
        query::query_sized(option, Operation::DeviceGetOption, size, |buf| {
            self.driver.device_get_option(raw, option.code(), buf)
        })
    }

    /// Decoded option value.
    pub fn option_value(&self, option: DeviceOption) -> Result<OptionValue> {
        query::decode(option, &self.get_option(option)?)
    }

    pub fn state(&self) -> Result<DeviceState> {
        let option = DeviceOption::RoState;
        query::coded(option, self.option_value(option)?, DeviceState::from_code)
    }

    pub fn name(&self) -> Result<String> {
        let option = DeviceOption::RoName;
        query::text(option, self.option_value(option)?)
    }

    /// Temperature samples in degrees Celsius.
    pub fn thermal_stats(&self) -> Result<Vec<f32>> {
        let option = DeviceOption::RoThermalStats;
        query::floats(option, self.option_value(option)?)
    }

    pub fn thermal_throttle(&self) -> Result<ThermalThrottle> {
        let option = DeviceOption::RoThermalThrottle;
        query::coded(option, self.option_value(option)?, ThermalThrottle::from_code)
    }

    pub fn memory_used(&self) -> Result<u32> {
        self.uint(DeviceOption::RoMemoryUsed)
    }

    pub fn memory_size(&self) -> Result<u32> {
        self.uint(DeviceOption::RoMemorySize)
    }

    pub fn max_fifo_count(&self) -> Result<u32> {
        self.uint(DeviceOption::RoMaxFifoCount)
    }

    pub fn allocated_fifo_count(&self) -> Result<u32> {
        self.uint(DeviceOption::RoAllocatedFifoCount)
    }

    pub fn max_graph_count(&self) -> Result<u32> {
        self.uint(DeviceOption::RoMaxGraphCount)
    }

    pub fn allocated_graph_count(&self) -> Result<u32> {
        self.uint(DeviceOption::RoAllocatedGraphCount)
    }

    pub fn class_limit(&self) -> Result<u32> {
        self.uint(DeviceOption::RoClassLimit)
    }

    pub fn firmware_version(&self) -> Result<Vec<u32>> {
        let option = DeviceOption::RoFirmwareVersion;
        query::uints(option, self.option_value(option)?)
    }

    pub fn mvtensor_version(&self) -> Result<Vec<u32>> {
        let option = DeviceOption::RoMvTensorVersion;
        query::uints(option, self.option_value(option)?)
    }

    pub fn hw_version(&self) -> Result<DeviceHwVersion> {
        let option = DeviceOption::RoHwVersion;
        query::coded(option, self.option_value(option)?, DeviceHwVersion::from_code)
    }

    fn uint(&self, option: DeviceOption) -> Result<u32> {
        query::uint(option, self.option_value(option)?)
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("index", &self.index)
            .field("raw", &self.raw)
            .finish()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            if let Err(status) = self.driver.device_destroy(raw) {
                tracing::warn!(index = self.index, status = %status, "Failed to destroy device on drop");
            }
        }
    }
}
