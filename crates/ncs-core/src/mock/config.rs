use crate::state::DeviceHwVersion;
use crate::tensor::{FifoDataType, TensorDesc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Behaviour of the in-process stand-in driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Number of devices visible at indices `0..device_count`.
    pub device_count: u32,
    /// How long element reads and writes block before `Timeout`.
    pub io_timeout_ms: u64,
    pub max_graph_count: u32,
    pub max_fifo_count: u32,
    /// Device memory in bytes.
    pub memory_size: u32,
    /// Reported chip temperature in degrees Celsius.
    pub temperature: f32,
    /// `0` = MA2450, `1` = MA2480.
    pub hw_version: u32,
    pub firmware_version: [u32; 4],
    /// Input and output descriptor of every allocated graph.
    pub graph_tensor: TensorDesc,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            device_count: 1,
            io_timeout_ms: 1000,
            max_graph_count: 10,
            max_fifo_count: 20,
            memory_size: 500 * 1024 * 1024,
            temperature: 45.0,
            hw_version: DeviceHwVersion::Ma2450.code(),
            firmware_version: [2, 10, 1, 0],
            graph_tensor: TensorDesc::new(1, 3, 2, 2, FifoDataType::Fp16),
        }
    }
}

impl MockConfig {
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn device_count(mut self, count: u32) -> Self {
        self.device_count = count;
        self
    }

    pub fn io_timeout_ms(mut self, ms: u64) -> Self {
        self.io_timeout_ms = ms;
        self
    }

    pub fn graph_tensor(mut self, desc: TensorDesc) -> Self {
        self.graph_tensor = desc;
        self
    }
}
