//! Driver contract for the Neural Compute Stick.
//!
//! # Primary API
//!
//! - [`Driver`]: one method per NCAPI operation, over raw handle tokens
//! - [`Status`]: driver status codes, preserved exactly
//! - [`DeviceOption`], [`GraphOption`], [`FifoOption`]: option codes and decoders
//! - [`TensorDesc`], [`GraphFifoOpts`]: allocation parameters
//!
//! # Feature-gated APIs
//!
//! - `"mock"`: [`mock::MockDriver`], an in-process driver for tests (enabled by default)

pub mod buffer;
pub mod driver;
pub mod error;
pub mod fifo;
pub mod handle;
pub mod option;
pub mod state;
pub mod status;
pub mod tensor;

#[cfg(feature = "mock")]
pub mod mock;

pub use buffer::IoBuffer;
pub use driver::{Driver, DriverResult};
pub use error::OptionDecodeError;
pub use fifo::{
    FifoConfig, FifoOpts, FifoRole, GraphFifoOpts, DEFAULT_FIFO_CAPACITY, DEFAULT_FIFO_DATA_TYPE,
};
pub use handle::{RawDevice, RawFifo, RawGraph, UserParam};
pub use option::{DeviceOption, FifoOption, GraphOption, NcsOption, OptionValue};
pub use state::{DeviceHwVersion, DeviceState, FifoState, GraphState, ThermalThrottle};
pub use status::{Operation, Status};
pub use tensor::{
    FifoDataType, FifoType, TensorDesc, DEBUG_BUFFER_SIZE, MAX_NAME_SIZE, THERMAL_BUFFER_SIZE,
    VERSION_MAX_SIZE,
};
