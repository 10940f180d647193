//! # ncs - Neural Compute Stick bindings
//!
//! Safe, owned handles over the NCAPI v2 device, graph and FIFO operations.
//!
//! ## Architecture
//!
//! - **ncs-sys** - Raw C ABI of `libmvnc`
//! - **ncs-core** - Driver contract, status codes, options, mock driver
//! - **ncs-mvnc** - Native driver loading `libmvnc` at runtime
//!
//! Every driver status reaches the caller unchanged through
//! [`Error::Status`]. Handles release their driver resource exactly once,
//! on [`Device::destroy`] (and friends) or on drop.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ncs::prelude::*;
//!
//! let ncs = Ncs::builder().config(NcsConfig::default()).build()?;
//!
//! let device = ncs.device(0)?;
//! device.open()?;
//!
//! let graph = ncs.graph("squeezenet")?;
//! let queue = graph.allocate_with_fifos_default(&device, &std::fs::read("graph")?)?;
//!
//! let result = graph.infer(&queue, &f32_bytes(&input), UserParam::NONE)?;
//! println!("{:?}", result.to_f32()?);
//! ```
//!
//! ## Feature Flags
//!
//! - `mock` - In-process stand-in driver (default)
//! - `mvnc` - Native `libmvnc` driver (default)

mod builder;
mod config;
mod device;
mod error;
mod fifo;
mod graph;
mod query;
mod system;

/// Re-export of ncs-core for direct driver access
pub use ncs_core as core;

pub use builder::NcsBuilder;
pub use config::{DriverKind, NcsConfig};
pub use device::Device;
pub use error::{Error, Result};
pub use fifo::{f32_bytes, Fifo, FifoQueue, Tensor};
pub use graph::Graph;
pub use system::Ncs;

#[cfg(feature = "mock")]
pub use config::MockConfig;
#[cfg(feature = "mvnc")]
pub use config::{MvncConfig, MVNC_LIBRARY_ENV};

pub use ncs_core::{
    DeviceHwVersion, DeviceOption, DeviceState, Driver, FifoDataType, FifoOpts, FifoOption,
    FifoState, FifoType, GraphFifoOpts, GraphOption, GraphState, NcsOption, Operation,
    OptionValue, Status, TensorDesc, ThermalThrottle, UserParam, DEBUG_BUFFER_SIZE, MAX_NAME_SIZE,
    THERMAL_BUFFER_SIZE, VERSION_MAX_SIZE,
};

pub mod prelude {
    pub use crate::{
        f32_bytes, Device, DeviceOption, Error, Fifo, FifoDataType, FifoOpts, FifoOption,
        FifoQueue, FifoType, Graph, GraphFifoOpts, GraphOption, Ncs, NcsConfig, Result, Status,
        Tensor, TensorDesc, UserParam,
    };

    #[cfg(feature = "mock")]
    pub use crate::MockConfig;
}
