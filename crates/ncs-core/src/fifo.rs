//! FIFO configuration for graph allocation.

use crate::tensor::{FifoDataType, FifoType};
use serde::{Deserialize, Serialize};

/// Default number of elements per FIFO.
pub const DEFAULT_FIFO_CAPACITY: u32 = 2;

/// Default element data type.
pub const DEFAULT_FIFO_DATA_TYPE: FifoDataType = FifoDataType::Fp32;

/// Direction of a FIFO relative to the graph it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FifoRole {
    Input,
    Output,
}

impl FifoRole {
    /// Access type a FIFO in this role gets when none is given.
    pub fn default_type(self) -> FifoType {
        match self {
            FifoRole::Input => FifoType::HostWo,
            FifoRole::Output => FifoType::HostRo,
        }
    }
}

/// Optional FIFO parameters. Unset fields take the defaults of the role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FifoOpts {
    pub fifo_type: Option<FifoType>,
    pub data_type: Option<FifoDataType>,
    pub num_elem: Option<u32>,
}

impl FifoOpts {
    pub fn fifo_type(mut self, fifo_type: FifoType) -> Self {
        self.fifo_type = Some(fifo_type);
        self
    }

    pub fn data_type(mut self, data_type: FifoDataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn num_elem(mut self, num_elem: u32) -> Self {
        self.num_elem = Some(num_elem);
        self
    }

    pub fn resolve(&self, role: FifoRole) -> FifoConfig {
        FifoConfig {
            fifo_type: self.fifo_type.unwrap_or(role.default_type()),
            data_type: self.data_type.unwrap_or(DEFAULT_FIFO_DATA_TYPE),
            num_elem: self.num_elem.unwrap_or(DEFAULT_FIFO_CAPACITY),
        }
    }
}

/// Input and output FIFO parameters for allocating a graph with FIFOs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphFifoOpts {
    pub input: FifoOpts,
    pub output: FifoOpts,
}

impl GraphFifoOpts {
    pub fn input(mut self, opts: FifoOpts) -> Self {
        self.input = opts;
        self
    }

    pub fn output(mut self, opts: FifoOpts) -> Self {
        self.output = opts;
        self
    }

    pub fn resolve(&self) -> (FifoConfig, FifoConfig) {
        (
            self.input.resolve(FifoRole::Input),
            self.output.resolve(FifoRole::Output),
        )
    }
}

/// Fully resolved FIFO parameters, as passed to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoConfig {
    pub fifo_type: FifoType,
    pub data_type: FifoDataType,
    pub num_elem: u32,
}
