//! Driver status codes and operation names.

use ncs_sys as sys;
use std::fmt;

/// Status code returned by every NCAPI call.
///
/// Each variant maps to exactly one `ncStatus_t` value. Codes the driver
/// returns that are not listed here are kept verbatim in [`Status::Unknown`],
/// so `Status::from_code(c).code() == c` holds for every `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    /// Device is busy, retry later.
    Busy,
    /// Unexpected error during the call.
    Error,
    /// Host is out of memory.
    OutOfMemory,
    /// No device at the given index or name.
    DeviceNotFound,
    /// At least one parameter is wrong.
    InvalidParameters,
    /// Timeout in the communication with the device.
    Timeout,
    /// The file to boot the device was not found.
    MvcmdNotFound,
    /// The graph or FIFO has not been allocated.
    NotAllocated,
    /// An unauthorized operation was attempted.
    Unauthorized,
    /// The graph file version is not supported.
    UnsupportedGraphFile,
    /// Reserved.
    UnsupportedConfigFile,
    /// The feature is not supported by this firmware version.
    UnsupportedFeature,
    /// Error reported by the device; query the debug-info option.
    MyriadError,
    /// Invalid data length when getting or setting an option or element.
    InvalidDataLength,
    /// Invalid handle passed to a function.
    InvalidHandle,
    /// Any other code, preserved as returned.
    Unknown(i32),
}

impl Status {
    pub fn from_code(code: i32) -> Self {
        match code {
            sys::NC_OK => Status::Ok,
            sys::NC_BUSY => Status::Busy,
            sys::NC_ERROR => Status::Error,
            sys::NC_OUT_OF_MEMORY => Status::OutOfMemory,
            sys::NC_DEVICE_NOT_FOUND => Status::DeviceNotFound,
            sys::NC_INVALID_PARAMETERS => Status::InvalidParameters,
            sys::NC_TIMEOUT => Status::Timeout,
            sys::NC_MVCMD_NOT_FOUND => Status::MvcmdNotFound,
            sys::NC_NOT_ALLOCATED => Status::NotAllocated,
            sys::NC_UNAUTHORIZED => Status::Unauthorized,
            sys::NC_UNSUPPORTED_GRAPH_FILE => Status::UnsupportedGraphFile,
            sys::NC_UNSUPPORTED_CONFIGURATION_FILE => Status::UnsupportedConfigFile,
            sys::NC_UNSUPPORTED_FEATURE => Status::UnsupportedFeature,
            sys::NC_MYRIAD_ERROR => Status::MyriadError,
            sys::NC_INVALID_DATA_LENGTH => Status::InvalidDataLength,
            sys::NC_INVALID_HANDLE => Status::InvalidHandle,
            other => Status::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Status::Ok => sys::NC_OK,
            Status::Busy => sys::NC_BUSY,
            Status::Error => sys::NC_ERROR,
            Status::OutOfMemory => sys::NC_OUT_OF_MEMORY,
            Status::DeviceNotFound => sys::NC_DEVICE_NOT_FOUND,
            Status::InvalidParameters => sys::NC_INVALID_PARAMETERS,
            Status::Timeout => sys::NC_TIMEOUT,
            Status::MvcmdNotFound => sys::NC_MVCMD_NOT_FOUND,
            Status::NotAllocated => sys::NC_NOT_ALLOCATED,
            Status::Unauthorized => sys::NC_UNAUTHORIZED,
            Status::UnsupportedGraphFile => sys::NC_UNSUPPORTED_GRAPH_FILE,
            Status::UnsupportedConfigFile => sys::NC_UNSUPPORTED_CONFIGURATION_FILE,
            Status::UnsupportedFeature => sys::NC_UNSUPPORTED_FEATURE,
            Status::MyriadError => sys::NC_MYRIAD_ERROR,
            Status::InvalidDataLength => sys::NC_INVALID_DATA_LENGTH,
            Status::InvalidHandle => sys::NC_INVALID_HANDLE,
            Status::Unknown(code) => code,
        }
    }

    /// `Ok(())` for `NC_OK`, the status itself otherwise.
    pub fn check(code: i32) -> Result<(), Status> {
        match Status::from_code(code) {
            Status::Ok => Ok(()),
            status => Err(status),
        }
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status::from_code(code)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Ok => "STATUS_OK",
            Status::Busy => "DEVICE_BUSY",
            Status::Error => "UNEXPECTED_ERROR",
            Status::OutOfMemory => "HOST_OUT_OF_MEMORY",
            Status::DeviceNotFound => "DEVICE_NOT_FOUND",
            Status::InvalidParameters => "INVALID_PARAMETERS",
            Status::Timeout => "TIMEOUT",
            Status::MvcmdNotFound => "BOOTLOADER_NOT_FOUND",
            Status::NotAllocated => "UNALLOCATED_RESOURCE",
            Status::Unauthorized => "UNAUTHORIZED_OPERATION",
            Status::UnsupportedGraphFile => "UNSUPPORTED_GRAPH_FILE",
            Status::UnsupportedConfigFile => "UNSUPPORTED_CONFIGURATION",
            Status::UnsupportedFeature => "UNSUPPORTED_FEATURE",
            Status::MyriadError => "MOVIDIUS_VPU_ERROR",
            Status::InvalidDataLength => "INVALID_OPTION_LENGTH",
            Status::InvalidHandle => "INVALID_HANDLE",
            Status::Unknown(_) => "UNKNOWN_STATUS",
        };
        f.write_str(name)
    }
}

impl std::error::Error for Status {}

/// One forwarded driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DeviceCreate,
    DeviceOpen,
    DeviceGetOption,
    DeviceClose,
    DeviceDestroy,
    GraphCreate,
    GraphAllocate,
    GraphAllocateWithFifos,
    GraphQueueInference,
    GraphQueueInferenceWithFifoElem,
    GraphGetOption,
    GraphDestroy,
    FifoCreate,
    FifoAllocate,
    FifoGetOption,
    FifoWriteElem,
    FifoReadElem,
    FifoRemoveElem,
    FifoDestroy,
}

impl Operation {
    /// Name of the native entry point this operation forwards to.
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::DeviceCreate => "ncDeviceCreate",
            Operation::DeviceOpen => "ncDeviceOpen",
            Operation::DeviceGetOption => "ncDeviceGetOption",
            Operation::DeviceClose => "ncDeviceClose",
            Operation::DeviceDestroy => "ncDeviceDestroy",
            Operation::GraphCreate => "ncGraphCreate",
            Operation::GraphAllocate => "ncGraphAllocate",
            Operation::GraphAllocateWithFifos => "ncGraphAllocateWithFifosEx",
            Operation::GraphQueueInference => "ncGraphQueueInference",
            Operation::GraphQueueInferenceWithFifoElem => "ncGraphQueueInferenceWithFifoElem",
            Operation::GraphGetOption => "ncGraphGetOption",
            Operation::GraphDestroy => "ncGraphDestroy",
            Operation::FifoCreate => "ncFifoCreate",
            Operation::FifoAllocate => "ncFifoAllocate",
            Operation::FifoGetOption => "ncFifoGetOption",
            Operation::FifoWriteElem => "ncFifoWriteElem",
            Operation::FifoReadElem => "ncFifoReadElem",
            Operation::FifoRemoveElem => "ncFifoRemoveElem",
            Operation::FifoDestroy => "ncFifoDestroy",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
