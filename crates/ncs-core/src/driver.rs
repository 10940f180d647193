//! The accelerator driver contract.
//!
//! [`Driver`] exposes every NCAPI operation one-to-one over raw handle tokens
//! and byte buffers. Implementations forward each call to the real engine and
//! return its status unchanged: no retries, no validation beyond argument
//! casts, no translation of error semantics.

use crate::buffer::IoBuffer;
use crate::fifo::FifoConfig;
use crate::handle::{RawDevice, RawFifo, RawGraph, UserParam};
use crate::status::Status;
use crate::tensor::{FifoType, TensorDesc};

/// Result of a driver call. The error is the driver's status, never
/// [`Status::Ok`].
pub type DriverResult<T> = std::result::Result<T, Status>;

/// Abstract capability interface of a neural compute driver.
///
/// Thread-safety and blocking of element I/O are properties of the
/// implementation. Calls on destroyed tokens are undefined at this level;
/// the owned wrappers in `ncs` never make them.
pub trait Driver: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    // Device

    fn device_create(&self, index: i32) -> DriverResult<RawDevice>;

    fn device_open(&self, device: RawDevice) -> DriverResult<()>;

    /// Fill `buf` with the option value. A too-small buffer gets the required
    /// length and [`Status::InvalidDataLength`].
    fn device_get_option(
        &self,
        device: RawDevice,
        option: i32,
        buf: &mut IoBuffer,
    ) -> DriverResult<()>;

    fn device_close(&self, device: RawDevice) -> DriverResult<()>;

    fn device_destroy(&self, device: RawDevice) -> DriverResult<()>;

    // Graph

    fn graph_create(&self, name: &str) -> DriverResult<RawGraph>;

    /// Send a serialized graph to the device. No FIFOs are created.
    fn graph_allocate(&self, device: RawDevice, graph: RawGraph, buffer: &[u8])
        -> DriverResult<()>;

    /// Allocate the graph and create an input and an output FIFO bound to it.
    fn graph_allocate_with_fifos(
        &self,
        device: RawDevice,
        graph: RawGraph,
        buffer: &[u8],
        input: &FifoConfig,
        output: &FifoConfig,
    ) -> DriverResult<(RawFifo, RawFifo)>;

    fn graph_queue_inference(
        &self,
        graph: RawGraph,
        inputs: &[RawFifo],
        outputs: &[RawFifo],
    ) -> DriverResult<()>;

    /// Write one element to `input` and queue an inference in one call.
    fn graph_queue_inference_with_fifo_elem(
        &self,
        graph: RawGraph,
        input: RawFifo,
        output: RawFifo,
        tensor: &[u8],
        user: UserParam,
    ) -> DriverResult<()>;

    fn graph_get_option(&self, graph: RawGraph, option: i32, buf: &mut IoBuffer)
        -> DriverResult<()>;

    fn graph_destroy(&self, graph: RawGraph) -> DriverResult<()>;

    // FIFO

    fn fifo_create(&self, name: &str, fifo_type: FifoType) -> DriverResult<RawFifo>;

    fn fifo_allocate(
        &self,
        fifo: RawFifo,
        device: RawDevice,
        desc: &TensorDesc,
        num_elem: u32,
    ) -> DriverResult<()>;

    fn fifo_get_option(&self, fifo: RawFifo, option: i32, buf: &mut IoBuffer) -> DriverResult<()>;

    fn fifo_write_elem(&self, fifo: RawFifo, tensor: &[u8], user: UserParam) -> DriverResult<()>;

    /// Read one element into `buf`; the in/out length works as for options.
    fn fifo_read_elem(&self, fifo: RawFifo, buf: &mut IoBuffer) -> DriverResult<UserParam>;

    fn fifo_remove_elem(&self, fifo: RawFifo) -> DriverResult<()>;

    fn fifo_destroy(&self, fifo: RawFifo) -> DriverResult<()>;
}
