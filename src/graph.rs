//! Owned graph handle.

use crate::device::Device;
use crate::error::{DriverResultExt, Error, Result};
use crate::fifo::{Fifo, FifoQueue, Tensor};
use crate::query;
use ncs_core::{
    Driver, GraphFifoOpts, GraphOption, GraphState, NcsOption, Operation, OptionValue, RawFifo,
    RawGraph, TensorDesc, UserParam,
};
use std::sync::Arc;

/// A neural network graph.
///
/// Created from a name, then allocated onto an opened [`Device`] from a
/// compiled graph file. Destroyed exactly once: by [`Graph::destroy`] or when
/// dropped.
pub struct Graph {
    driver: Arc<dyn Driver>,
    raw: Option<RawGraph>,
}

impl Graph {
    pub(crate) fn create(driver: Arc<dyn Driver>, name: &str) -> Result<Self> {
        let raw = driver.graph_create(name).during(Operation::GraphCreate)?;
        tracing::debug!(name, raw = ?raw, "graph created");
        Ok(Self {
            driver,
            raw: Some(raw),
        })
    }

    pub fn raw(&self) -> Result<RawGraph> {
        self.raw.ok_or(Error::Destroyed("graph"))
    }

    pub fn is_destroyed(&self) -> bool {
        self.raw.is_none()
    }

    /// Send the compiled graph to `device`. No FIFOs are created.
    pub fn allocate(&self, device: &Device, graph_file: &[u8]) -> Result<()> {
        self.driver
            .graph_allocate(device.raw()?, self.raw()?, graph_file)
            .during(Operation::GraphAllocate)
    }

    /// Allocate the graph and create its input and output FIFOs. Unset
    /// fields of `opts` take the defaults: capacity 2, FP32, input
    /// host-writable, output host-readable.
    pub fn allocate_with_fifos(
        &self,
        device: &Device,
        graph_file: &[u8],
        opts: &GraphFifoOpts,
    ) -> Result<FifoQueue> {
        let (input, output) = opts.resolve();
        let (fifo_in, fifo_out) = self
            .driver
            .graph_allocate_with_fifos(device.raw()?, self.raw()?, graph_file, &input, &output)
            .during(Operation::GraphAllocateWithFifos)?;
        tracing::debug!(input = ?fifo_in, output = ?fifo_out, "graph allocated with fifos");
        Ok(FifoQueue {
            input: Fifo::from_raw(self.driver.clone(), fifo_in),
            output: Fifo::from_raw(self.driver.clone(), fifo_out),
        })
    }

    pub fn allocate_with_fifos_default(&self, device: &Device, graph_file: &[u8]) -> Result<FifoQueue> {
        self.allocate_with_fifos(device, graph_file, &GraphFifoOpts::default())
    }

    /// Queue one inference reading from `inputs` and writing to `outputs`.
    pub fn queue_inference(&self, inputs: &[&Fifo], outputs: &[&Fifo]) -> Result<()> {
        let raw = self.raw()?;
        let inputs = raw_fifos(inputs)?;
        let outputs = raw_fifos(outputs)?;
        self.driver
            .graph_queue_inference(raw, &inputs, &outputs)
            .during(Operation::GraphQueueInference)
    }

    /// Write `tensor` to `input` and queue an inference in one call.
    pub fn queue_inference_with_fifo_elem(
        &self,
        input: &Fifo,
        output: &Fifo,
        tensor: &[u8],
        user: UserParam,
    ) -> Result<()> {
        self.driver
            .graph_queue_inference_with_fifo_elem(self.raw()?, input.raw()?, output.raw()?, tensor, user)
            .during(Operation::GraphQueueInferenceWithFifoElem)
    }

    /// Run one inference through `queue` and read its result.
    pub fn infer(&self, queue: &FifoQueue, tensor: &[u8], user: UserParam) -> Result<Tensor> {
        self.queue_inference_with_fifo_elem(&queue.input, &queue.output, tensor, user)?;
        queue.output.read_elem()
    }

    pub fn destroy(&mut self) -> Result<()> {
        let raw = self.raw()?;
        self.driver
            .graph_destroy(raw)
            .during(Operation::GraphDestroy)?;
        self.raw = None;
        Ok(())
    }

    pub fn get_option(&self, option: GraphOption) -> Result<Vec<u8>> {
        let raw = self.raw()?;
        query::query(option, Operation::GraphGetOption, |buf| {
            self.driver.graph_get_option(raw, option.code(), buf)
        })
    }

    pub fn get_option_with_byte_size(&self, option: GraphOption, size: usize) -> Result<Vec<u8>> {
        let raw = self.raw()?;
        query::query_sized(option, Operation::GraphGetOption, size, |buf| {
            self.driver.graph_get_option(raw, option.code(), buf)
        })
    }

    pub fn option_value(&self, option: GraphOption) -> Result<OptionValue> {
        query::decode(option, &self.get_option(option)?)
    }

    pub fn state(&self) -> Result<GraphState> {
        let option = GraphOption::RoState;
        query::coded(option, self.option_value(option)?, GraphState::from_code)
    }

    pub fn name(&self) -> Result<String> {
        let option = GraphOption::RoName;
        query::text(option, self.option_value(option)?)
    }

    /// Per-layer inference times of the last inference, in milliseconds.
    pub fn inference_time(&self) -> Result<Vec<f32>> {
        let option = GraphOption::RoInferenceTime;
        query::floats(option, self.option_value(option)?)
    }

    pub fn inference_time_size(&self) -> Result<u32> {
        self.uint(GraphOption::RoInferenceTimeSize)
    }

    pub fn input_count(&self) -> Result<u32> {
        self.uint(GraphOption::RoInputCount)
    }

    pub fn output_count(&self) -> Result<u32> {
        self.uint(GraphOption::RoOutputCount)
    }

    pub fn input_descriptors(&self) -> Result<Vec<TensorDesc>> {
        let option = GraphOption::RoInputTensorDescriptors;
        query::descs(option, self.option_value(option)?)
    }

    pub fn output_descriptors(&self) -> Result<Vec<TensorDesc>> {
        let option = GraphOption::RoOutputTensorDescriptors;
        query::descs(option, self.option_value(option)?)
    }

    pub fn option_class_limit(&self) -> Result<u32> {
        self.uint(GraphOption::RoOptionClassLimit)
    }

    pub fn version(&self) -> Result<Vec<u32>> {
        let option = GraphOption::RoVersion;
        query::uints(option, self.option_value(option)?)
    }

    fn uint(&self, option: GraphOption) -> Result<u32> {
        query::uint(option, self.option_value(option)?)
    }
}

fn raw_fifos(fifos: &[&Fifo]) -> Result<Vec<RawFifo>> {
    fifos.iter().map(|f| f.raw()).collect()
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph").field("raw", &self.raw).finish()
    }
}

impl Drop for Graph {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            if let Err(status) = self.driver.graph_destroy(raw) {
                tracing::warn!(raw = ?raw, status = %status, "Failed to destroy graph on drop");
            }
        }
    }
}
