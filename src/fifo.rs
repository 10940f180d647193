//! Owned FIFO handles and the elements read from them.

use crate::device::Device;
use crate::error::{DriverResultExt, Error, Result};
use crate::query;
use ncs_core::{
    Driver, FifoDataType, FifoOption, FifoState, FifoType, IoBuffer, NcsOption, Operation,
    OptionDecodeError, OptionValue, RawFifo, TensorDesc, UserParam,
};
use std::sync::Arc;

/// One element read back from a FIFO.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub data: Vec<u8>,
    /// Value passed with the element when it was written.
    pub user: UserParam,
}

impl Tensor {
    pub fn new(data: Vec<u8>, user: UserParam) -> Self {
        Self { data, user }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reinterpret the bytes as little-endian FP32 values.
    pub fn to_f32(&self) -> std::result::Result<Vec<f32>, OptionDecodeError> {
        if self.data.len() % 4 != 0 {
            return Err(OptionDecodeError::Misaligned {
                len: self.data.len(),
                elem_size: 4,
            });
        }
        Ok(self
            .data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Encode FP32 values as element bytes.
pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A queue of tensors between host and device.
///
/// Created by [`Ncs::fifo`](crate::Ncs::fifo) or by allocating a graph with
/// FIFOs. Destroyed exactly once: by [`Fifo::destroy`] or when dropped.
pub struct Fifo {
    driver: Arc<dyn Driver>,
    raw: Option<RawFifo>,
}

impl Fifo {
    pub(crate) fn create(driver: Arc<dyn Driver>, name: &str, fifo_type: FifoType) -> Result<Self> {
        let raw = driver
            .fifo_create(name, fifo_type)
            .during(Operation::FifoCreate)?;
        tracing::debug!(name, fifo_type = %fifo_type, raw = ?raw, "fifo created");
        Ok(Self::from_raw(driver, raw))
    }

    pub(crate) fn from_raw(driver: Arc<dyn Driver>, raw: RawFifo) -> Self {
        Self {
            driver,
            raw: Some(raw),
        }
    }

    pub fn raw(&self) -> Result<RawFifo> {
        self.raw.ok_or(Error::Destroyed("fifo"))
    }

    pub fn is_destroyed(&self) -> bool {
        self.raw.is_none()
    }

    /// Allocate room for `num_elem` elements shaped by `desc` on `device`.
    pub fn allocate(&self, device: &Device, desc: &TensorDesc, num_elem: u32) -> Result<()> {
        self.driver
            .fifo_allocate(self.raw()?, device.raw()?, desc, num_elem)
            .during(Operation::FifoAllocate)
    }

    pub fn write_elem(&self, data: &[u8], user: UserParam) -> Result<()> {
        self.driver
            .fifo_write_elem(self.raw()?, data, user)
            .during(Operation::FifoWriteElem)
    }

    /// Read the oldest element. The buffer is sized from the FIFO's element
    /// data size.
    pub fn read_elem(&self) -> Result<Tensor> {
        let raw = self.raw()?;
        let size = self.elem_data_size()? as usize;
        let mut buf = IoBuffer::with_capacity(size);
        let user = self
            .driver
            .fifo_read_elem(raw, &mut buf)
            .during(Operation::FifoReadElem)?;
        Ok(Tensor::new(buf.into_vec(), user))
    }

    /// Drop the oldest element without reading it.
    pub fn remove_elem(&self) -> Result<()> {
        self.driver
            .fifo_remove_elem(self.raw()?)
            .during(Operation::FifoRemoveElem)
    }

    /// Destroy the handle. On success every later call returns
    /// [`Error::Destroyed`].
    pub fn destroy(&mut self) -> Result<()> {
        let raw = self.raw()?;
        self.driver
            .fifo_destroy(raw)
            .during(Operation::FifoDestroy)?;
        self.raw = None;
        Ok(())
    }

    pub fn get_option(&self, option: FifoOption) -> Result<Vec<u8>> {
        let raw = self.raw()?;
        query::query(option, Operation::FifoGetOption, |buf| {
            self.driver.fifo_get_option(raw, option.code(), buf)
        })
    }

    pub fn get_option_with_byte_size(&self, option: FifoOption, size: usize) -> Result<Vec<u8>> {
        let raw = self.raw()?;
        query::query_sized(option, Operation::FifoGetOption, size, |buf| {
            self.driver.fifo_get_option(raw, option.code(), buf)
        })
    }

    pub fn option_value(&self, option: FifoOption) -> Result<OptionValue> {
        query::decode(option, &self.get_option(option)?)
    }

    pub fn fifo_type(&self) -> Result<FifoType> {
        let option = FifoOption::RwType;
        query::coded(option, self.option_value(option)?, |c| {
            FifoType::from_code(c as i32)
        })
    }

    pub fn data_type(&self) -> Result<FifoDataType> {
        let option = FifoOption::RwDataType;
        query::coded(option, self.option_value(option)?, |c| {
            FifoDataType::from_code(c as i32)
        })
    }

    pub fn consumer_count(&self) -> Result<u32> {
        self.uint(FifoOption::RwConsumerCount)
    }

    pub fn capacity(&self) -> Result<u32> {
        self.uint(FifoOption::RoCapacity)
    }

    pub fn read_fill_level(&self) -> Result<u32> {
        self.uint(FifoOption::RoReadFillLevel)
    }

    pub fn write_fill_level(&self) -> Result<u32> {
        self.uint(FifoOption::RoWriteFillLevel)
    }

    pub fn elem_data_size(&self) -> Result<u32> {
        self.uint(FifoOption::RoElementDataSize)
    }

    pub fn state(&self) -> Result<FifoState> {
        let option = FifoOption::RoState;
        query::coded(option, self.option_value(option)?, FifoState::from_code)
    }

    pub fn name(&self) -> Result<String> {
        let option = FifoOption::RoName;
        query::text(option, self.option_value(option)?)
    }

    /// Tensor layout on the graph side.
    pub fn graph_descriptor(&self) -> Result<TensorDesc> {
        let option = FifoOption::RoGraphTensorDescriptor;
        query::desc(option, self.option_value(option)?)
    }

    /// Tensor layout of the elements the host reads and writes.
    pub fn host_descriptor(&self) -> Result<TensorDesc> {
        let option = FifoOption::RwHostTensorDescriptor;
        query::desc(option, self.option_value(option)?)
    }

    fn uint(&self, option: FifoOption) -> Result<u32> {
        query::uint(option, self.option_value(option)?)
    }
}

impl std::fmt::Debug for Fifo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fifo").field("raw", &self.raw).finish()
    }
}

impl Drop for Fifo {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            if let Err(status) = self.driver.fifo_destroy(raw) {
                tracing::warn!(raw = ?raw, status = %status, "Failed to destroy fifo on drop");
            }
        }
    }
}

/// Input and output FIFO created together with a graph.
#[derive(Debug)]
pub struct FifoQueue {
    pub input: Fifo,
    pub output: Fifo,
}

impl FifoQueue {
    pub fn write(&self, data: &[u8], user: UserParam) -> Result<()> {
        self.input.write_elem(data, user)
    }

    pub fn read(&self) -> Result<Tensor> {
        self.output.read_elem()
    }

    /// Destroy both FIFOs, input first. Both are attempted; the first error
    /// is returned.
    pub fn destroy(&mut self) -> Result<()> {
        let input = self.input.destroy();
        let output = self.output.destroy();
        input.and(output)
    }
}
