//! In-process stand-in driver.
//!
//! `MockDriver` keeps a handle table instead of talking to hardware. Graphs
//! echo: one queued inference moves the oldest input element to the output
//! FIFO, resized to the output element size, with its user parameter. FIFO I/O
//! blocks like the real driver, bounded by [`MockConfig::io_timeout_ms`].
//!
//! Statuses can be queued per operation with [`MockDriver::inject`] to drive
//! error paths; the call log is available through [`MockDriver::calls`].

mod config;
mod table;

pub use config::MockConfig;

use crate::buffer::IoBuffer;
use crate::driver::{Driver, DriverResult};
use crate::fifo::FifoConfig;
use crate::handle::{RawDevice, RawFifo, RawGraph, UserParam};
use crate::option::{DeviceOption, FifoOption, GraphOption, NcsOption};
use crate::state::{DeviceState, FifoState, GraphState};
use crate::status::{Operation, Status};
use crate::tensor::{FifoType, TensorDesc, DEBUG_BUFFER_SIZE, MAX_NAME_SIZE, THERMAL_BUFFER_SIZE};
use crossbeam_channel::{RecvTimeoutError, SendTimeoutError};
use parking_lot::{Mutex, MutexGuard};
use std::time::Instant;
use table::{
    f32_bytes, suffixed_name, text_bytes, truncate_name, u32_bytes, DeviceEntry, Element, Entry,
    FifoEntry, GraphEntry, HandleTable, Queue,
};

const OPTION_CLASS_LIMIT: u32 = 1;
const MVTENSOR_VERSION: [u32; 2] = [2, 0];
const GRAPH_VERSION: [u32; 2] = [2, 0];

pub struct MockDriver {
    config: MockConfig,
    table: Mutex<HandleTable>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

impl MockDriver {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            table: Mutex::new(HandleTable::default()),
        }
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Make the next call of `op` return `status` before doing anything.
    /// Several injections for the same operation are consumed in order.
    pub fn inject(&self, op: Operation, status: Status) {
        self.table.lock().inject(op, status);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.table.lock().calls().to_vec()
    }

    pub fn call_count(&self, op: Operation) -> usize {
        self.table.lock().calls().iter().filter(|&&c| c == op).count()
    }

    /// Number of device, graph and FIFO handles not yet destroyed.
    pub fn live_handles(&self) -> usize {
        self.table.lock().len()
    }

    fn enter(&self, op: Operation) -> DriverResult<MutexGuard<'_, HandleTable>> {
        tracing::trace!(op = %op, "mock driver call");
        let mut table = self.table.lock();
        table.enter(op)?;
        Ok(table)
    }

    fn opened_device(table: &HandleTable, device: RawDevice) -> DriverResult<()> {
        match table.device(device.as_raw())?.state {
            DeviceState::Opened => Ok(()),
            _ => Err(Status::Unauthorized),
        }
    }

    fn allocate_fifo(
        &self,
        table: &mut HandleTable,
        fifo: usize,
        device: usize,
        graph_desc: TensorDesc,
        num_elem: u32,
    ) -> DriverResult<()> {
        let entry = table.fifo_mut(fifo)?;
        if entry.state == FifoState::Allocated {
            return Err(Status::Unauthorized);
        }
        let host_desc = graph_desc
            .try_with_data_type(entry.data_type)
            .ok_or(Status::InvalidParameters)?;
        entry.state = FifoState::Allocated;
        entry.device = Some(device);
        entry.graph_desc = Some(graph_desc);
        entry.host_desc = Some(host_desc);
        entry.capacity = num_elem;
        entry.queue = Some(Queue::bounded(num_elem));
        Ok(())
    }

    fn check_fifo_room(&self, table: &HandleTable, device: usize, extra: usize) -> DriverResult<()> {
        if table.fifos_on(device).count() + extra > self.config.max_fifo_count as usize {
            return Err(Status::OutOfMemory);
        }
        Ok(())
    }

    fn check_graph_room(&self, table: &HandleTable, device: usize) -> DriverResult<()> {
        if table.graphs_on(device).count() >= self.config.max_graph_count as usize {
            return Err(Status::OutOfMemory);
        }
        Ok(())
    }

    fn allocate_graph(
        &self,
        table: &mut HandleTable,
        device: RawDevice,
        graph: RawGraph,
        buffer: &[u8],
    ) -> DriverResult<()> {
        Self::opened_device(table, device)?;
        if table.graph(graph.as_raw())?.state != GraphState::Created {
            return Err(Status::Unauthorized);
        }
        if buffer.is_empty() {
            return Err(Status::InvalidParameters);
        }
        self.check_graph_room(table, device.as_raw())?;

        let entry = table.graph_mut(graph.as_raw())?;
        entry.state = GraphState::Allocated;
        entry.device = Some(device.as_raw());
        entry.buffer_len = buffer.len();
        entry.desc = Some(self.config.graph_tensor);
        Ok(())
    }

    fn write_element(
        &self,
        table: MutexGuard<'_, HandleTable>,
        fifo: RawFifo,
        tensor: &[u8],
        user: UserParam,
    ) -> DriverResult<()> {
        let entry = table.fifo(fifo.as_raw())?;
        if entry.fifo_type != FifoType::HostWo {
            return Err(Status::Unauthorized);
        }
        let queue = entry.queue.as_ref().ok_or(Status::NotAllocated)?;
        if tensor.len() != entry.elem_size() {
            return Err(Status::InvalidDataLength);
        }
        let tx = queue.tx.clone();
        drop(table);

        let element = Element {
            data: tensor.to_vec(),
            user,
        };
        tx.send_timeout(element, self.config.io_timeout())
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => Status::Timeout,
                SendTimeoutError::Disconnected(_) => Status::InvalidHandle,
            })
    }

    fn run_inference(
        &self,
        table: MutexGuard<'_, HandleTable>,
        graph: RawGraph,
        input: RawFifo,
        output: RawFifo,
    ) -> DriverResult<()> {
        if table.graph(graph.as_raw())?.state != GraphState::Allocated {
            return Err(Status::NotAllocated);
        }
        let input_entry = table.fifo(input.as_raw())?;
        let output_entry = table.fifo(output.as_raw())?;
        let rx = input_entry
            .queue
            .as_ref()
            .ok_or(Status::NotAllocated)?
            .rx
            .clone();
        let tx = output_entry
            .queue
            .as_ref()
            .ok_or(Status::NotAllocated)?
            .tx
            .clone();
        let out_size = output_entry.elem_size();
        drop(table);

        let started = Instant::now();
        let timeout = self.config.io_timeout();
        let mut element = rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => Status::Timeout,
            RecvTimeoutError::Disconnected => Status::InvalidHandle,
        })?;
        element.data.resize(out_size, 0);
        tx.send_timeout(element, timeout).map_err(|e| match e {
            SendTimeoutError::Timeout(_) => Status::Timeout,
            SendTimeoutError::Disconnected(_) => Status::InvalidHandle,
        })?;

        if let Ok(entry) = self.table.lock().graph_mut(graph.as_raw()) {
            entry.last_inference_ms = started.elapsed().as_secs_f32() * 1000.0;
        }
        Ok(())
    }

    fn device_option(
        &self,
        table: &HandleTable,
        device: RawDevice,
        option: DeviceOption,
    ) -> DriverResult<Vec<u8>> {
        let id = device.as_raw();
        let entry = table.device(id)?;
        let always_readable = matches!(option, DeviceOption::RoState | DeviceOption::RoName);
        if !always_readable && entry.state != DeviceState::Opened {
            return Err(Status::Unauthorized);
        }

        let value = match option {
            DeviceOption::RoState => u32_bytes(&[entry.state.code()]),
            DeviceOption::RoName => text_bytes(&entry.name, MAX_NAME_SIZE),
            DeviceOption::RoThermalStats => {
                f32_bytes(&[self.config.temperature; THERMAL_BUFFER_SIZE])
            }
            DeviceOption::RoThermalThrottle => u32_bytes(&[0]),
            DeviceOption::RoMemoryUsed => u32_bytes(&[table.memory_used(id)]),
            DeviceOption::RoMemorySize => u32_bytes(&[self.config.memory_size]),
            DeviceOption::RoMaxFifoCount => u32_bytes(&[self.config.max_fifo_count]),
            DeviceOption::RoAllocatedFifoCount => u32_bytes(&[table.fifos_on(id).count() as u32]),
            DeviceOption::RoMaxGraphCount => u32_bytes(&[self.config.max_graph_count]),
            DeviceOption::RoAllocatedGraphCount => {
                u32_bytes(&[table.graphs_on(id).count() as u32])
            }
            DeviceOption::RoClassLimit => u32_bytes(&[OPTION_CLASS_LIMIT]),
            DeviceOption::RoFirmwareVersion => u32_bytes(&self.config.firmware_version),
            DeviceOption::RoDebugInfo => text_bytes("", DEBUG_BUFFER_SIZE),
            DeviceOption::RoMvTensorVersion => u32_bytes(&MVTENSOR_VERSION),
            DeviceOption::RoHwVersion => u32_bytes(&[self.config.hw_version]),
            DeviceOption::RoMaxExecutors => return Err(Status::UnsupportedFeature),
        };
        Ok(value)
    }

    fn graph_option(
        &self,
        table: &HandleTable,
        graph: RawGraph,
        option: GraphOption,
    ) -> DriverResult<Vec<u8>> {
        let entry = table.graph(graph.as_raw())?;
        let always_readable = matches!(option, GraphOption::RoState | GraphOption::RoName);
        if !always_readable && entry.desc.is_none() {
            return Err(Status::NotAllocated);
        }

        let value = match option {
            GraphOption::RoState => u32_bytes(&[entry.state.code()]),
            GraphOption::RoName => text_bytes(&entry.name, MAX_NAME_SIZE),
            GraphOption::RoInferenceTime => f32_bytes(&[entry.last_inference_ms]),
            GraphOption::RoInferenceTimeSize => u32_bytes(&[1]),
            GraphOption::RoInputCount | GraphOption::RoOutputCount => u32_bytes(&[1]),
            GraphOption::RoInputTensorDescriptors | GraphOption::RoOutputTensorDescriptors => entry
                .desc
                .ok_or(Status::NotAllocated)?
                .to_le_bytes()
                .to_vec(),
            GraphOption::RoDebugInfo => text_bytes("", DEBUG_BUFFER_SIZE),
            GraphOption::RoOptionClassLimit => u32_bytes(&[OPTION_CLASS_LIMIT]),
            GraphOption::RoVersion => u32_bytes(&GRAPH_VERSION),
            GraphOption::RwExecutorsCount => return Err(Status::UnsupportedFeature),
        };
        Ok(value)
    }

    fn fifo_option(
        &self,
        table: &HandleTable,
        fifo: RawFifo,
        option: FifoOption,
    ) -> DriverResult<Vec<u8>> {
        let entry = table.fifo(fifo.as_raw())?;
        let always_readable = matches!(
            option,
            FifoOption::RwType
                | FifoOption::RwConsumerCount
                | FifoOption::RwDataType
                | FifoOption::RwDontBlock
                | FifoOption::RoState
                | FifoOption::RoName
        );
        if !always_readable && entry.state != FifoState::Allocated {
            return Err(Status::NotAllocated);
        }

        let level = entry.fill_level();
        let value = match option {
            FifoOption::RwType => u32_bytes(&[entry.fifo_type.code() as u32]),
            FifoOption::RwConsumerCount => u32_bytes(&[1]),
            FifoOption::RwDataType => u32_bytes(&[entry.data_type.code() as u32]),
            FifoOption::RwDontBlock => u32_bytes(&[0]),
            FifoOption::RoState => u32_bytes(&[entry.state.code()]),
            FifoOption::RoName => text_bytes(&entry.name, MAX_NAME_SIZE),
            FifoOption::RoCapacity => u32_bytes(&[entry.capacity]),
            FifoOption::RoReadFillLevel => match entry.fifo_type {
                FifoType::HostRo => u32_bytes(&[level]),
                FifoType::HostWo => u32_bytes(&[0]),
            },
            FifoOption::RoWriteFillLevel => match entry.fifo_type {
                FifoType::HostWo => u32_bytes(&[level]),
                FifoType::HostRo => u32_bytes(&[0]),
            },
            FifoOption::RoElementDataSize => u32_bytes(&[entry.elem_size() as u32]),
            FifoOption::RoGraphTensorDescriptor => entry
                .graph_desc
                .ok_or(Status::NotAllocated)?
                .to_le_bytes()
                .to_vec(),
            FifoOption::RwHostTensorDescriptor => entry
                .host_desc
                .ok_or(Status::NotAllocated)?
                .to_le_bytes()
                .to_vec(),
        };
        Ok(value)
    }
}

impl Driver for MockDriver {
    fn name(&self) -> &str {
        "mock"
    }

    fn device_create(&self, index: i32) -> DriverResult<RawDevice> {
        let mut table = self.enter(Operation::DeviceCreate)?;
        if index < 0 || index as u32 >= self.config.device_count {
            return Err(Status::DeviceNotFound);
        }
        let id = table.insert(Entry::Device(DeviceEntry {
            name: format!("mock-ncs-{}", index),
            state: DeviceState::Created,
        }));
        Ok(RawDevice::from_raw(id))
    }

    fn device_open(&self, device: RawDevice) -> DriverResult<()> {
        let mut table = self.enter(Operation::DeviceOpen)?;
        let entry = table.device_mut(device.as_raw())?;
        if entry.state == DeviceState::Opened {
            return Err(Status::Error);
        }
        entry.state = DeviceState::Opened;
        Ok(())
    }

    fn device_get_option(
        &self,
        device: RawDevice,
        option: i32,
        buf: &mut IoBuffer,
    ) -> DriverResult<()> {
        let table = self.enter(Operation::DeviceGetOption)?;
        let option = DeviceOption::from_code(option).ok_or(Status::InvalidParameters)?;
        let value = self.device_option(&table, device, option)?;
        buf.fill(&value)
    }

    fn device_close(&self, device: RawDevice) -> DriverResult<()> {
        let mut table = self.enter(Operation::DeviceClose)?;
        let entry = table.device_mut(device.as_raw())?;
        if entry.state != DeviceState::Opened {
            return Err(Status::Error);
        }
        entry.state = DeviceState::Closed;
        table.release_device(device.as_raw());
        Ok(())
    }

    fn device_destroy(&self, device: RawDevice) -> DriverResult<()> {
        let mut table = self.enter(Operation::DeviceDestroy)?;
        table.device(device.as_raw())?;
        table.release_device(device.as_raw());
        table.remove(device.as_raw());
        Ok(())
    }

    fn graph_create(&self, name: &str) -> DriverResult<RawGraph> {
        let mut table = self.enter(Operation::GraphCreate)?;
        let id = table.insert(Entry::Graph(GraphEntry {
            name: truncate_name(name),
            state: GraphState::Created,
            device: None,
            buffer_len: 0,
            desc: None,
            last_inference_ms: 0.0,
        }));
        Ok(RawGraph::from_raw(id))
    }

    fn graph_allocate(&self, device: RawDevice, graph: RawGraph, buffer: &[u8]) -> DriverResult<()> {
        let mut table = self.enter(Operation::GraphAllocate)?;
        self.allocate_graph(&mut table, device, graph, buffer)
    }

    fn graph_allocate_with_fifos(
        &self,
        device: RawDevice,
        graph: RawGraph,
        buffer: &[u8],
        input: &FifoConfig,
        output: &FifoConfig,
    ) -> DriverResult<(RawFifo, RawFifo)> {
        let mut table = self.enter(Operation::GraphAllocateWithFifos)?;
        if input.num_elem == 0 || output.num_elem == 0 {
            return Err(Status::InvalidParameters);
        }
        self.check_fifo_room(&table, device.as_raw(), 2)?;
        self.allocate_graph(&mut table, device, graph, buffer)?;

        let graph_entry = table.graph(graph.as_raw())?;
        let name = graph_entry.name.clone();
        let desc = graph_entry.desc.ok_or(Status::NotAllocated)?;

        let mut fifos = [0usize; 2];
        for (slot, (suffix, config)) in fifos
            .iter_mut()
            .zip([("_in", input), ("_out", output)])
        {
            let mut entry = FifoEntry::new(&suffixed_name(&name, suffix), config.fifo_type);
            entry.data_type = config.data_type;
            *slot = table.insert(Entry::Fifo(entry));
            self.allocate_fifo(&mut table, *slot, device.as_raw(), desc, config.num_elem)?;
        }
        Ok((RawFifo::from_raw(fifos[0]), RawFifo::from_raw(fifos[1])))
    }

    fn graph_queue_inference(
        &self,
        graph: RawGraph,
        inputs: &[RawFifo],
        outputs: &[RawFifo],
    ) -> DriverResult<()> {
        let table = self.enter(Operation::GraphQueueInference)?;
        match (inputs, outputs) {
            ([input], [output]) => self.run_inference(table, graph, *input, *output),
            _ => Err(Status::InvalidParameters),
        }
    }

    fn graph_queue_inference_with_fifo_elem(
        &self,
        graph: RawGraph,
        input: RawFifo,
        output: RawFifo,
        tensor: &[u8],
        user: UserParam,
    ) -> DriverResult<()> {
        let table = self.enter(Operation::GraphQueueInferenceWithFifoElem)?;
        table.graph(graph.as_raw())?;
        self.write_element(table, input, tensor, user)?;
        let table = self.table.lock();
        self.run_inference(table, graph, input, output)
    }

    fn graph_get_option(&self, graph: RawGraph, option: i32, buf: &mut IoBuffer) -> DriverResult<()> {
        let table = self.enter(Operation::GraphGetOption)?;
        let option = GraphOption::from_code(option).ok_or(Status::InvalidParameters)?;
        let value = self.graph_option(&table, graph, option)?;
        buf.fill(&value)
    }

    fn graph_destroy(&self, graph: RawGraph) -> DriverResult<()> {
        let mut table = self.enter(Operation::GraphDestroy)?;
        table.graph(graph.as_raw())?;
        table.remove(graph.as_raw());
        Ok(())
    }

    fn fifo_create(&self, name: &str, fifo_type: FifoType) -> DriverResult<RawFifo> {
        let mut table = self.enter(Operation::FifoCreate)?;
        let id = table.insert(Entry::Fifo(FifoEntry::new(name, fifo_type)));
        Ok(RawFifo::from_raw(id))
    }

    fn fifo_allocate(
        &self,
        fifo: RawFifo,
        device: RawDevice,
        desc: &TensorDesc,
        num_elem: u32,
    ) -> DriverResult<()> {
        let mut table = self.enter(Operation::FifoAllocate)?;
        Self::opened_device(&table, device)?;
        table.fifo(fifo.as_raw())?;
        if num_elem == 0 || desc.size == 0 {
            return Err(Status::InvalidParameters);
        }
        self.check_fifo_room(&table, device.as_raw(), 1)?;
        self.allocate_fifo(&mut table, fifo.as_raw(), device.as_raw(), *desc, num_elem)
    }

    fn fifo_get_option(&self, fifo: RawFifo, option: i32, buf: &mut IoBuffer) -> DriverResult<()> {
        let table = self.enter(Operation::FifoGetOption)?;
        let option = FifoOption::from_code(option).ok_or(Status::InvalidParameters)?;
        let value = self.fifo_option(&table, fifo, option)?;
        buf.fill(&value)
    }

    fn fifo_write_elem(&self, fifo: RawFifo, tensor: &[u8], user: UserParam) -> DriverResult<()> {
        let table = self.enter(Operation::FifoWriteElem)?;
        self.write_element(table, fifo, tensor, user)
    }

    fn fifo_read_elem(&self, fifo: RawFifo, buf: &mut IoBuffer) -> DriverResult<UserParam> {
        let table = self.enter(Operation::FifoReadElem)?;
        let entry = table.fifo(fifo.as_raw())?;
        if entry.fifo_type != FifoType::HostRo {
            return Err(Status::Unauthorized);
        }
        let queue = entry.queue.as_ref().ok_or(Status::NotAllocated)?;
        let elem_size = entry.elem_size();
        if buf.capacity() < elem_size {
            buf.set_len(elem_size);
            return Err(Status::InvalidDataLength);
        }
        let rx = queue.rx.clone();
        drop(table);

        let element = rx
            .recv_timeout(self.config.io_timeout())
            .map_err(|e| match e {
                RecvTimeoutError::Timeout => Status::Timeout,
                RecvTimeoutError::Disconnected => Status::InvalidHandle,
            })?;
        buf.fill(&element.data)?;
        Ok(element.user)
    }

    fn fifo_remove_elem(&self, _fifo: RawFifo) -> DriverResult<()> {
        let _table = self.enter(Operation::FifoRemoveElem)?;
        Err(Status::UnsupportedFeature)
    }

    fn fifo_destroy(&self, fifo: RawFifo) -> DriverResult<()> {
        let mut table = self.enter(Operation::FifoDestroy)?;
        table.fifo(fifo.as_raw())?;
        table.remove(fifo.as_raw());
        Ok(())
    }
}
