//! Handle table of the mock driver.

use crate::handle::UserParam;
use crate::state::{DeviceState, FifoState, GraphState};
use crate::status::{Operation, Status};
use crate::tensor::{FifoDataType, FifoType, TensorDesc, MAX_NAME_SIZE};
use crossbeam_channel::{Receiver, Sender};
use std::collections::{HashMap, VecDeque};

pub(super) struct Element {
    pub data: Vec<u8>,
    pub user: UserParam,
}

pub(super) struct Queue {
    pub tx: Sender<Element>,
    pub rx: Receiver<Element>,
}

impl Queue {
    pub fn bounded(capacity: u32) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(capacity as usize);
        Self { tx, rx }
    }
}

pub(super) struct DeviceEntry {
    pub name: String,
    pub state: DeviceState,
}

pub(super) struct GraphEntry {
    pub name: String,
    pub state: GraphState,
    pub device: Option<usize>,
    pub buffer_len: usize,
    pub desc: Option<TensorDesc>,
    pub last_inference_ms: f32,
}

pub(super) struct FifoEntry {
    pub name: String,
    pub fifo_type: FifoType,
    pub data_type: FifoDataType,
    pub state: FifoState,
    pub device: Option<usize>,
    pub graph_desc: Option<TensorDesc>,
    pub host_desc: Option<TensorDesc>,
    pub capacity: u32,
    pub queue: Option<Queue>,
}

impl FifoEntry {
    pub fn new(name: &str, fifo_type: FifoType) -> Self {
        Self {
            name: truncate_name(name),
            fifo_type,
            data_type: FifoDataType::Fp32,
            state: FifoState::Created,
            device: None,
            graph_desc: None,
            host_desc: None,
            capacity: 0,
            queue: None,
        }
    }

    pub fn elem_size(&self) -> usize {
        self.host_desc.map_or(0, |d| d.size as usize)
    }

    pub fn fill_level(&self) -> u32 {
        self.queue.as_ref().map_or(0, |q| q.rx.len() as u32)
    }

    pub fn release(&mut self) {
        self.state = FifoState::Created;
        self.device = None;
        self.queue = None;
    }
}

pub(super) enum Entry {
    Device(DeviceEntry),
    Graph(GraphEntry),
    Fifo(FifoEntry),
}

#[derive(Default)]
pub(super) struct HandleTable {
    next_id: usize,
    entries: HashMap<usize, Entry>,
    injected: HashMap<Operation, VecDeque<Status>>,
    calls: Vec<Operation>,
}

macro_rules! accessors {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self, id: usize) -> Result<&$ty, Status> {
            match self.entries.get(&id) {
                Some(Entry::$variant(e)) => Ok(e),
                _ => Err(Status::InvalidHandle),
            }
        }

        pub fn $get_mut(&mut self, id: usize) -> Result<&mut $ty, Status> {
            match self.entries.get_mut(&id) {
                Some(Entry::$variant(e)) => Ok(e),
                _ => Err(Status::InvalidHandle),
            }
        }
    };
}

impl HandleTable {
    accessors!(device, device_mut, Device, DeviceEntry);
    accessors!(graph, graph_mut, Graph, GraphEntry);
    accessors!(fifo, fifo_mut, Fifo, FifoEntry);

    /// Ids start at 1 so no token is ever the null handle.
    pub fn insert(&mut self, entry: Entry) -> usize {
        self.next_id += 1;
        self.entries.insert(self.next_id, entry);
        self.next_id
    }

    pub fn remove(&mut self, id: usize) -> Option<Entry> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Record a call and pop a status queued for it.
    pub fn enter(&mut self, op: Operation) -> Result<(), Status> {
        self.calls.push(op);
        match self.injected.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(status) if !status.is_ok() => Err(status),
            _ => Ok(()),
        }
    }

    pub fn inject(&mut self, op: Operation, status: Status) {
        self.injected.entry(op).or_default().push_back(status);
    }

    pub fn calls(&self) -> &[Operation] {
        &self.calls
    }

    pub fn graphs_on(&self, device: usize) -> impl Iterator<Item = &GraphEntry> {
        self.entries.values().filter_map(move |e| match e {
            Entry::Graph(g) if g.device == Some(device) => Some(g),
            _ => None,
        })
    }

    pub fn fifos_on(&self, device: usize) -> impl Iterator<Item = &FifoEntry> {
        self.entries.values().filter_map(move |e| match e {
            Entry::Fifo(f) if f.device == Some(device) => Some(f),
            _ => None,
        })
    }

    /// Drop every graph and FIFO allocation held on `device`.
    pub fn release_device(&mut self, device: usize) {
        for entry in self.entries.values_mut() {
            match entry {
                Entry::Graph(g) if g.device == Some(device) => {
                    g.state = GraphState::Created;
                    g.device = None;
                    g.desc = None;
                    g.buffer_len = 0;
                }
                Entry::Fifo(f) if f.device == Some(device) => f.release(),
                _ => {}
            }
        }
    }

    pub fn memory_used(&self, device: usize) -> u32 {
        let graphs: usize = self.graphs_on(device).map(|g| g.buffer_len).sum();
        let fifos: usize = self
            .fifos_on(device)
            .map(|f| f.capacity as usize * f.elem_size())
            .sum();
        (graphs + fifos).min(u32::MAX as usize) as u32
    }
}

/// Names keep at most `MAX_NAME_SIZE - 1` bytes, leaving room for the NUL.
pub(super) fn truncate_name(name: &str) -> String {
    let mut end = name.len().min(MAX_NAME_SIZE - 1);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

/// `base` shortened so that `base` + `suffix` still fits a driver name.
pub(super) fn suffixed_name(base: &str, suffix: &str) -> String {
    let limit = (MAX_NAME_SIZE - 1).saturating_sub(suffix.len());
    let mut end = base.len().min(limit);
    while !base.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &base[..end], suffix)
}

/// NUL-padded text option value.
pub(super) fn text_bytes(text: &str, size: usize) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.truncate(size.saturating_sub(1));
    bytes.resize(size, 0);
    bytes
}

pub(super) fn u32_bytes(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub(super) fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
