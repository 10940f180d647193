//! Test helpers and fixtures for ncs integration tests
//!
//! Every fixture runs against the in-process mock driver, so no hardware or
//! `libmvnc` is needed. The returned `Arc<MockDriver>` gives tests access to
//! status injection and the call log.

#![allow(dead_code)]

use ncs::core::mock::{MockConfig, MockDriver};
use ncs::prelude::*;
use std::sync::{Arc, Once};

/// Stand-in for a compiled graph file. The mock only checks it is non-empty.
pub const GRAPH_FILE: &[u8] = b"\x02\x00\x00\x00mock-graph";

/// Element size in bytes of the default mock graph with FP32 FIFOs.
pub const ELEM_SIZE: usize = 12 * 4;

/// Short I/O timeout so blocking reads fail fast.
pub const TEST_IO_TIMEOUT_MS: u64 = 50;

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness. Set `RUST_LOG`-style
/// verbosity with `NCS_TEST_LOG=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let level = match std::env::var("NCS_TEST_LOG").as_deref() {
            Ok("trace") => tracing::Level::TRACE,
            Ok("debug") => tracing::Level::DEBUG,
            _ => tracing::Level::WARN,
        };
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .try_init();
    });
}

pub fn test_config() -> MockConfig {
    MockConfig::default().io_timeout_ms(TEST_IO_TIMEOUT_MS)
}

/// Bindings over a fresh mock driver.
pub fn test_ncs() -> (Ncs, Arc<MockDriver>) {
    test_ncs_with(test_config())
}

pub fn test_ncs_with(config: MockConfig) -> (Ncs, Arc<MockDriver>) {
    init_tracing();
    let driver = Arc::new(MockDriver::new(config));
    let ncs = Ncs::builder()
        .driver(driver.clone())
        .build()
        .expect("Failed to build mock bindings");
    (ncs, driver)
}

/// Device 0, opened.
pub fn opened_device(ncs: &Ncs) -> Device {
    let device = ncs.device(0).expect("Failed to create device");
    device.open().expect("Failed to open device");
    device
}

/// Opened device plus a graph allocated with default FIFOs.
pub fn allocated_graph(ncs: &Ncs) -> (Device, Graph, FifoQueue) {
    let device = opened_device(ncs);
    let graph = ncs.graph("test-graph").expect("Failed to create graph");
    let queue = graph
        .allocate_with_fifos_default(&device, GRAPH_FILE)
        .expect("Failed to allocate graph");
    (device, graph, queue)
}

/// FP32 element of the default mock graph filled with `seed + i`.
pub fn test_tensor(seed: f32) -> Vec<u8> {
    let values: Vec<f32> = (0..ELEM_SIZE / 4).map(|i| seed + i as f32).collect();
    f32_bytes(&values)
}
