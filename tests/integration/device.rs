//! Device lifecycle and option tests

use crate::helpers::*;
use ncs::core::Operation;
use ncs::prelude::*;
use ncs::{DeviceHwVersion, DeviceState, ThermalThrottle, THERMAL_BUFFER_SIZE};

/// Create-then-destroy succeeds for every valid index and leaves no handle.
#[test]
fn test_create_destroy_every_index() {
    let (ncs, driver) = test_ncs_with(test_config().device_count(4));

    for index in 0..4 {
        let mut device = ncs.device(index).unwrap();
        assert_eq!(device.index(), index);
        device.destroy().unwrap();
        assert!(device.is_destroyed());
    }
    assert_eq!(driver.live_handles(), 0);
}

#[test]
fn test_missing_device() {
    let (ncs, _driver) = test_ncs();
    let err = ncs.device(1).unwrap_err();
    assert_eq!(err.status(), Some(Status::DeviceNotFound));
    assert_eq!(err.status().map(|s| s.code()), Some(-4));
}

/// Closing an already closed device surfaces the driver's error code.
#[test]
fn test_double_close() {
    let (ncs, _driver) = test_ncs();
    let device = ncs.device(0).unwrap();

    device.open().unwrap();
    device.close().unwrap();
    let err = device.close().unwrap_err();
    assert_eq!(err.status(), Some(Status::Error));
    assert_eq!(err.operation(), Some(Operation::DeviceClose));
}

#[test]
fn test_state_follows_lifecycle() {
    let (ncs, _driver) = test_ncs();
    let device = ncs.device(0).unwrap();

    assert_eq!(device.state().unwrap(), DeviceState::Created);
    device.open().unwrap();
    assert_eq!(device.state().unwrap(), DeviceState::Opened);
    device.close().unwrap();
    assert_eq!(device.state().unwrap(), DeviceState::Closed);
}

#[test]
fn test_device_options() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);

    assert_eq!(device.name().unwrap(), "mock-ncs-0");

    let temps = device.thermal_stats().unwrap();
    assert_eq!(temps.len(), THERMAL_BUFFER_SIZE);
    assert!(temps.iter().all(|&t| t == 45.0));

    assert_eq!(device.thermal_throttle().unwrap(), ThermalThrottle::NoThrottle);
    assert_eq!(device.memory_size().unwrap(), 500 * 1024 * 1024);
    assert_eq!(device.memory_used().unwrap(), 0);
    assert_eq!(device.max_graph_count().unwrap(), 10);
    assert_eq!(device.max_fifo_count().unwrap(), 20);
    assert_eq!(device.class_limit().unwrap(), 1);
    assert_eq!(device.firmware_version().unwrap(), vec![2, 10, 1, 0]);
    assert_eq!(device.mvtensor_version().unwrap(), vec![2, 0]);
    assert_eq!(device.hw_version().unwrap(), DeviceHwVersion::Ma2450);
}

#[test]
fn test_allocation_counts() {
    let (ncs, _driver) = test_ncs();
    let (device, _graph, _queue) = allocated_graph(&ncs);

    assert_eq!(device.allocated_graph_count().unwrap(), 1);
    assert_eq!(device.allocated_fifo_count().unwrap(), 2);
    let used = device.memory_used().unwrap() as usize;
    assert_eq!(used, GRAPH_FILE.len() + 2 * 2 * ELEM_SIZE);
}

/// Most options need an opened device.
#[test]
fn test_option_before_open() {
    let (ncs, _driver) = test_ncs();
    let device = ncs.device(0).unwrap();

    let err = device.memory_size().unwrap_err();
    assert_eq!(err.status(), Some(Status::Unauthorized));
    assert!(device.name().is_ok());
}

#[test]
fn test_refused_options_skip_driver() {
    let (ncs, driver) = test_ncs();
    let device = opened_device(&ncs);
    let before = driver.call_count(Operation::DeviceGetOption);

    for option in [DeviceOption::RoDebugInfo, DeviceOption::RoMaxExecutors] {
        let err = device.get_option(option).unwrap_err();
        assert!(matches!(err, Error::OptionNotImplemented(_)), "{option}");
        let err = device.get_option_with_byte_size(option, 4).unwrap_err();
        assert!(matches!(err, Error::OptionNotImplemented(_)), "{option}");
    }
    assert_eq!(driver.call_count(Operation::DeviceGetOption), before);
}

/// Two-phase query: one probe call, one read.
#[test]
fn test_get_option_probes_length() {
    let (ncs, driver) = test_ncs();
    let device = opened_device(&ncs);
    let before = driver.call_count(Operation::DeviceGetOption);

    let bytes = device.get_option(DeviceOption::RoThermalStats).unwrap();
    assert_eq!(bytes.len(), THERMAL_BUFFER_SIZE * 4);
    assert_eq!(driver.call_count(Operation::DeviceGetOption), before + 2);
}

#[test]
fn test_get_option_with_byte_size() {
    let (ncs, driver) = test_ncs();
    let device = opened_device(&ncs);
    let before = driver.call_count(Operation::DeviceGetOption);

    let bytes = device
        .get_option_with_byte_size(DeviceOption::RoMemorySize, 4)
        .unwrap();
    assert_eq!(bytes, (500u32 * 1024 * 1024).to_le_bytes());
    assert_eq!(driver.call_count(Operation::DeviceGetOption), before + 1);

    let err = device
        .get_option_with_byte_size(DeviceOption::RoThermalStats, 8)
        .unwrap_err();
    assert_eq!(err.status(), Some(Status::InvalidDataLength));
}

#[test]
fn test_option_value_decodes() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);

    let value = device.option_value(DeviceOption::RoName).unwrap();
    assert_eq!(value.as_text(), Some("mock-ncs-0"));
    let value = device.option_value(DeviceOption::RoState).unwrap();
    assert_eq!(value.as_uint(), Some(DeviceState::Opened.code()));
}
