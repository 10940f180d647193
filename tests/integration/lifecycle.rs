//! Handle release tests: destroy nulls the handle, drop releases the rest

use crate::helpers::*;
use ncs::core::Operation;
use ncs::prelude::*;

/// Destroy nulls the handle; later use fails without reaching the driver.
#[test]
fn test_use_after_destroy() {
    let (ncs, driver) = test_ncs();
    let mut device = ncs.device(0).unwrap();
    device.destroy().unwrap();

    let calls = driver.calls().len();
    assert!(matches!(device.open(), Err(Error::Destroyed("device"))));
    assert!(matches!(device.state(), Err(Error::Destroyed(_))));
    assert!(matches!(device.destroy(), Err(Error::Destroyed(_))));
    assert_eq!(driver.calls().len(), calls);
}

#[test]
fn test_graph_and_fifo_destroy() {
    let (ncs, driver) = test_ncs();
    let (mut device, mut graph, mut queue) = allocated_graph(&ncs);

    queue.destroy().unwrap();
    assert!(queue.input.is_destroyed());
    assert!(queue.output.is_destroyed());
    assert!(matches!(queue.read(), Err(Error::Destroyed("fifo"))));

    graph.destroy().unwrap();
    assert!(matches!(graph.state(), Err(Error::Destroyed("graph"))));

    device.destroy().unwrap();
    assert_eq!(driver.live_handles(), 0);
}

/// A failed destroy keeps the handle so it can be retried.
#[test]
fn test_failed_destroy_keeps_handle() {
    let (ncs, driver) = test_ncs();
    let mut device = ncs.device(0).unwrap();

    driver.inject(Operation::DeviceDestroy, Status::Busy);
    let err = device.destroy().unwrap_err();
    assert_eq!(err.status(), Some(Status::Busy));
    assert!(!device.is_destroyed());

    device.destroy().unwrap();
    assert_eq!(driver.live_handles(), 0);
}

/// Dropping handles releases every one of them exactly once.
#[test]
fn test_drop_releases_all_handles() {
    let (ncs, driver) = test_ncs();
    {
        let (_device, graph, queue) = allocated_graph(&ncs);
        let _extra = ncs.fifo("extra", FifoType::HostRo).unwrap();
        graph.infer(&queue, &test_tensor(0.0), UserParam::NONE).unwrap();
        assert_eq!(driver.live_handles(), 5);
    }
    assert_eq!(driver.live_handles(), 0);
    assert_eq!(driver.call_count(Operation::DeviceDestroy), 1);
    assert_eq!(driver.call_count(Operation::GraphDestroy), 1);
    assert_eq!(driver.call_count(Operation::FifoDestroy), 3);
}

/// Explicitly destroyed handles are not destroyed again on drop.
#[test]
fn test_no_double_release() {
    let (ncs, driver) = test_ncs();
    {
        let mut graph = ncs.graph("once").unwrap();
        graph.destroy().unwrap();
    }
    assert_eq!(driver.call_count(Operation::GraphDestroy), 1);
}

/// A failing destroy during drop is logged, never panics.
#[test]
fn test_drop_failure_does_not_panic() {
    let (ncs, driver) = test_ncs();
    {
        let _graph = ncs.graph("stuck").unwrap();
        driver.inject(Operation::GraphDestroy, Status::MyriadError);
    }
    assert_eq!(driver.call_count(Operation::GraphDestroy), 1);
    assert_eq!(driver.live_handles(), 1);
}

/// Handles outlive the `Ncs` value that created them.
#[test]
fn test_handles_outlive_system() {
    let (ncs, driver) = test_ncs();
    let device = ncs.device(0).unwrap();
    drop(ncs);

    device.open().unwrap();
    drop(device);
    assert_eq!(driver.live_handles(), 0);
}
