//! FIFO element I/O tests

use crate::helpers::*;
use ncs::core::Operation;
use ncs::prelude::*;
use ncs::FifoState;
use std::time::Duration;

/// Writing N elements and reading N back preserves order.
#[test]
fn test_write_n_read_n_in_order() {
    const N: u32 = 5;
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);
    let graph = ncs.graph("order").unwrap();
    let opts = GraphFifoOpts::default()
        .input(FifoOpts::default().num_elem(N))
        .output(FifoOpts::default().num_elem(N));
    let queue = graph.allocate_with_fifos(&device, GRAPH_FILE, &opts).unwrap();

    for i in 0..N {
        queue.write(&test_tensor(i as f32), UserParam(i as usize)).unwrap();
    }
    assert_eq!(queue.input.write_fill_level().unwrap(), N);

    for _ in 0..N {
        graph.queue_inference(&[&queue.input], &[&queue.output]).unwrap();
    }
    for i in 0..N {
        let tensor = queue.read().unwrap();
        assert_eq!(tensor.user, UserParam(i as usize));
        assert_eq!(tensor.data, test_tensor(i as f32));
    }
}

#[test]
fn test_write_to_full_fifo_times_out() {
    let (ncs, _driver) = test_ncs();
    let (_device, _graph, queue) = allocated_graph(&ncs);

    queue.write(&test_tensor(0.0), UserParam::NONE).unwrap();
    queue.write(&test_tensor(1.0), UserParam::NONE).unwrap();
    let err = queue.write(&test_tensor(2.0), UserParam::NONE).unwrap_err();
    assert_eq!(err.status(), Some(Status::Timeout));
}

#[test]
fn test_read_empty_fifo_times_out() {
    let (ncs, _driver) = test_ncs();
    let (_device, _graph, queue) = allocated_graph(&ncs);

    let err = queue.read().unwrap_err();
    assert_eq!(err.status(), Some(Status::Timeout));
    assert_eq!(err.operation(), Some(Operation::FifoReadElem));
}

#[test]
fn test_wrong_direction() {
    let (ncs, _driver) = test_ncs();
    let (_device, _graph, queue) = allocated_graph(&ncs);

    let err = queue
        .output
        .write_elem(&test_tensor(0.0), UserParam::NONE)
        .unwrap_err();
    assert_eq!(err.status(), Some(Status::Unauthorized));
    let err = queue.input.read_elem().unwrap_err();
    assert_eq!(err.status(), Some(Status::Unauthorized));
}

#[test]
fn test_wrong_element_length() {
    let (ncs, _driver) = test_ncs();
    let (_device, _graph, queue) = allocated_graph(&ncs);

    let err = queue.write(&[0u8; 3], UserParam::NONE).unwrap_err();
    assert_eq!(err.status(), Some(Status::InvalidDataLength));
}

#[test]
fn test_remove_elem_unsupported() {
    let (ncs, _driver) = test_ncs();
    let (_device, _graph, queue) = allocated_graph(&ncs);

    let err = queue.output.remove_elem().unwrap_err();
    assert_eq!(err.status(), Some(Status::UnsupportedFeature));
}

#[test]
fn test_dont_block_refused() {
    let (ncs, driver) = test_ncs();
    let (_device, _graph, queue) = allocated_graph(&ncs);
    let before = driver.call_count(Operation::FifoGetOption);

    let err = queue.input.get_option(FifoOption::RwDontBlock).unwrap_err();
    assert!(matches!(err, Error::OptionNotImplemented(_)));
    assert_eq!(driver.call_count(Operation::FifoGetOption), before);
}

#[test]
fn test_standalone_fifo() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);
    let fifo = ncs.fifo("standalone", FifoType::HostWo).unwrap();

    assert_eq!(fifo.state().unwrap(), FifoState::Created);
    assert_eq!(fifo.name().unwrap(), "standalone");
    assert_eq!(fifo.consumer_count().unwrap(), 1);
    let err = fifo.capacity().unwrap_err();
    assert_eq!(err.status(), Some(Status::NotAllocated));

    let desc = TensorDesc::new(1, 2, 4, 4, FifoDataType::Fp32);
    fifo.allocate(&device, &desc, 3).unwrap();
    assert_eq!(fifo.state().unwrap(), FifoState::Allocated);
    assert_eq!(fifo.capacity().unwrap(), 3);
    assert_eq!(fifo.graph_descriptor().unwrap(), desc);
    assert_eq!(fifo.host_descriptor().unwrap(), desc);
    assert_eq!(fifo.elem_data_size().unwrap(), desc.size);

    fifo.write_elem(&vec![0u8; desc.size as usize], UserParam::NONE)
        .unwrap();
    assert_eq!(fifo.write_fill_level().unwrap(), 1);
    assert_eq!(fifo.read_fill_level().unwrap(), 0);
}

#[test]
fn test_fifo_allocate_rejects_empty() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);
    let fifo = ncs.fifo("f", FifoType::HostRo).unwrap();
    let desc = TensorDesc::new(1, 1, 1, 1, FifoDataType::Fp32);

    let err = fifo.allocate(&device, &desc, 0).unwrap_err();
    assert_eq!(err.status(), Some(Status::InvalidParameters));
}

/// Closing the device releases FIFOs allocated on it.
#[test]
fn test_close_releases_fifo() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);
    let fifo = ncs.fifo("f", FifoType::HostWo).unwrap();
    fifo.allocate(&device, &TensorDesc::new(1, 1, 1, 1, FifoDataType::Fp32), 1)
        .unwrap();

    device.close().unwrap();
    assert_eq!(fifo.state().unwrap(), FifoState::Created);
}

/// A blocked read returns once another thread queues an inference.
#[test]
fn test_blocked_read_wakes_on_inference() {
    let (ncs, _driver) = test_ncs_with(test_config().io_timeout_ms(2000));
    let (_device, graph, queue) = allocated_graph(&ncs);
    let input = test_tensor(9.0);

    let tensor = std::thread::scope(|s| {
        let reader = s.spawn(|| queue.read());
        std::thread::sleep(Duration::from_millis(50));
        graph
            .queue_inference_with_fifo_elem(&queue.input, &queue.output, &input, UserParam(9))
            .unwrap();
        reader.join().unwrap()
    })
    .unwrap();

    assert_eq!(tensor.user, UserParam(9));
    assert_eq!(tensor.data, input);
}

/// Shapes whose byte size overflows are refused, not a panic.
#[test]
fn test_oversized_descriptor_refused() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);
    let fifo = ncs.fifo("big", FifoType::HostWo).unwrap();

    let desc = TensorDesc::new(1, 3, 40000, 40000, FifoDataType::Fp32);
    assert_eq!(desc.size, u32::MAX);
    let err = fifo.allocate(&device, &desc, 1).unwrap_err();
    assert_eq!(err.status(), Some(Status::InvalidParameters));
    assert_eq!(fifo.state().unwrap(), FifoState::Created);
}
