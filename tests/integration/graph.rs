//! Graph allocation and inference tests

use crate::helpers::*;
use ncs::core::mock::MockConfig;
use ncs::prelude::*;
use ncs::GraphState;

/// Allocating with FIFOs and no explicit parameters gives capacity 2 and FP32
/// in both directions.
#[test]
fn test_default_fifos() {
    let (ncs, _driver) = test_ncs();
    let (_device, _graph, queue) = allocated_graph(&ncs);

    assert_eq!(queue.input.capacity().unwrap(), 2);
    assert_eq!(queue.output.capacity().unwrap(), 2);
    assert_eq!(queue.input.data_type().unwrap(), FifoDataType::Fp32);
    assert_eq!(queue.output.data_type().unwrap(), FifoDataType::Fp32);
    assert_eq!(queue.input.fifo_type().unwrap(), FifoType::HostWo);
    assert_eq!(queue.output.fifo_type().unwrap(), FifoType::HostRo);
    assert_eq!(queue.input.elem_data_size().unwrap() as usize, ELEM_SIZE);
}

#[test]
fn test_custom_fifo_opts() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);
    let graph = ncs.graph("custom").unwrap();

    let opts = GraphFifoOpts::default()
        .input(FifoOpts::default().num_elem(4))
        .output(FifoOpts::default().data_type(FifoDataType::Fp16));
    let queue = graph.allocate_with_fifos(&device, GRAPH_FILE, &opts).unwrap();

    assert_eq!(queue.input.capacity().unwrap(), 4);
    assert_eq!(queue.input.data_type().unwrap(), FifoDataType::Fp32);
    assert_eq!(queue.output.capacity().unwrap(), 2);
    assert_eq!(queue.output.data_type().unwrap(), FifoDataType::Fp16);
    assert_eq!(queue.output.elem_data_size().unwrap() as usize, ELEM_SIZE / 2);

    let host = queue.output.host_descriptor().unwrap();
    assert_eq!(host.data_type, FifoDataType::Fp16);
    assert_eq!(queue.output.graph_descriptor().unwrap(), graph.input_descriptors().unwrap()[0]);
}

#[test]
fn test_zero_capacity_rejected() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);
    let graph = ncs.graph("empty").unwrap();

    let opts = GraphFifoOpts::default().input(FifoOpts::default().num_elem(0));
    let err = graph.allocate_with_fifos(&device, GRAPH_FILE, &opts).unwrap_err();
    assert_eq!(err.status(), Some(Status::InvalidParameters));
}

#[test]
fn test_infer_echoes_tensor() {
    let (ncs, _driver) = test_ncs();
    let (_device, graph, queue) = allocated_graph(&ncs);

    let input = test_tensor(1.0);
    let result = graph.infer(&queue, &input, UserParam(42)).unwrap();
    assert_eq!(result.data, input);
    assert_eq!(result.user, UserParam(42));
    assert_eq!(result.to_f32().unwrap()[..3], [1.0, 2.0, 3.0]);
}

#[test]
fn test_queue_inference_separate_write() {
    let (ncs, _driver) = test_ncs();
    let (_device, graph, queue) = allocated_graph(&ncs);

    queue.write(&test_tensor(0.0), UserParam(1)).unwrap();
    assert_eq!(queue.input.write_fill_level().unwrap(), 1);

    graph.queue_inference(&[&queue.input], &[&queue.output]).unwrap();
    assert_eq!(queue.input.write_fill_level().unwrap(), 0);
    assert_eq!(queue.output.read_fill_level().unwrap(), 1);

    let result = queue.read().unwrap();
    assert_eq!(result.user, UserParam(1));
}

#[test]
fn test_queue_inference_needs_one_fifo_each_way() {
    let (ncs, _driver) = test_ncs();
    let (_device, graph, queue) = allocated_graph(&ncs);

    let err = graph.queue_inference(&[], &[&queue.output]).unwrap_err();
    assert_eq!(err.status(), Some(Status::InvalidParameters));
}

#[test]
fn test_inference_without_input_times_out() {
    let (ncs, _driver) = test_ncs();
    let (_device, graph, queue) = allocated_graph(&ncs);

    let err = graph
        .queue_inference(&[&queue.input], &[&queue.output])
        .unwrap_err();
    assert_eq!(err.status(), Some(Status::Timeout));
}

#[test]
fn test_graph_options() {
    let (ncs, _driver) = test_ncs();
    let (_device, graph, queue) = allocated_graph(&ncs);

    assert_eq!(graph.state().unwrap(), GraphState::Allocated);
    assert_eq!(graph.name().unwrap(), "test-graph");
    assert_eq!(graph.input_count().unwrap(), 1);
    assert_eq!(graph.output_count().unwrap(), 1);
    assert_eq!(graph.version().unwrap(), vec![2, 0]);
    assert_eq!(graph.option_class_limit().unwrap(), 1);
    assert_eq!(graph.inference_time_size().unwrap(), 1);

    let expected = MockConfig::default().graph_tensor;
    assert_eq!(graph.input_descriptors().unwrap(), vec![expected]);
    assert_eq!(graph.output_descriptors().unwrap(), vec![expected]);

    graph.infer(&queue, &test_tensor(0.0), UserParam::NONE).unwrap();
    let times = graph.inference_time().unwrap();
    assert_eq!(times.len(), 1);
    assert!(times[0] >= 0.0);
}

#[test]
fn test_unallocated_graph_options() {
    let (ncs, _driver) = test_ncs();
    let graph = ncs.graph("idle").unwrap();

    assert_eq!(graph.state().unwrap(), GraphState::Created);
    let err = graph.input_count().unwrap_err();
    assert_eq!(err.status(), Some(Status::NotAllocated));
}

#[test]
fn test_executors_count_refused() {
    let (ncs, _driver) = test_ncs();
    let (_device, graph, _queue) = allocated_graph(&ncs);

    let err = graph.get_option(GraphOption::RwExecutorsCount).unwrap_err();
    assert!(matches!(err, Error::OptionNotImplemented(_)));
}

#[test]
fn test_allocate_on_closed_device() {
    let (ncs, _driver) = test_ncs();
    let device = ncs.device(0).unwrap();
    let graph = ncs.graph("g").unwrap();

    let err = graph.allocate(&device, GRAPH_FILE).unwrap_err();
    assert_eq!(err.status(), Some(Status::Unauthorized));

    device.open().unwrap();
    graph.allocate(&device, GRAPH_FILE).unwrap();
    assert_eq!(graph.state().unwrap(), GraphState::Allocated);
}

#[test]
fn test_graph_limit() {
    let mut config = test_config();
    config.max_graph_count = 1;
    let (ncs, _driver) = test_ncs_with(config);
    let device = opened_device(&ncs);

    let first = ncs.graph("a").unwrap();
    first.allocate(&device, GRAPH_FILE).unwrap();
    let second = ncs.graph("b").unwrap();
    let err = second.allocate(&device, GRAPH_FILE).unwrap_err();
    assert_eq!(err.status(), Some(Status::OutOfMemory));
}

#[test]
fn test_long_graph_name_truncated() {
    let (ncs, _driver) = test_ncs();
    let graph = ncs.graph(&"n".repeat(64)).unwrap();
    assert_eq!(graph.name().unwrap().len(), ncs::MAX_NAME_SIZE - 1);
}

/// The classify flow: size the input from the FIFO, run one inference,
/// decode FP32 scores and pick the top one.
#[test]
fn test_classify_flow_top_score() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);
    let graph = ncs.graph("ClassifyGraph").unwrap();
    let queue = graph
        .allocate_with_fifos(&device, GRAPH_FILE, &GraphFifoOpts::default())
        .unwrap();

    let count = queue.input.elem_data_size().unwrap() as usize / 4;
    let mut values = vec![0.1f32; count];
    values[7] = 0.9;
    graph
        .queue_inference_with_fifo_elem(&queue.input, &queue.output, &f32_bytes(&values), UserParam(1))
        .unwrap();

    let scores = queue.output.read_elem().unwrap().to_f32().unwrap();
    let top = scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i);
    assert_eq!(scores.len(), count);
    assert_eq!(top, Some(7));
}

#[test]
fn test_fifo_names_keep_suffix() {
    let (ncs, _driver) = test_ncs();
    let device = opened_device(&ncs);
    let graph = ncs.graph(&"g".repeat(30)).unwrap();
    let queue = graph.allocate_with_fifos_default(&device, GRAPH_FILE).unwrap();

    let input = queue.input.name().unwrap();
    let output = queue.output.name().unwrap();
    assert!(input.ends_with("_in"), "{input}");
    assert!(output.ends_with("_out"), "{output}");
    assert_ne!(input, output);
    assert!(output.len() < ncs::MAX_NAME_SIZE);
}
