//! # 01 - Classify
//!
//! Run one inference on a compiled graph and print the top score.
//!
//! **Concepts:** Device lifecycle, graph allocation with FIFOs, element I/O
//!
//! ```bash
//! # On a Neural Compute Stick
//! cargo run --example 01_classify -- squeezenet_graph [input.f32] [labels.txt]
//!
//! # Without hardware
//! cargo run --example 01_classify -- --mock
//! ```
//!
//! `input.f32` holds raw little-endian FP32 values, already resized and
//! mean-centered for the network. Without it a synthetic ramp is used.

use ncs::prelude::*;
use ncs::MvncConfig;

const MOCK_GRAPH: &[u8] = b"mock-graph";

fn main() -> ncs::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mock = args.first().map(String::as_str) == Some("--mock");

    let (ncs, graph_file) = if mock {
        (Ncs::mock(MockConfig::default()), MOCK_GRAPH.to_vec())
    } else {
        let path = args.first().ok_or_else(|| {
            Error::InvalidConfig("usage: 01_classify <graph_file> | --mock".to_string())
        })?;
        (Ncs::mvnc(&MvncConfig::default())?, std::fs::read(path)?)
    };

    let device = ncs.device(0)?;
    device.open()?;
    println!("Opened {}", device.name()?);

    let graph = ncs.graph("ClassifyGraph")?;
    let queue = graph.allocate_with_fifos(&device, &graph_file, &GraphFifoOpts::default())?;

    let elem_size = queue.input.elem_data_size()? as usize;
    let input = match args.get(1).filter(|_| !mock) {
        Some(path) => std::fs::read(path)?,
        None => {
            let count = elem_size / 4;
            let values: Vec<f32> = (0..count).map(|i| i as f32 / count as f32 - 0.5).collect();
            f32_bytes(&values)
        }
    };
    println!("Input element: {} bytes", elem_size);

    graph.queue_inference_with_fifo_elem(&queue.input, &queue.output, &input, UserParam(1))?;
    let result = queue.output.read_elem()?;

    let scores = result
        .to_f32()
        .map_err(|e| Error::InvalidConfig(format!("output is not FP32: {}", e)))?;
    let labels: Vec<String> = match args.get(2).filter(|_| !mock) {
        Some(path) => std::fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };

    match scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
    {
        Some((index, score)) => {
            let label = labels.get(index).map_or("<no label>", String::as_str);
            println!("Top score: {:.4} at index {} ({})", score, index, label);
        }
        None => println!("Graph produced no scores"),
    }

    if let Some(ms) = graph.inference_time()?.first() {
        println!("Inference time: {:.2} ms", ms);
    }

    device.close()?;
    Ok(())
}
