//! Integration test modules for ncs

pub mod config;
pub mod device;
pub mod fifo;
pub mod graph;
pub mod lifecycle;
pub mod status;
