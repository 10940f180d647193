//! Raw C ABI of the Movidius Neural Compute SDK v2 (`libmvnc`).
//!
//! This crate only declares types, constants and function signatures. The
//! library itself is resolved at runtime by `ncs-mvnc`, so nothing here links
//! against `libmvnc` directly. Use the safe wrappers in `ncs` instead of these.

#![allow(non_camel_case_types, non_snake_case)]

use std::ffi::c_void;
use std::os::raw::{c_char, c_int, c_uint};

/// `ncStatus_t`
pub type ncStatus_t = c_int;

pub const NC_OK: ncStatus_t = 0;
pub const NC_BUSY: ncStatus_t = -1;
pub const NC_ERROR: ncStatus_t = -2;
pub const NC_OUT_OF_MEMORY: ncStatus_t = -3;
pub const NC_DEVICE_NOT_FOUND: ncStatus_t = -4;
pub const NC_INVALID_PARAMETERS: ncStatus_t = -5;
pub const NC_TIMEOUT: ncStatus_t = -6;
pub const NC_MVCMD_NOT_FOUND: ncStatus_t = -7;
pub const NC_NOT_ALLOCATED: ncStatus_t = -8;
pub const NC_UNAUTHORIZED: ncStatus_t = -9;
pub const NC_UNSUPPORTED_GRAPH_FILE: ncStatus_t = -10;
pub const NC_UNSUPPORTED_CONFIGURATION_FILE: ncStatus_t = -11;
pub const NC_UNSUPPORTED_FEATURE: ncStatus_t = -12;
pub const NC_MYRIAD_ERROR: ncStatus_t = -13;
pub const NC_INVALID_DATA_LENGTH: ncStatus_t = -14;
pub const NC_INVALID_HANDLE: ncStatus_t = -15;

/// `ncFifoType_t`
pub type ncFifoType_t = c_int;

pub const NC_FIFO_HOST_RO: ncFifoType_t = 0;
pub const NC_FIFO_HOST_WO: ncFifoType_t = 1;

/// `ncFifoDataType_t`
pub type ncFifoDataType_t = c_int;

pub const NC_FIFO_FP16: ncFifoDataType_t = 0;
pub const NC_FIFO_FP32: ncFifoDataType_t = 1;

pub const NC_MAX_NAME_SIZE: usize = 28;
pub const NC_THERMAL_BUFFER_SIZE: usize = 100;
pub const NC_DEBUG_BUFFER_SIZE: usize = 120;
pub const NC_VERSION_MAX_SIZE: usize = 4;

/// Option class bases. Device options start at 2000, graph options at 1000,
/// FIFO options at 0.
pub const NC_DEVICE_OPTION_BASE: c_int = 2000;
pub const NC_GRAPH_OPTION_BASE: c_int = 1000;
pub const NC_FIFO_OPTION_BASE: c_int = 0;

/// `struct ncTensorDescriptor_t`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ncTensorDescriptor_t {
    pub n: c_uint,
    pub c: c_uint,
    pub w: c_uint,
    pub h: c_uint,
    pub totalSize: c_uint,
    pub cStride: c_uint,
    pub wStride: c_uint,
    pub hStride: c_uint,
    pub dataType: ncFifoDataType_t,
}

/// Opaque `struct ncDeviceHandle_t`.
#[repr(C)]
pub struct ncDeviceHandle_t {
    _private: [u8; 0],
}

/// Opaque `struct ncGraphHandle_t`.
#[repr(C)]
pub struct ncGraphHandle_t {
    _private: [u8; 0],
}

/// Opaque `struct ncFifoHandle_t`.
#[repr(C)]
pub struct ncFifoHandle_t {
    _private: [u8; 0],
}

// Device

pub type ncDeviceCreate_fn =
    unsafe extern "C" fn(index: c_int, deviceHandle: *mut *mut ncDeviceHandle_t) -> ncStatus_t;
pub type ncDeviceOpen_fn = unsafe extern "C" fn(deviceHandle: *mut ncDeviceHandle_t) -> ncStatus_t;
pub type ncDeviceGetOption_fn = unsafe extern "C" fn(
    deviceHandle: *mut ncDeviceHandle_t,
    option: c_int,
    data: *mut c_void,
    dataLength: *mut c_uint,
) -> ncStatus_t;
pub type ncDeviceClose_fn = unsafe extern "C" fn(deviceHandle: *mut ncDeviceHandle_t) -> ncStatus_t;
pub type ncDeviceDestroy_fn =
    unsafe extern "C" fn(deviceHandle: *mut *mut ncDeviceHandle_t) -> ncStatus_t;

// Graph

pub type ncGraphCreate_fn =
    unsafe extern "C" fn(name: *const c_char, graphHandle: *mut *mut ncGraphHandle_t) -> ncStatus_t;
pub type ncGraphAllocate_fn = unsafe extern "C" fn(
    deviceHandle: *mut ncDeviceHandle_t,
    graphHandle: *mut ncGraphHandle_t,
    graphBuffer: *const c_void,
    graphBufferLength: c_uint,
) -> ncStatus_t;
pub type ncGraphAllocateWithFifosEx_fn = unsafe extern "C" fn(
    deviceHandle: *mut ncDeviceHandle_t,
    graphHandle: *mut ncGraphHandle_t,
    graphBuffer: *const c_void,
    graphBufferLength: c_uint,
    inFifoHandle: *mut *mut ncFifoHandle_t,
    inFifoType: ncFifoType_t,
    inNumElem: c_int,
    inDataType: ncFifoDataType_t,
    outFifoHandle: *mut *mut ncFifoHandle_t,
    outFifoType: ncFifoType_t,
    outNumElem: c_int,
    outDataType: ncFifoDataType_t,
) -> ncStatus_t;
pub type ncGraphQueueInference_fn = unsafe extern "C" fn(
    graphHandle: *mut ncGraphHandle_t,
    fifoIn: *mut *mut ncFifoHandle_t,
    inFifoCount: c_uint,
    fifoOut: *mut *mut ncFifoHandle_t,
    outFifoCount: c_uint,
) -> ncStatus_t;
pub type ncGraphQueueInferenceWithFifoElem_fn = unsafe extern "C" fn(
    graphHandle: *mut ncGraphHandle_t,
    fifoIn: *mut ncFifoHandle_t,
    fifoOut: *mut ncFifoHandle_t,
    inputTensor: *const c_void,
    inputTensorLength: *mut c_uint,
    userParam: *mut c_void,
) -> ncStatus_t;
pub type ncGraphGetOption_fn = unsafe extern "C" fn(
    graphHandle: *mut ncGraphHandle_t,
    option: c_int,
    data: *mut c_void,
    dataLength: *mut c_uint,
) -> ncStatus_t;
pub type ncGraphDestroy_fn =
    unsafe extern "C" fn(graphHandle: *mut *mut ncGraphHandle_t) -> ncStatus_t;

// FIFO

pub type ncFifoCreate_fn = unsafe extern "C" fn(
    name: *const c_char,
    fifoType: ncFifoType_t,
    fifoHandle: *mut *mut ncFifoHandle_t,
) -> ncStatus_t;
pub type ncFifoAllocate_fn = unsafe extern "C" fn(
    fifoHandle: *mut ncFifoHandle_t,
    deviceHandle: *mut ncDeviceHandle_t,
    tensorDesc: *mut ncTensorDescriptor_t,
    numElem: c_uint,
) -> ncStatus_t;
pub type ncFifoGetOption_fn = unsafe extern "C" fn(
    fifoHandle: *mut ncFifoHandle_t,
    option: c_int,
    data: *mut c_void,
    dataLength: *mut c_uint,
) -> ncStatus_t;
pub type ncFifoWriteElem_fn = unsafe extern "C" fn(
    fifoHandle: *mut ncFifoHandle_t,
    inputTensor: *const c_void,
    inputTensorLength: *mut c_uint,
    userParam: *mut c_void,
) -> ncStatus_t;
pub type ncFifoReadElem_fn = unsafe extern "C" fn(
    fifoHandle: *mut ncFifoHandle_t,
    outputData: *mut c_void,
    outputDataLen: *mut c_uint,
    userParam: *mut *mut c_void,
) -> ncStatus_t;
pub type ncFifoRemoveElem_fn = unsafe extern "C" fn(fifoHandle: *mut ncFifoHandle_t) -> ncStatus_t;
pub type ncFifoDestroy_fn = unsafe extern "C" fn(fifoHandle: *mut *mut ncFifoHandle_t) -> ncStatus_t;

/// Exported symbol names, NUL-terminated for `dlsym`.
pub mod symbols {
    pub const DEVICE_CREATE: &[u8] = b"ncDeviceCreate\0";
    pub const DEVICE_OPEN: &[u8] = b"ncDeviceOpen\0";
    pub const DEVICE_GET_OPTION: &[u8] = b"ncDeviceGetOption\0";
    pub const DEVICE_CLOSE: &[u8] = b"ncDeviceClose\0";
    pub const DEVICE_DESTROY: &[u8] = b"ncDeviceDestroy\0";

    pub const GRAPH_CREATE: &[u8] = b"ncGraphCreate\0";
    pub const GRAPH_ALLOCATE: &[u8] = b"ncGraphAllocate\0";
    pub const GRAPH_ALLOCATE_WITH_FIFOS_EX: &[u8] = b"ncGraphAllocateWithFifosEx\0";
    pub const GRAPH_QUEUE_INFERENCE: &[u8] = b"ncGraphQueueInference\0";
    pub const GRAPH_QUEUE_INFERENCE_WITH_FIFO_ELEM: &[u8] = b"ncGraphQueueInferenceWithFifoElem\0";
    pub const GRAPH_GET_OPTION: &[u8] = b"ncGraphGetOption\0";
    pub const GRAPH_DESTROY: &[u8] = b"ncGraphDestroy\0";

    pub const FIFO_CREATE: &[u8] = b"ncFifoCreate\0";
    pub const FIFO_ALLOCATE: &[u8] = b"ncFifoAllocate\0";
    pub const FIFO_GET_OPTION: &[u8] = b"ncFifoGetOption\0";
    pub const FIFO_WRITE_ELEM: &[u8] = b"ncFifoWriteElem\0";
    pub const FIFO_READ_ELEM: &[u8] = b"ncFifoReadElem\0";
    pub const FIFO_REMOVE_ELEM: &[u8] = b"ncFifoRemoveElem\0";
    pub const FIFO_DESTROY: &[u8] = b"ncFifoDestroy\0";
}
