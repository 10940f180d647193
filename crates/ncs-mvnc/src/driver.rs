//! [`Driver`] over the native library.
//!
//! Every method casts its arguments, calls the resolved entry point once and
//! converts the returned integer with [`Status::check`]. Handle tokens carry
//! the driver's pointer values.

use crate::api::Api;
use crate::config::MvncConfig;
use crate::error::{Error, Result};
use ncs_core::{
    Driver, DriverResult, FifoConfig, FifoType, IoBuffer, RawDevice, RawFifo, RawGraph, Status,
    TensorDesc, UserParam,
};
use ncs_sys as sys;
use std::ffi::{c_void, CString};
use std::os::raw::c_uint;
use std::path::{Path, PathBuf};
use std::ptr;

fn device_ptr(device: RawDevice) -> *mut sys::ncDeviceHandle_t {
    device.as_raw() as *mut sys::ncDeviceHandle_t
}

fn graph_ptr(graph: RawGraph) -> *mut sys::ncGraphHandle_t {
    graph.as_raw() as *mut sys::ncGraphHandle_t
}

fn fifo_ptr(fifo: RawFifo) -> *mut sys::ncFifoHandle_t {
    fifo.as_raw() as *mut sys::ncFifoHandle_t
}

fn c_name(name: &str) -> DriverResult<CString> {
    CString::new(name).map_err(|_| Status::InvalidParameters)
}

fn c_len(len: usize) -> DriverResult<c_uint> {
    c_uint::try_from(len).map_err(|_| Status::InvalidParameters)
}

/// Output pointer for the in/out data of an option or element read. An empty
/// buffer passes NULL, which the driver answers with the required length.
fn data_ptr(buf: &mut IoBuffer) -> *mut c_void {
    if buf.capacity() == 0 {
        ptr::null_mut()
    } else {
        buf.as_mut_slice().as_mut_ptr().cast()
    }
}

/// Native NCAPI driver backed by `libmvnc`.
pub struct MvncDriver {
    api: Api,
    path: PathBuf,
}

impl MvncDriver {
    /// Load the library from the first candidate path that opens.
    pub fn load(config: &MvncConfig) -> Result<Self> {
        let mut last_err = None;
        for path in config.candidates() {
            match Self::load_from(&path) {
                Ok(driver) => return Ok(driver),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "libmvnc candidate failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| Error::LoadFailed {
            path: PathBuf::new(),
            reason: "no library candidates".into(),
        }))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let api = Api::load(path)?;
        tracing::info!(path = %path.display(), "Loaded libmvnc");
        Ok(Self {
            api,
            path: path.to_path_buf(),
        })
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_option(
        &self,
        call: impl FnOnce(*mut c_void, *mut c_uint) -> sys::ncStatus_t,
        buf: &mut IoBuffer,
    ) -> DriverResult<()> {
        let mut len = c_len(buf.capacity())?;
        let status = call(data_ptr(buf), &mut len as *mut c_uint);
        buf.set_len(len as usize);
        Status::check(status)
    }
}

impl Driver for MvncDriver {
    fn name(&self) -> &str {
        "mvnc"
    }

    fn device_create(&self, index: i32) -> DriverResult<RawDevice> {
        let mut handle: *mut sys::ncDeviceHandle_t = ptr::null_mut();
        // Safety: `handle` is a valid out-pointer for the call.
        Status::check(unsafe { (self.api.device_create)(index, &mut handle) })?;
        Ok(RawDevice::from_raw(handle as usize))
    }

    fn device_open(&self, device: RawDevice) -> DriverResult<()> {
        // Safety: the token came from `device_create`.
        Status::check(unsafe { (self.api.device_open)(device_ptr(device)) })
    }

    fn device_get_option(
        &self,
        device: RawDevice,
        option: i32,
        buf: &mut IoBuffer,
    ) -> DriverResult<()> {
        self.get_option(
            // Safety: data points to `len` writable bytes or is NULL.
            |data, len| unsafe { (self.api.device_get_option)(device_ptr(device), option, data, len) },
            buf,
        )
    }

    fn device_close(&self, device: RawDevice) -> DriverResult<()> {
        // Safety: the token came from `device_create`.
        Status::check(unsafe { (self.api.device_close)(device_ptr(device)) })
    }

    fn device_destroy(&self, device: RawDevice) -> DriverResult<()> {
        let mut handle = device_ptr(device);
        // Safety: the driver frees the handle and nulls our local copy.
        Status::check(unsafe { (self.api.device_destroy)(&mut handle) })
    }

    fn graph_create(&self, name: &str) -> DriverResult<RawGraph> {
        let name = c_name(name)?;
        let mut handle: *mut sys::ncGraphHandle_t = ptr::null_mut();
        // Safety: `name` is NUL-terminated and outlives the call.
        Status::check(unsafe { (self.api.graph_create)(name.as_ptr(), &mut handle) })?;
        Ok(RawGraph::from_raw(handle as usize))
    }

    fn graph_allocate(&self, device: RawDevice, graph: RawGraph, buffer: &[u8]) -> DriverResult<()> {
        let len = c_len(buffer.len())?;
        // Safety: the driver copies `len` bytes from `buffer`.
        Status::check(unsafe {
            (self.api.graph_allocate)(
                device_ptr(device),
                graph_ptr(graph),
                buffer.as_ptr().cast(),
                len,
            )
        })
    }

    fn graph_allocate_with_fifos(
        &self,
        device: RawDevice,
        graph: RawGraph,
        buffer: &[u8],
        input: &FifoConfig,
        output: &FifoConfig,
    ) -> DriverResult<(RawFifo, RawFifo)> {
        let len = c_len(buffer.len())?;
        let in_elems = i32::try_from(input.num_elem).map_err(|_| Status::InvalidParameters)?;
        let out_elems = i32::try_from(output.num_elem).map_err(|_| Status::InvalidParameters)?;
        let mut fifo_in: *mut sys::ncFifoHandle_t = ptr::null_mut();
        let mut fifo_out: *mut sys::ncFifoHandle_t = ptr::null_mut();
        // Safety: buffer is read-only for the call; both FIFO out-pointers are valid.
        Status::check(unsafe {
            (self.api.graph_allocate_with_fifos)(
                device_ptr(device),
                graph_ptr(graph),
                buffer.as_ptr().cast(),
                len,
                &mut fifo_in,
                input.fifo_type.code(),
                in_elems,
                input.data_type.code(),
                &mut fifo_out,
                output.fifo_type.code(),
                out_elems,
                output.data_type.code(),
            )
        })?;
        Ok((
            RawFifo::from_raw(fifo_in as usize),
            RawFifo::from_raw(fifo_out as usize),
        ))
    }

    fn graph_queue_inference(
        &self,
        graph: RawGraph,
        inputs: &[RawFifo],
        outputs: &[RawFifo],
    ) -> DriverResult<()> {
        let mut ins: Vec<_> = inputs.iter().copied().map(fifo_ptr).collect();
        let mut outs: Vec<_> = outputs.iter().copied().map(fifo_ptr).collect();
        let in_count = c_len(ins.len())?;
        let out_count = c_len(outs.len())?;
        // Safety: both arrays hold the stated number of handles.
        Status::check(unsafe {
            (self.api.graph_queue_inference)(
                graph_ptr(graph),
                ins.as_mut_ptr(),
                in_count,
                outs.as_mut_ptr(),
                out_count,
            )
        })
    }

    fn graph_queue_inference_with_fifo_elem(
        &self,
        graph: RawGraph,
        input: RawFifo,
        output: RawFifo,
        tensor: &[u8],
        user: UserParam,
    ) -> DriverResult<()> {
        let mut len = c_len(tensor.len())?;
        // Safety: the driver copies `len` bytes; the user param is never dereferenced.
        Status::check(unsafe {
            (self.api.graph_queue_inference_with_fifo_elem)(
                graph_ptr(graph),
                fifo_ptr(input),
                fifo_ptr(output),
                tensor.as_ptr().cast(),
                &mut len,
                user.0 as *mut c_void,
            )
        })
    }

    fn graph_get_option(&self, graph: RawGraph, option: i32, buf: &mut IoBuffer) -> DriverResult<()> {
        self.get_option(
            // Safety: data points to `len` writable bytes or is NULL.
            |data, len| unsafe { (self.api.graph_get_option)(graph_ptr(graph), option, data, len) },
            buf,
        )
    }

    fn graph_destroy(&self, graph: RawGraph) -> DriverResult<()> {
        let mut handle = graph_ptr(graph);
        // Safety: the driver frees the handle and nulls our local copy.
        Status::check(unsafe { (self.api.graph_destroy)(&mut handle) })
    }

    fn fifo_create(&self, name: &str, fifo_type: FifoType) -> DriverResult<RawFifo> {
        let name = c_name(name)?;
        let mut handle: *mut sys::ncFifoHandle_t = ptr::null_mut();
        // Safety: `name` is NUL-terminated and outlives the call.
        Status::check(unsafe {
            (self.api.fifo_create)(name.as_ptr(), fifo_type.code(), &mut handle)
        })?;
        Ok(RawFifo::from_raw(handle as usize))
    }

    fn fifo_allocate(
        &self,
        fifo: RawFifo,
        device: RawDevice,
        desc: &TensorDesc,
        num_elem: u32,
    ) -> DriverResult<()> {
        let mut raw = desc.to_raw();
        // Safety: `raw` lives on the stack for the duration of the call.
        Status::check(unsafe {
            (self.api.fifo_allocate)(fifo_ptr(fifo), device_ptr(device), &mut raw, num_elem)
        })
    }

    fn fifo_get_option(&self, fifo: RawFifo, option: i32, buf: &mut IoBuffer) -> DriverResult<()> {
        self.get_option(
            // Safety: data points to `len` writable bytes or is NULL.
            |data, len| unsafe { (self.api.fifo_get_option)(fifo_ptr(fifo), option, data, len) },
            buf,
        )
    }

    fn fifo_write_elem(&self, fifo: RawFifo, tensor: &[u8], user: UserParam) -> DriverResult<()> {
        let mut len = c_len(tensor.len())?;
        // Safety: the driver copies `len` bytes; the user param is never dereferenced.
        Status::check(unsafe {
            (self.api.fifo_write_elem)(
                fifo_ptr(fifo),
                tensor.as_ptr().cast(),
                &mut len,
                user.0 as *mut c_void,
            )
        })
    }

    fn fifo_read_elem(&self, fifo: RawFifo, buf: &mut IoBuffer) -> DriverResult<UserParam> {
        let mut len = c_len(buf.capacity())?;
        let mut user: *mut c_void = ptr::null_mut();
        // Safety: data points to `len` writable bytes or is NULL.
        let status =
            unsafe { (self.api.fifo_read_elem)(fifo_ptr(fifo), data_ptr(buf), &mut len, &mut user) };
        buf.set_len(len as usize);
        Status::check(status)?;
        Ok(UserParam(user as usize))
    }

    fn fifo_remove_elem(&self, fifo: RawFifo) -> DriverResult<()> {
        // Safety: the token came from `fifo_create`.
        Status::check(unsafe { (self.api.fifo_remove_elem)(fifo_ptr(fifo)) })
    }

    fn fifo_destroy(&self, fifo: RawFifo) -> DriverResult<()> {
        let mut handle = fifo_ptr(fifo);
        // Safety: the driver frees the handle and nulls our local copy.
        Status::check(unsafe { (self.api.fifo_destroy)(&mut handle) })
    }
}
