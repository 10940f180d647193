//! Function table resolved from the shared library.

use crate::error::{Error, Result};
use ncs_sys::{self as sys, symbols};
use std::path::Path;

macro_rules! api_table {
    ($($field:ident: $ty:ty = $symbol:expr),+ $(,)?) => {
        pub(crate) struct Api {
            $(pub $field: $ty,)+
            _library: libloading::Library,
        }

        impl Api {
            /// Open `path` and resolve every NCAPI entry point.
            pub fn load(path: &Path) -> Result<Self> {
                // Safety: loading libmvnc runs its initializers, which have no
                // preconditions on our side.
                let library = unsafe {
                    libloading::Library::new(path).map_err(|e| Error::LoadFailed {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })?
                };
                $(
                    // Safety: the declared type matches the C prototype in mvnc.h.
                    let $field: $ty = unsafe {
                        *library.get::<$ty>($symbol).map_err(|e| Error::MissingSymbol {
                            symbol: symbol_name($symbol),
                            reason: e.to_string(),
                        })?
                    };
                )+
                Ok(Self {
                    $($field,)+
                    _library: library,
                })
            }
        }
    };
}

api_table! {
    device_create: sys::ncDeviceCreate_fn = symbols::DEVICE_CREATE,
    device_open: sys::ncDeviceOpen_fn = symbols::DEVICE_OPEN,
    device_get_option: sys::ncDeviceGetOption_fn = symbols::DEVICE_GET_OPTION,
    device_close: sys::ncDeviceClose_fn = symbols::DEVICE_CLOSE,
    device_destroy: sys::ncDeviceDestroy_fn = symbols::DEVICE_DESTROY,
    graph_create: sys::ncGraphCreate_fn = symbols::GRAPH_CREATE,
    graph_allocate: sys::ncGraphAllocate_fn = symbols::GRAPH_ALLOCATE,
    graph_allocate_with_fifos: sys::ncGraphAllocateWithFifosEx_fn =
        symbols::GRAPH_ALLOCATE_WITH_FIFOS_EX,
    graph_queue_inference: sys::ncGraphQueueInference_fn = symbols::GRAPH_QUEUE_INFERENCE,
    graph_queue_inference_with_fifo_elem: sys::ncGraphQueueInferenceWithFifoElem_fn =
        symbols::GRAPH_QUEUE_INFERENCE_WITH_FIFO_ELEM,
    graph_get_option: sys::ncGraphGetOption_fn = symbols::GRAPH_GET_OPTION,
    graph_destroy: sys::ncGraphDestroy_fn = symbols::GRAPH_DESTROY,
    fifo_create: sys::ncFifoCreate_fn = symbols::FIFO_CREATE,
    fifo_allocate: sys::ncFifoAllocate_fn = symbols::FIFO_ALLOCATE,
    fifo_get_option: sys::ncFifoGetOption_fn = symbols::FIFO_GET_OPTION,
    fifo_write_elem: sys::ncFifoWriteElem_fn = symbols::FIFO_WRITE_ELEM,
    fifo_read_elem: sys::ncFifoReadElem_fn = symbols::FIFO_READ_ELEM,
    fifo_remove_elem: sys::ncFifoRemoveElem_fn = symbols::FIFO_REMOVE_ELEM,
    fifo_destroy: sys::ncFifoDestroy_fn = symbols::FIFO_DESTROY,
}

/// Symbol bytes without the trailing NUL.
fn symbol_name(symbol: &'static [u8]) -> &'static str {
    let trimmed = symbol.strip_suffix(&[0]).unwrap_or(symbol);
    std::str::from_utf8(trimmed).unwrap_or("<non-utf8 symbol>")
}
