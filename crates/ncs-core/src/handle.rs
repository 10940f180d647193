//! Raw handle tokens crossing the driver boundary.
//!
//! A token is whatever the driver uses to identify a resource: the native
//! driver stores the handle pointer value, the mock driver an index into its
//! handle table. Tokens are plain `Copy` values; ownership lives in the safe
//! wrappers of the `ncs` crate.

use std::fmt;

macro_rules! raw_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(usize);

        impl $name {
            pub const fn from_raw(raw: usize) -> Self {
                Self(raw)
            }

            pub const fn as_raw(self) -> usize {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({:#x})"), self.0)
            }
        }
    };
}

raw_handle!(
    /// `struct ncDeviceHandle_t*`
    RawDevice,
    "RawDevice"
);
raw_handle!(
    /// `struct ncGraphHandle_t*`
    RawGraph,
    "RawGraph"
);
raw_handle!(
    /// `struct ncFifoHandle_t*`
    RawFifo,
    "RawFifo"
);

/// Opaque user value attached to a FIFO element (`void* userParam`).
///
/// The driver never dereferences it; it travels with the element from
/// write to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UserParam(pub usize);

impl UserParam {
    pub const NONE: UserParam = UserParam(0);
}
