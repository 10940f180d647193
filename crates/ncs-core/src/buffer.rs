//! In/out byte buffer for option queries and element reads.

use crate::status::Status;

/// Fixed-capacity byte buffer with an in/out length.
///
/// Mirrors the `(void* data, unsigned int* dataLength)` pair of the C API.
/// On entry the length is the capacity. On return it is the number of bytes
/// written, or, when the driver answers [`Status::InvalidDataLength`], the
/// number of bytes the call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoBuffer {
    data: Vec<u8>,
    len: usize,
}

impl IoBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            len: capacity,
        }
    }

    /// Zero-capacity buffer used to probe for the required length.
    pub fn probe() -> Self {
        Self::with_capacity(0)
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Whole backing storage, for drivers writing through a pointer.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes written by the last call.
    pub fn filled(&self) -> &[u8] {
        &self.data[..self.len.min(self.data.len())]
    }

    pub fn into_vec(mut self) -> Vec<u8> {
        let len = self.len.min(self.data.len());
        self.data.truncate(len);
        self.data
    }

    /// Copy `bytes` in, or report the required length.
    pub fn fill(&mut self, bytes: &[u8]) -> Result<(), Status> {
        if bytes.len() > self.data.len() {
            self.len = bytes.len();
            return Err(Status::InvalidDataLength);
        }
        self.data[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len();
        Ok(())
    }
}
