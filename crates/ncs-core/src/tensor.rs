//! Tensor descriptors and FIFO element types.

use crate::error::OptionDecodeError;
use ncs_sys as sys;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a device, graph or FIFO name.
pub const MAX_NAME_SIZE: usize = sys::NC_MAX_NAME_SIZE;
/// Number of temperature samples returned by the thermal-stats option.
pub const THERMAL_BUFFER_SIZE: usize = sys::NC_THERMAL_BUFFER_SIZE;
/// Size of the debug-info buffer.
pub const DEBUG_BUFFER_SIZE: usize = sys::NC_DEBUG_BUFFER_SIZE;
/// Maximum number of fields in a version option.
pub const VERSION_MAX_SIZE: usize = sys::NC_VERSION_MAX_SIZE;

/// FIFO access type, seen from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FifoType {
    /// Host reads, graph writes (output queue).
    HostRo,
    /// Host writes, graph reads (input queue).
    HostWo,
}

impl FifoType {
    pub fn code(self) -> i32 {
        match self {
            FifoType::HostRo => sys::NC_FIFO_HOST_RO,
            FifoType::HostWo => sys::NC_FIFO_HOST_WO,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            sys::NC_FIFO_HOST_RO => Some(FifoType::HostRo),
            sys::NC_FIFO_HOST_WO => Some(FifoType::HostWo),
            _ => None,
        }
    }
}

impl fmt::Display for FifoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FifoType::HostRo => write!(f, "FIFO_HOST_RO"),
            FifoType::HostWo => write!(f, "FIFO_HOST_WO"),
        }
    }
}

/// Element data type of a FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FifoDataType {
    Fp16,
    Fp32,
}

impl FifoDataType {
    pub fn code(self) -> i32 {
        match self {
            FifoDataType::Fp16 => sys::NC_FIFO_FP16,
            FifoDataType::Fp32 => sys::NC_FIFO_FP32,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            sys::NC_FIFO_FP16 => Some(FifoDataType::Fp16),
            sys::NC_FIFO_FP32 => Some(FifoDataType::Fp32),
            _ => None,
        }
    }

    /// Bytes per scalar.
    pub fn size(self) -> u32 {
        match self {
            FifoDataType::Fp16 => 2,
            FifoDataType::Fp32 => 4,
        }
    }
}

impl fmt::Display for FifoDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FifoDataType::Fp16 => write!(f, "FIFO_FLOAT_16"),
            FifoDataType::Fp32 => write!(f, "FIFO_FLOAT_32"),
        }
    }
}

/// Shape and layout of one FIFO element (`struct ncTensorDescriptor_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorDesc {
    pub batch_size: u32,
    pub channels: u32,
    pub width: u32,
    pub height: u32,
    /// Total data size of the tensor in bytes.
    pub size: u32,
    pub c_stride: u32,
    pub w_stride: u32,
    pub h_stride: u32,
    pub data_type: FifoDataType,
}

impl TensorDesc {
    /// Byte size of the encoded descriptor.
    pub const ENCODED_SIZE: usize = std::mem::size_of::<sys::ncTensorDescriptor_t>();

    /// Dense channel-minor descriptor, the driver's default host layout.
    ///
    /// Byte sizes that do not fit in `u32` saturate at `u32::MAX`; use
    /// [`TensorDesc::try_new`] to detect that.
    pub fn new(
        batch_size: u32,
        channels: u32,
        width: u32,
        height: u32,
        data_type: FifoDataType,
    ) -> Self {
        let c_stride = data_type.size();
        let w_stride = channels.saturating_mul(c_stride);
        let h_stride = width.saturating_mul(w_stride);
        Self {
            batch_size,
            channels,
            width,
            height,
            size: batch_size.saturating_mul(height).saturating_mul(h_stride),
            c_stride,
            w_stride,
            h_stride,
            data_type,
        }
    }

    /// Dense descriptor, or `None` when the byte size overflows `u32`.
    pub fn try_new(
        batch_size: u32,
        channels: u32,
        width: u32,
        height: u32,
        data_type: FifoDataType,
    ) -> Option<Self> {
        let c_stride = data_type.size();
        let w_stride = channels.checked_mul(c_stride)?;
        let h_stride = width.checked_mul(w_stride)?;
        let size = batch_size.checked_mul(height)?.checked_mul(h_stride)?;
        Some(Self {
            batch_size,
            channels,
            width,
            height,
            size,
            c_stride,
            w_stride,
            h_stride,
            data_type,
        })
    }

    /// Same shape, dense layout for another data type. Saturates like
    /// [`TensorDesc::new`].
    pub fn with_data_type(&self, data_type: FifoDataType) -> Self {
        Self::new(
            self.batch_size,
            self.channels,
            self.width,
            self.height,
            data_type,
        )
    }

    /// Same shape for another data type, or `None` on overflow.
    pub fn try_with_data_type(&self, data_type: FifoDataType) -> Option<Self> {
        Self::try_new(
            self.batch_size,
            self.channels,
            self.width,
            self.height,
            data_type,
        )
    }

    /// Scalars per element, saturating at `u32::MAX`.
    pub fn element_count(&self) -> u32 {
        self.batch_size
            .saturating_mul(self.channels)
            .saturating_mul(self.width)
            .saturating_mul(self.height)
    }

    pub fn to_raw(&self) -> sys::ncTensorDescriptor_t {
        sys::ncTensorDescriptor_t {
            n: self.batch_size,
            c: self.channels,
            w: self.width,
            h: self.height,
            totalSize: self.size,
            cStride: self.c_stride,
            wStride: self.w_stride,
            hStride: self.h_stride,
            dataType: self.data_type.code(),
        }
    }

    pub fn from_raw(raw: &sys::ncTensorDescriptor_t) -> Option<Self> {
        Some(Self {
            batch_size: raw.n,
            channels: raw.c,
            width: raw.w,
            height: raw.h,
            size: raw.totalSize,
            c_stride: raw.cStride,
            w_stride: raw.wStride,
            h_stride: raw.hStride,
            data_type: FifoDataType::from_code(raw.dataType)?,
        })
    }

    pub fn to_le_bytes(&self) -> [u8; Self::ENCODED_SIZE] {
        let fields = [
            self.batch_size,
            self.channels,
            self.width,
            self.height,
            self.size,
            self.c_stride,
            self.w_stride,
            self.h_stride,
        ];
        let mut out = [0u8; Self::ENCODED_SIZE];
        for (chunk, field) in out.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        out[32..].copy_from_slice(&self.data_type.code().to_le_bytes());
        out
    }

    /// Decode one descriptor from the first [`Self::ENCODED_SIZE`] bytes.
    pub fn from_le_bytes(data: &[u8]) -> Result<Self, OptionDecodeError> {
        if data.len() < Self::ENCODED_SIZE {
            return Err(OptionDecodeError::TooShort {
                expected: Self::ENCODED_SIZE,
                actual: data.len(),
            });
        }
        let word = |i: usize| {
            let at = i * 4;
            u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
        };
        let data_type_code = word(8) as i32;
        let data_type = FifoDataType::from_code(data_type_code)
            .ok_or(OptionDecodeError::UnknownDataType(data_type_code))?;

        Ok(Self {
            batch_size: word(0),
            channels: word(1),
            width: word(2),
            height: word(3),
            size: word(4),
            c_stride: word(5),
            w_stride: word(6),
            h_stride: word(7),
            data_type,
        })
    }
}
