//! Device, graph and FIFO options.
//!
//! Options starting with `Rw` are gettable and settable on the driver side,
//! options starting with `Ro` are only gettable. Every option knows its numeric
//! code, the native size of one element, and how to decode the raw
//! little-endian bytes the driver returns.

use crate::error::{OptionDecodeError, Result};
use crate::tensor::TensorDesc;
use std::fmt;

/// Decoded option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Uint(u32),
    Floats(Vec<f32>),
    Uints(Vec<u32>),
    Text(String),
    TensorDescs(Vec<TensorDesc>),
}

impl OptionValue {
    pub fn as_uint(&self) -> Option<u32> {
        match self {
            OptionValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            OptionValue::Floats(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uints(&self) -> Option<&[u32]> {
        match self {
            OptionValue::Uints(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tensor_descs(&self) -> Option<&[TensorDesc]> {
        match self {
            OptionValue::TensorDescs(v) => Some(v),
            _ => None,
        }
    }
}

/// Common interface of [`DeviceOption`], [`GraphOption`] and [`FifoOption`].
pub trait NcsOption: Copy + fmt::Debug + fmt::Display {
    /// Numeric option code passed to the driver.
    fn code(self) -> i32;

    /// Native size in bytes of one element of the option value.
    fn native_size(self) -> usize;

    /// Decode raw option bytes into the option's native type.
    fn decode(self, data: &[u8]) -> Result<OptionValue>;

    /// `false` for options the bindings refuse to query.
    fn is_implemented(self) -> bool {
        true
    }
}

fn words(data: &[u8]) -> Result<Vec<[u8; 4]>> {
    if data.len() % 4 != 0 {
        return Err(OptionDecodeError::Misaligned {
            len: data.len(),
            elem_size: 4,
        });
    }
    Ok(data
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect())
}

fn decode_uint(data: &[u8]) -> Result<OptionValue> {
    if data.len() < 4 {
        return Err(OptionDecodeError::TooShort {
            expected: 4,
            actual: data.len(),
        });
    }
    Ok(OptionValue::Uint(u32::from_le_bytes([
        data[0], data[1], data[2], data[3],
    ])))
}

fn decode_uints(data: &[u8], expected: Option<usize>) -> Result<OptionValue> {
    if let Some(count) = expected {
        if data.len() < count * 4 {
            return Err(OptionDecodeError::TooShort {
                expected: count * 4,
                actual: data.len(),
            });
        }
        return decode_uints(&data[..count * 4], None);
    }
    Ok(OptionValue::Uints(
        words(data)?.into_iter().map(u32::from_le_bytes).collect(),
    ))
}

fn decode_floats(data: &[u8]) -> Result<OptionValue> {
    Ok(OptionValue::Floats(
        words(data)?.into_iter().map(f32::from_le_bytes).collect(),
    ))
}

fn decode_text(data: &[u8]) -> OptionValue {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    OptionValue::Text(String::from_utf8_lossy(&data[..end]).into_owned())
}

fn decode_descs(data: &[u8]) -> Result<OptionValue> {
    let size = TensorDesc::ENCODED_SIZE;
    if data.len() % size != 0 {
        return Err(OptionDecodeError::Misaligned {
            len: data.len(),
            elem_size: size,
        });
    }
    data.chunks_exact(size)
        .map(TensorDesc::from_le_bytes)
        .collect::<Result<Vec<_>>>()
        .map(OptionValue::TensorDescs)
}

/// Device options (`ncDeviceOption_t`).
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceOption {
    /// Max temperatures in degrees Celsius for the last thermal buffer window.
    RoThermalStats = 2000,
    /// Temperature throttling level.
    RoThermalThrottle = 2001,
    RoState = 2002,
    /// Memory in use on the device, in bytes.
    RoMemoryUsed = 2003,
    /// Total memory on the device, in bytes.
    RoMemorySize = 2004,
    RoMaxFifoCount = 2005,
    RoAllocatedFifoCount = 2006,
    RoMaxGraphCount = 2007,
    RoAllocatedGraphCount = 2008,
    /// Highest option class supported.
    RoClassLimit = 2009,
    RoFirmwareVersion = 2010,
    /// Details after a `MyriadError` status.
    RoDebugInfo = 2011,
    /// Version of the mvtensor library linked with the API.
    RoMvTensorVersion = 2012,
    RoName = 2013,
    /// Reserved.
    RoMaxExecutors = 2014,
    RoHwVersion = 2015,
}

impl DeviceOption {
    pub const ALL: [DeviceOption; 16] = [
        DeviceOption::RoThermalStats,
        DeviceOption::RoThermalThrottle,
        DeviceOption::RoState,
        DeviceOption::RoMemoryUsed,
        DeviceOption::RoMemorySize,
        DeviceOption::RoMaxFifoCount,
        DeviceOption::RoAllocatedFifoCount,
        DeviceOption::RoMaxGraphCount,
        DeviceOption::RoAllocatedGraphCount,
        DeviceOption::RoClassLimit,
        DeviceOption::RoFirmwareVersion,
        DeviceOption::RoDebugInfo,
        DeviceOption::RoMvTensorVersion,
        DeviceOption::RoName,
        DeviceOption::RoMaxExecutors,
        DeviceOption::RoHwVersion,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }
}

impl NcsOption for DeviceOption {
    fn code(self) -> i32 {
        self as i32
    }

    fn native_size(self) -> usize {
        match self {
            DeviceOption::RoDebugInfo | DeviceOption::RoName => 1,
            _ => 4,
        }
    }

    fn decode(self, data: &[u8]) -> Result<OptionValue> {
        match self {
            DeviceOption::RoThermalThrottle
            | DeviceOption::RoState
            | DeviceOption::RoMemoryUsed
            | DeviceOption::RoMemorySize
            | DeviceOption::RoMaxFifoCount
            | DeviceOption::RoAllocatedFifoCount
            | DeviceOption::RoMaxGraphCount
            | DeviceOption::RoAllocatedGraphCount
            | DeviceOption::RoClassLimit
            | DeviceOption::RoMaxExecutors
            | DeviceOption::RoHwVersion => decode_uint(data),
            DeviceOption::RoThermalStats => decode_floats(data),
            DeviceOption::RoFirmwareVersion => {
                decode_uints(data, Some(crate::tensor::VERSION_MAX_SIZE))
            }
            DeviceOption::RoMvTensorVersion => decode_uints(data, Some(2)),
            DeviceOption::RoDebugInfo | DeviceOption::RoName => Ok(decode_text(data)),
        }
    }

    fn is_implemented(self) -> bool {
        !matches!(
            self,
            DeviceOption::RoMaxExecutors | DeviceOption::RoDebugInfo
        )
    }
}

impl fmt::Display for DeviceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceOption::RoThermalStats => "RO_DEVICE_THERMAL_STATS",
            DeviceOption::RoThermalThrottle => "RO_DEVICE_THERMAL_THROTTLE",
            DeviceOption::RoState => "RO_DEVICE_STATE",
            DeviceOption::RoMemoryUsed => "RO_DEVICE_MEMORY_USED",
            DeviceOption::RoMemorySize => "RO_DEVICE_MEMORY_SIZE",
            DeviceOption::RoMaxFifoCount => "RO_DEVICE_MAX_FIFO_COUNT",
            DeviceOption::RoAllocatedFifoCount => "RO_DEVICE_ALLOCATED_FIFO_COUNT",
            DeviceOption::RoMaxGraphCount => "RO_DEVICE_MAX_GRAPH_COUNT",
            DeviceOption::RoAllocatedGraphCount => "RO_DEVICE_ALLOCATED_GRAPH_COUNT",
            DeviceOption::RoClassLimit => "RO_DEVICE_CLASS_LIMIT",
            DeviceOption::RoFirmwareVersion => "RO_DEVICE_FIRMWARE_VERSION",
            DeviceOption::RoDebugInfo => "RO_DEVICE_DEBUG_INFO",
            DeviceOption::RoMvTensorVersion => "RO_DEVICE_MVTENSOR_VERSION",
            DeviceOption::RoName => "RO_DEVICE_NAME",
            DeviceOption::RoMaxExecutors => "RO_DEVICE_MAX_EXECUTORS",
            DeviceOption::RoHwVersion => "RO_DEVICE_HW_VERSION",
        };
        f.write_str(name)
    }
}

/// Graph options (`ncGraphOption_t`).
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphOption {
    RoState = 1000,
    /// Time per layer for the last inference, in milliseconds.
    RoInferenceTime = 1001,
    RoInputCount = 1002,
    RoOutputCount = 1003,
    /// Descriptors of the graph inputs, in order.
    RoInputTensorDescriptors = 1004,
    /// Descriptors of the graph outputs, in order.
    RoOutputTensorDescriptors = 1005,
    RoDebugInfo = 1006,
    RoName = 1007,
    RoOptionClassLimit = 1008,
    RoVersion = 1009,
    /// Reserved.
    RwExecutorsCount = 1010,
    /// Number of entries in [`GraphOption::RoInferenceTime`].
    RoInferenceTimeSize = 1011,
}

impl GraphOption {
    pub const ALL: [GraphOption; 12] = [
        GraphOption::RoState,
        GraphOption::RoInferenceTime,
        GraphOption::RoInputCount,
        GraphOption::RoOutputCount,
        GraphOption::RoInputTensorDescriptors,
        GraphOption::RoOutputTensorDescriptors,
        GraphOption::RoDebugInfo,
        GraphOption::RoName,
        GraphOption::RoOptionClassLimit,
        GraphOption::RoVersion,
        GraphOption::RwExecutorsCount,
        GraphOption::RoInferenceTimeSize,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }
}

impl NcsOption for GraphOption {
    fn code(self) -> i32 {
        self as i32
    }

    fn native_size(self) -> usize {
        match self {
            GraphOption::RoInputTensorDescriptors | GraphOption::RoOutputTensorDescriptors => {
                TensorDesc::ENCODED_SIZE
            }
            GraphOption::RoDebugInfo | GraphOption::RoName => 1,
            _ => 4,
        }
    }

    fn decode(self, data: &[u8]) -> Result<OptionValue> {
        match self {
            GraphOption::RoState
            | GraphOption::RoInputCount
            | GraphOption::RoOutputCount
            | GraphOption::RoOptionClassLimit
            | GraphOption::RwExecutorsCount
            | GraphOption::RoInferenceTimeSize => decode_uint(data),
            GraphOption::RoInferenceTime => decode_floats(data),
            GraphOption::RoVersion => decode_uints(data, Some(2)),
            GraphOption::RoDebugInfo | GraphOption::RoName => Ok(decode_text(data)),
            GraphOption::RoInputTensorDescriptors | GraphOption::RoOutputTensorDescriptors => {
                decode_descs(data)
            }
        }
    }

    fn is_implemented(self) -> bool {
        self != GraphOption::RwExecutorsCount
    }
}

impl fmt::Display for GraphOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphOption::RoState => "RO_GRAPH_STATE",
            GraphOption::RoInferenceTime => "RO_GRAPH_INFERENCE_TIME",
            GraphOption::RoInputCount => "RO_GRAPH_INPUT_COUNT",
            GraphOption::RoOutputCount => "RO_GRAPH_OUTPUT_COUNT",
            GraphOption::RoInputTensorDescriptors => "RO_GRAPH_INPUT_TENSOR_DESCRIPTORS",
            GraphOption::RoOutputTensorDescriptors => "RO_GRAPH_OUTPUT_TENSOR_DESCRIPTORS",
            GraphOption::RoDebugInfo => "RO_GRAPH_DEBUG_INFO",
            GraphOption::RoName => "RO_GRAPH_NAME",
            GraphOption::RoOptionClassLimit => "RO_GRAPH_OPTION_CLASS_LIMIT",
            GraphOption::RoVersion => "RO_GRAPH_VERSION",
            GraphOption::RwExecutorsCount => "RW_GRAPH_EXECUTORS_NUM",
            GraphOption::RoInferenceTimeSize => "RO_GRAPH_TIME_TAKEN_ARRAY_SIZE",
        };
        f.write_str(name)
    }
}

/// FIFO options (`ncFifoOption_t`).
///
/// All settable options except [`FifoOption::RwHostTensorDescriptor`] must be
/// set before the FIFO is allocated.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FifoOption {
    RwType = 0,
    /// Number of consumers of an element before it is removed.
    RwConsumerCount = 1,
    RwDataType = 2,
    /// Return `OutOfMemory` instead of blocking.
    RwDontBlock = 3,
    RoCapacity = 4,
    RoReadFillLevel = 5,
    RoWriteFillLevel = 6,
    RoGraphTensorDescriptor = 7,
    RoState = 8,
    RoName = 9,
    RoElementDataSize = 10,
    RwHostTensorDescriptor = 11,
}

impl FifoOption {
    pub const ALL: [FifoOption; 12] = [
        FifoOption::RwType,
        FifoOption::RwConsumerCount,
        FifoOption::RwDataType,
        FifoOption::RwDontBlock,
        FifoOption::RoCapacity,
        FifoOption::RoReadFillLevel,
        FifoOption::RoWriteFillLevel,
        FifoOption::RoGraphTensorDescriptor,
        FifoOption::RoState,
        FifoOption::RoName,
        FifoOption::RoElementDataSize,
        FifoOption::RwHostTensorDescriptor,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }
}

impl NcsOption for FifoOption {
    fn code(self) -> i32 {
        self as i32
    }

    fn native_size(self) -> usize {
        match self {
            FifoOption::RoGraphTensorDescriptor | FifoOption::RwHostTensorDescriptor => {
                TensorDesc::ENCODED_SIZE
            }
            FifoOption::RoName => 1,
            _ => 4,
        }
    }

    fn decode(self, data: &[u8]) -> Result<OptionValue> {
        match self {
            FifoOption::RwType
            | FifoOption::RwConsumerCount
            | FifoOption::RwDataType
            | FifoOption::RwDontBlock
            | FifoOption::RoCapacity
            | FifoOption::RoReadFillLevel
            | FifoOption::RoWriteFillLevel
            | FifoOption::RoElementDataSize
            | FifoOption::RoState => decode_uint(data),
            FifoOption::RoName => Ok(decode_text(data)),
            FifoOption::RoGraphTensorDescriptor | FifoOption::RwHostTensorDescriptor => {
                decode_descs(data)
            }
        }
    }

    fn is_implemented(self) -> bool {
        self != FifoOption::RwDontBlock
    }
}

impl fmt::Display for FifoOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FifoOption::RwType => "RW_FIFO_TYPE",
            FifoOption::RwConsumerCount => "RW_FIFO_CONSUMER_COUNT",
            FifoOption::RwDataType => "RW_FIFO_DATA_TYPE",
            FifoOption::RwDontBlock => "RW_FIFO_DONT_BLOCK",
            FifoOption::RoCapacity => "RO_FIFO_CAPACITY",
            FifoOption::RoReadFillLevel => "RO_FIFO_READ_FILL_LEVEL",
            FifoOption::RoWriteFillLevel => "RO_FIFO_WRITE_FILL_LEVEL",
            FifoOption::RoGraphTensorDescriptor => "RO_FIFO_GRAPH_TENSOR_DESCRIPTOR",
            FifoOption::RoState => "RO_FIFO_STATE",
            FifoOption::RoName => "RO_FIFO_NAME",
            FifoOption::RoElementDataSize => "RO_FIFO_ELEMENT_DATA_SIZE",
            FifoOption::RwHostTensorDescriptor => "RW_FIFO_HOST_TENSOR_DESCRIPTOR",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::FifoDataType;

    #[test]
    fn test_option_codes() {
        assert_eq!(DeviceOption::RoThermalStats.code(), 2000);
        assert_eq!(DeviceOption::RoHwVersion.code(), 2015);
        assert_eq!(GraphOption::RoInferenceTimeSize.code(), 1011);
        assert_eq!(FifoOption::RwHostTensorDescriptor.code(), 11);
        assert_eq!(FifoOption::from_code(10), Some(FifoOption::RoElementDataSize));
        assert_eq!(GraphOption::from_code(999), None);
        for opt in DeviceOption::ALL {
            assert_eq!(DeviceOption::from_code(opt.code()), Some(opt));
        }
    }

    #[test]
    fn test_decode_uint() {
        let value = DeviceOption::RoState.decode(&1u32.to_le_bytes()).unwrap();
        assert_eq!(value.as_uint(), Some(1));

        assert!(matches!(
            FifoOption::RoCapacity.decode(&[1, 0]),
            Err(OptionDecodeError::TooShort { .. })
        ));
    }

    #[test]
    fn test_decode_thermal_stats() {
        let data: Vec<u8> = [41.5f32, 42.0, 43.25]
            .iter()
            .flat_map(|t| t.to_le_bytes())
            .collect();
        let value = DeviceOption::RoThermalStats.decode(&data).unwrap();
        assert_eq!(value.as_floats(), Some(&[41.5, 42.0, 43.25][..]));
    }

    #[test]
    fn test_decode_versions() {
        let data: Vec<u8> = [2u32, 10, 1, 0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let value = DeviceOption::RoFirmwareVersion.decode(&data).unwrap();
        assert_eq!(value.as_uints(), Some(&[2, 10, 1, 0][..]));

        let value = GraphOption::RoVersion.decode(&data).unwrap();
        assert_eq!(value.as_uints(), Some(&[2, 10][..]));

        assert!(DeviceOption::RoMvTensorVersion.decode(&data[..4]).is_err());
    }

    #[test]
    fn test_decode_text_stops_at_nul() {
        let mut data = b"ma2450-0".to_vec();
        data.resize(28, 0);
        let value = DeviceOption::RoName.decode(&data).unwrap();
        assert_eq!(value.as_text(), Some("ma2450-0"));
    }

    #[test]
    fn test_decode_tensor_descriptors() {
        let a = TensorDesc::new(1, 3, 224, 224, FifoDataType::Fp16);
        let b = TensorDesc::new(1, 1000, 1, 1, FifoDataType::Fp16);
        let mut data = a.to_le_bytes().to_vec();
        data.extend_from_slice(&b.to_le_bytes());

        let value = GraphOption::RoInputTensorDescriptors.decode(&data).unwrap();
        assert_eq!(value.as_tensor_descs(), Some(&[a, b][..]));

        assert!(matches!(
            FifoOption::RwHostTensorDescriptor.decode(&data[..40]),
            Err(OptionDecodeError::Misaligned { len: 40, elem_size: 36 })
        ));
    }

    #[test]
    fn test_refused_options() {
        assert!(!DeviceOption::RoMaxExecutors.is_implemented());
        assert!(!DeviceOption::RoDebugInfo.is_implemented());
        assert!(!GraphOption::RwExecutorsCount.is_implemented());
        assert!(!FifoOption::RwDontBlock.is_implemented());
        assert!(FifoOption::RoName.is_implemented());
    }

    #[test]
    fn test_option_names() {
        assert_eq!(DeviceOption::RoName.to_string(), "RO_DEVICE_NAME");
        assert_eq!(GraphOption::RoState.to_string(), "RO_GRAPH_STATE");
        assert_eq!(FifoOption::RoCapacity.to_string(), "RO_FIFO_CAPACITY");
    }
}
