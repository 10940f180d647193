//! Option queries shared by devices, graphs and FIFOs.

use crate::error::{DriverResultExt, Error, Result};
use ncs_core::{
    DriverResult, IoBuffer, NcsOption, Operation, OptionDecodeError, OptionValue, Status,
    TensorDesc,
};

fn ensure_implemented<O: NcsOption>(option: O) -> Result<()> {
    if option.is_implemented() {
        Ok(())
    } else {
        tracing::debug!(option = %option, "refusing unimplemented option");
        Err(Error::OptionNotImplemented(option.to_string()))
    }
}

/// Query an option in two calls: probe with an empty buffer for the length,
/// then read that many bytes.
pub(crate) fn query<O: NcsOption>(
    option: O,
    op: Operation,
    mut call: impl FnMut(&mut IoBuffer) -> DriverResult<()>,
) -> Result<Vec<u8>> {
    ensure_implemented(option)?;

    let mut probe = IoBuffer::probe();
    match call(&mut probe) {
        Ok(()) => return Ok(Vec::new()),
        Err(Status::InvalidDataLength) => {}
        Err(status) => return Err(status).during(op),
    }
    tracing::debug!(option = %option, len = probe.len(), "option length probed");

    let mut buf = IoBuffer::with_capacity(probe.len());
    call(&mut buf).during(op)?;
    Ok(buf.into_vec())
}

/// Query an option with a caller-supplied byte size, skipping the probe.
pub(crate) fn query_sized<O: NcsOption>(
    option: O,
    op: Operation,
    size: usize,
    call: impl FnOnce(&mut IoBuffer) -> DriverResult<()>,
) -> Result<Vec<u8>> {
    ensure_implemented(option)?;
    let mut buf = IoBuffer::with_capacity(size);
    call(&mut buf).during(op)?;
    Ok(buf.into_vec())
}

pub(crate) fn decode<O: NcsOption>(option: O, bytes: &[u8]) -> Result<OptionValue> {
    option.decode(bytes).map_err(|reason| decode_error(option, reason))
}

fn decode_error<O: NcsOption>(option: O, reason: OptionDecodeError) -> Error {
    Error::OptionDecode {
        option: option.to_string(),
        reason,
    }
}

fn shape_mismatch<O: NcsOption>(option: O) -> Error {
    decode_error(option, OptionDecodeError::NoDecoder(option.to_string()))
}

pub(crate) fn uint<O: NcsOption>(option: O, value: OptionValue) -> Result<u32> {
    value.as_uint().ok_or_else(|| shape_mismatch(option))
}

pub(crate) fn uints<O: NcsOption>(option: O, value: OptionValue) -> Result<Vec<u32>> {
    match value {
        OptionValue::Uints(v) => Ok(v),
        _ => Err(shape_mismatch(option)),
    }
}

pub(crate) fn floats<O: NcsOption>(option: O, value: OptionValue) -> Result<Vec<f32>> {
    match value {
        OptionValue::Floats(v) => Ok(v),
        _ => Err(shape_mismatch(option)),
    }
}

pub(crate) fn text<O: NcsOption>(option: O, value: OptionValue) -> Result<String> {
    match value {
        OptionValue::Text(v) => Ok(v),
        _ => Err(shape_mismatch(option)),
    }
}

pub(crate) fn descs<O: NcsOption>(option: O, value: OptionValue) -> Result<Vec<TensorDesc>> {
    match value {
        OptionValue::TensorDescs(v) => Ok(v),
        _ => Err(shape_mismatch(option)),
    }
}

/// First descriptor of a single-descriptor option.
pub(crate) fn desc<O: NcsOption>(option: O, value: OptionValue) -> Result<TensorDesc> {
    descs(option, value)?
        .into_iter()
        .next()
        .ok_or_else(|| shape_mismatch(option))
}

/// Map a numeric option value onto one of the state enums.
pub(crate) fn coded<O: NcsOption, T>(
    option: O,
    value: OptionValue,
    from_code: impl FnOnce(u32) -> Option<T>,
) -> Result<T> {
    let code = uint(option, value)?;
    from_code(code).ok_or_else(|| {
        decode_error(
            option,
            OptionDecodeError::NoDecoder(format!("{} value {}", option, code)),
        )
    })
}
