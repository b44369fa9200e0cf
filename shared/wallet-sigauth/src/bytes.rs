//! Minimal big-endian parsing helpers.
//!
//! Every reader takes the full buffer plus a cursor and advances the cursor only on success.

use alloy_primitives::{Address, B256};

use crate::errors::DecodeError;

fn take<'a>(bytes: &'a [u8], i: &mut usize, len: usize) -> Result<&'a [u8], DecodeError> {
    let end = i.checked_add(len).ok_or(DecodeError::Truncated)?;
    if bytes.len() < end {
        return Err(DecodeError::Truncated);
    }
    let out = &bytes[*i..end];
    *i = end;
    Ok(out)
}

pub fn read_slice<'a>(bytes: &'a [u8], i: &mut usize, len: usize) -> Result<&'a [u8], DecodeError> {
    take(bytes, i, len)
}

pub fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8, DecodeError> {
    Ok(take(bytes, i, 1)?[0])
}

pub fn read_u16_be(bytes: &[u8], i: &mut usize) -> Result<u16, DecodeError> {
    let mut buf = [0u8; 2];
    buf.copy_from_slice(take(bytes, i, 2)?);
    Ok(u16::from_be_bytes(buf))
}

/// Three-byte length prefix, as used by branch, nested and chained parts.
pub fn read_u24_be(bytes: &[u8], i: &mut usize) -> Result<usize, DecodeError> {
    let b = take(bytes, i, 3)?;
    Ok(((b[0] as usize) << 16) | ((b[1] as usize) << 8) | (b[2] as usize))
}

pub fn read_u32_be(bytes: &[u8], i: &mut usize) -> Result<u32, DecodeError> {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(take(bytes, i, 4)?);
    Ok(u32::from_be_bytes(buf))
}

pub fn read_b32(bytes: &[u8], i: &mut usize) -> Result<B256, DecodeError> {
    Ok(B256::from_slice(take(bytes, i, 32)?))
}

pub fn read_address(bytes: &[u8], i: &mut usize) -> Result<Address, DecodeError> {
    Ok(Address::from_slice(take(bytes, i, 20)?))
}
