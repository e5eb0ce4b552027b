//! Little-endian field packing used by the token content and message.

use crate::error::TokenError;
use bytes::{Buf, BufMut, BytesMut};
use std::collections::BTreeMap;

/// Write a `u16` length prefix followed by `value`.
pub(crate) fn put_bytes(
    buf: &mut BytesMut,
    field: &'static str,
    value: &[u8],
) -> Result<(), TokenError> {
    let len = u16::try_from(value.len()).map_err(|_| TokenError::FieldTooLong {
        field,
        len: value.len(),
    })?;
    buf.put_u16_le(len);
    buf.extend_from_slice(value);
    Ok(())
}

/// Write a privilege map as a `u16` count followed by `(u16, u32)` pairs in
/// ascending key order.
pub(crate) fn put_privileges(
    buf: &mut BytesMut,
    privileges: &BTreeMap<u16, u32>,
) -> Result<(), TokenError> {
    let count = u16::try_from(privileges.len()).map_err(|_| TokenError::FieldTooLong {
        field: "privileges",
        len: privileges.len(),
    })?;
    buf.put_u16_le(count);
    for (privilege, expire_ts) in privileges {
        buf.put_u16_le(*privilege);
        buf.put_u32_le(*expire_ts);
    }
    Ok(())
}

pub(crate) fn get_u16(data: &mut impl Buf) -> Result<u16, TokenError> {
    if data.remaining() < 2 {
        return Err(TokenError::Malformed("truncated u16".to_string()));
    }
    Ok(data.get_u16_le())
}

pub(crate) fn get_u32(data: &mut impl Buf) -> Result<u32, TokenError> {
    if data.remaining() < 4 {
        return Err(TokenError::Malformed("truncated u32".to_string()));
    }
    Ok(data.get_u32_le())
}

pub(crate) fn get_bytes(data: &mut impl Buf) -> Result<Vec<u8>, TokenError> {
    let len = usize::from(get_u16(data)?);
    if data.remaining() < len {
        return Err(TokenError::Malformed(format!(
            "length prefix {} exceeds remaining {} bytes",
            len,
            data.remaining()
        )));
    }
    let mut out = vec![0u8; len];
    data.copy_to_slice(&mut out);
    Ok(out)
}

pub(crate) fn get_privileges(data: &mut impl Buf) -> Result<BTreeMap<u16, u32>, TokenError> {
    let count = get_u16(data)?;
    let mut privileges = BTreeMap::new();
    for _ in 0..count {
        let privilege = get_u16(data)?;
        let expire_ts = get_u32(data)?;
        privileges.insert(privilege, expire_ts);
    }
    Ok(privileges)
}
