use crate::error::{Error, ErrorKind};


/// Result to manage core errors.
pub type CoreResult<T> = Result<T, Error>;


/// Build an error of the given kind with a formatted message.
pub fn error_with(kind: ErrorKind, message: impl Into<String>) -> Error {
    Error::new(kind, message.into())
}


/// Concatenate optional byte slices, treating a missing part as empty.
pub fn concat_optional(left: Option<&[u8]>, right: Option<&[u8]>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(
        left.map_or(0, |b| b.len()) + right.map_or(0, |b| b.len())
    );
    if let Some(bytes) = left {
        buf.extend_from_slice(bytes);
    }
    if let Some(bytes) = right {
        buf.extend_from_slice(bytes);
    }
    buf
}


/// Decode a hex string into bytes.
pub fn decode_hex(hex_str: &str) -> CoreResult<Vec<u8>> {
    hex::decode(hex_str).map_err(|err| error_with(
        ErrorKind::InvalidHex, format!("invalid hex string: {}", err)
    ))
}
