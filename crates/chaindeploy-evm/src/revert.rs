//! Decode revert data attached to a failed deployment.
//!
//! Solidity encodes `require(cond, "message")` as
//! `0x08c379a0 ++ abi_encode(string)` and a failed `assert` or checked
//! arithmetic as `0x4e487b71 ++ abi_encode(uint256 code)`.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};

/// The 4-byte selector for `Error(string)`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// The 4-byte selector for `Panic(uint256)`.
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Try to decode the revert data as an `Error(string)` payload.
pub fn decode_error_string(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    match DynSolType::String.abi_decode(&data[4..]) {
        Ok(DynSolValue::String(s)) => Some(s),
        _ => None,
    }
}

/// Try to decode the revert data as a `Panic(uint256)` code.
pub fn decode_panic_code(data: &[u8]) -> Option<u64> {
    if data.len() != 36 || data[..4] != PANIC_SELECTOR {
        return None;
    }
    let word = &data[4..];
    if word[..24].iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[24..]);
    Some(u64::from_be_bytes(buf))
}

fn panic_meaning(code: u64) -> &'static str {
    match code {
        0x01 => "assertion failed",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x21 => "invalid enum value",
        0x31 => "pop on empty array",
        0x32 => "array index out of bounds",
        0x41 => "out of memory",
        0x51 => "call to uninitialized function",
        _ => "unknown panic",
    }
}

/// Human-readable reason for raw revert data, when it follows a known shape.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if let Some(message) = decode_error_string(data) {
        return Some(message);
    }
    if let Some(code) = decode_panic_code(data) {
        return Some(format!("panic 0x{code:02x}: {}", panic_meaning(code)));
    }
    if data.len() >= 4 {
        return Some(format!("custom error 0x{}", hex::encode(&data[..4])));
    }
    None
}
