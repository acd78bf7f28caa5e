//! Minimal ABI helpers for the handful of call shapes the wallet uses.
//!
//! The wallet only ever talks to two known contracts, so rather than carry a
//! full ABI machinery this module hand-encodes calldata the way it is laid
//! out on the wire: a 4-byte selector followed by 32-byte parameter slots,
//! with dynamic `bytes` passed as offset + length + padded payload.

use ethereum_types::U256;
use thiserror::Error;

use crate::types::Address;

/// Size of one ABI parameter slot.
pub const WORD: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum AbiError {
    #[error("return data too short: need {needed} bytes, got {got}")]
    ShortData { needed: usize, got: usize },

    #[error("dynamic offset {0} out of range")]
    BadOffset(usize),

    #[error("dynamic length {0} does not fit the return data")]
    BadLength(usize),

    #[error("value does not fit in 64 bits")]
    Overflow,

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// First 4 bytes of calldata, if present.
pub fn selector(data: &[u8]) -> Option<[u8; 4]> {
    let head = data.get(..4)?;
    let mut sel = [0u8; 4];
    sel.copy_from_slice(head);
    Some(sel)
}

/// Lowercase `0x`-prefixed hex rendering of raw bytes.
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Parses `0x`-prefixed (or bare) hex into bytes.
pub fn from_hex(s: &str) -> Result<Vec<u8>, AbiError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(digits)?)
}

/// Calldata builder for statically-sized arguments.
pub struct CallBuilder {
    data: Vec<u8>,
}

impl CallBuilder {
    pub fn new(selector: [u8; 4]) -> Self {
        Self {
            data: selector.to_vec(),
        }
    }

    /// Appends an `address` argument, left-padded to a full slot.
    pub fn address(mut self, addr: &Address) -> Self {
        let mut word = [0u8; WORD];
        word[12..].copy_from_slice(addr.as_bytes());
        self.data.extend_from_slice(&word);
        self
    }

    /// Appends a `uint256` argument as a big-endian slot.
    pub fn uint(mut self, value: U256) -> Self {
        let mut word = [0u8; WORD];
        value.to_big_endian(&mut word);
        self.data.extend_from_slice(&word);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

/// Encodes the one dynamic-argument call the wallet submits:
/// `(address, uint256, bytes)`.
pub fn encode_address_uint_bytes(
    selector: [u8; 4],
    to: &Address,
    value: U256,
    payload: &[u8],
) -> Vec<u8> {
    let mut data = CallBuilder::new(selector)
        .address(to)
        .uint(value)
        // offset of the bytes tail, relative to the start of the arguments
        .uint(U256::from(3 * WORD))
        .uint(U256::from(payload.len()))
        .build();
    data.extend_from_slice(payload);
    let rem = payload.len() % WORD;
    if rem != 0 {
        data.resize(data.len() + WORD - rem, 0);
    }
    data
}

/// Read-side view over ABI return data, addressed in 32-byte slots.
pub struct WordReader<'a> {
    data: &'a [u8],
}

impl<'a> WordReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn word(&self, slot: usize) -> Result<&'a [u8], AbiError> {
        let start = slot * WORD;
        let end = start + WORD;
        self.data.get(start..end).ok_or(AbiError::ShortData {
            needed: end,
            got: self.data.len(),
        })
    }

    pub fn uint(&self, slot: usize) -> Result<U256, AbiError> {
        Ok(U256::from_big_endian(self.word(slot)?))
    }

    /// `uint256` slot that must fit in 64 bits (counters, ids).
    pub fn u64(&self, slot: usize) -> Result<u64, AbiError> {
        let value = self.uint(slot)?;
        if value > U256::from(u64::MAX) {
            return Err(AbiError::Overflow);
        }
        Ok(value.as_u64())
    }

    pub fn bool(&self, slot: usize) -> Result<bool, AbiError> {
        Ok(self.word(slot)?[WORD - 1] != 0)
    }

    /// `address` stored in the low 20 bytes of a slot.
    pub fn address(&self, slot: usize) -> Result<Address, AbiError> {
        let word = self.word(slot)?;
        let tail: [u8; 20] = word[12..].try_into().map_err(|_| AbiError::ShortData {
            needed: WORD,
            got: word.len(),
        })?;
        Ok(Address::from_bytes(tail))
    }

    /// Dynamic `bytes` argument: the head slot holds the tail offset, the
    /// tail holds a length slot followed by the payload.
    pub fn bytes(&self, slot: usize) -> Result<Vec<u8>, AbiError> {
        let offset = self.u64(slot)? as usize;
        let len_end = offset
            .checked_add(WORD)
            .ok_or(AbiError::BadOffset(offset))?;
        let len_word = self
            .data
            .get(offset..len_end)
            .ok_or(AbiError::BadOffset(offset))?;
        let len = U256::from_big_endian(len_word);
        if len > U256::from(u64::MAX) {
            return Err(AbiError::Overflow);
        }
        let len = len.as_u64() as usize;
        let end = len_end.checked_add(len).ok_or(AbiError::BadLength(len))?;
        let payload = self.data.get(len_end..end).ok_or(AbiError::BadLength(len))?;
        Ok(payload.to_vec())
    }

    /// Fixed-size address array laid out as consecutive slots.
    pub fn addresses(&self, start_slot: usize, count: usize) -> Result<Vec<Address>, AbiError> {
        (start_slot..start_slot + count)
            .map(|slot| self.address(slot))
            .collect()
    }
}
