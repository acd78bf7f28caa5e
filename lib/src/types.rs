use std::fmt;
use std::str::FromStr;

use ethereum_types::{H160, U256};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WalletError;

/// 20-byte account address.
///
/// Parsing accepts any hex casing; equality is byte equality, so two
/// spellings of the same account always compare equal. Displays as
/// lowercase `0x`-prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(H160);

impl Address {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(H160(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 20] = bytes.try_into().ok()?;
        Some(Self::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| WalletError::InvalidInput(format!("address must start with 0x: {s}")))?;
        if digits.len() != 40 {
            return Err(WalletError::InvalidInput(format!(
                "address must be 40 hex digits, got {}",
                digits.len()
            )));
        }
        let bytes = hex::decode(digits).map_err(|_| {
            WalletError::InvalidInput(format!("address contains non-hex characters: {s}"))
        })?;
        Ok(Address(H160::from_slice(&bytes)))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Raw `getTransaction` record exactly as the multisig contract returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub executed: bool,
    pub num_confirmations: u64,
}

/// Classification of a proposal's calldata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalKind {
    Freeze { target: Address },
    Unfreeze { target: Address },
    Unknown,
}

impl ProposalKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProposalKind::Freeze { .. } => "freeze",
            ProposalKind::Unfreeze { .. } => "unfreeze",
            ProposalKind::Unknown => "unknown",
        }
    }

    pub fn target(&self) -> Option<&Address> {
        match self {
            ProposalKind::Freeze { target } | ProposalKind::Unfreeze { target } => Some(target),
            ProposalKind::Unknown => None,
        }
    }
}

/// A multisig transaction projected for display. Read-only: records are
/// rebuilt from contract storage on every aggregation cycle and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Index into the multisig's transaction array, assigned by the contract.
    pub id: u64,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub executed: bool,
    pub num_confirmations: u64,
    pub kind: ProposalKind,
}

/// One aggregation cycle's output: the newest-first proposal window plus the
/// contract's total transaction count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProposalFeed {
    pub proposals: Vec<Proposal>,
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_roundtrip_is_lowercase() {
        let addr: Address = "0xAbCdEf0123456789abcdef0123456789ABCDEF01"
            .parse()
            .unwrap();
        assert_eq!(addr.to_string(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn address_equality_ignores_case() {
        let upper: Address = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01"
            .parse()
            .unwrap();
        let lower: Address = "0xabcdef0123456789abcdef0123456789abcdef01"
            .parse()
            .unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn address_rejects_bad_input() {
        assert!("abcdef0123456789abcdef0123456789abcdef01"
            .parse::<Address>()
            .is_err());
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzzcdef0123456789abcdef0123456789abcdef01"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn address_serde_uses_hex_string() {
        let addr: Address = "0xabcdef0123456789abcdef0123456789abcdef01"
            .parse()
            .unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0xabcdef0123456789abcdef0123456789abcdef01\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
