//! Calldata classification for multisig proposals.
//!
//! The wallet recognises exactly the freeze contract's two entry points.
//! Anything else, including calldata too short to carry a selector, comes
//! back as [`ProposalKind::Unknown`]; classification never fails.

use crate::abi;
use crate::types::{Address, ProposalKind};

/// `freeze(address)` on the deployed freeze contract.
pub const FREEZE_SELECTOR: [u8; 4] = [0x8d, 0x1f, 0xdf, 0x2f];

/// Unfreeze entry point on the deployed freeze contract.
pub const UNFREEZE_SELECTOR: [u8; 4] = [0x45, 0xc2, 0xba, 0xdf];

type KindDecoder = fn(&[u8]) -> Option<ProposalKind>;

/// Selector table. Adding a new recognised call is one more row here; the
/// classification flow below never changes.
const DECODERS: &[([u8; 4], KindDecoder)] = &[
    (FREEZE_SELECTOR, decode_freeze),
    (UNFREEZE_SELECTOR, decode_unfreeze),
];

/// Account argument from the low 20 bytes of the first parameter slot.
fn target_address(args: &[u8]) -> Option<Address> {
    let slot = args.get(..abi::WORD)?;
    Address::from_slice(&slot[12..])
}

fn decode_freeze(args: &[u8]) -> Option<ProposalKind> {
    target_address(args).map(|target| ProposalKind::Freeze { target })
}

fn decode_unfreeze(args: &[u8]) -> Option<ProposalKind> {
    target_address(args).map(|target| ProposalKind::Unfreeze { target })
}

/// Classifies a multisig transaction by call target and calldata.
///
/// Pure function of `(to, data)`: no IO, deterministic, and total. A call
/// whose target is not the configured freeze contract is `Unknown` no matter
/// what its calldata says.
pub fn classify(freeze_contract: &Address, to: &Address, data: &[u8]) -> ProposalKind {
    if to != freeze_contract {
        return ProposalKind::Unknown;
    }
    let Some(sel) = abi::selector(data) else {
        return ProposalKind::Unknown;
    };
    for (known, decoder) in DECODERS {
        if *known == sel {
            return decoder(&data[4..]).unwrap_or(ProposalKind::Unknown);
        }
    }
    ProposalKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREEZE_CONTRACT: &str = "0x00000000000000000000000000000000000f0f0f";
    const TARGET: &str = "0x1111111111111111111111111111111111111111";

    fn freeze_contract() -> Address {
        FREEZE_CONTRACT.parse().unwrap()
    }

    fn target() -> Address {
        TARGET.parse().unwrap()
    }

    /// Selector followed by the target left-padded to one slot.
    fn calldata(selector: [u8; 4]) -> Vec<u8> {
        let mut data = selector.to_vec();
        data.extend_from_slice(&[0u8; 12]);
        data.extend_from_slice(target().as_bytes());
        data
    }

    #[test]
    fn freeze_calldata_classifies_with_target() {
        let kind = classify(&freeze_contract(), &freeze_contract(), &calldata(FREEZE_SELECTOR));
        assert_eq!(kind, ProposalKind::Freeze { target: target() });
    }

    #[test]
    fn unfreeze_calldata_classifies_with_target() {
        let kind = classify(
            &freeze_contract(),
            &freeze_contract(),
            &calldata(UNFREEZE_SELECTOR),
        );
        assert_eq!(kind, ProposalKind::Unfreeze { target: target() });
    }

    #[test]
    fn other_call_target_is_unknown_regardless_of_data() {
        let other: Address = "0x2222222222222222222222222222222222222222".parse().unwrap();
        let kind = classify(&freeze_contract(), &other, &calldata(FREEZE_SELECTOR));
        assert_eq!(kind, ProposalKind::Unknown);
    }

    #[test]
    fn short_data_is_unknown() {
        for len in 0..4 {
            let data = vec![0x8d; len];
            let kind = classify(&freeze_contract(), &freeze_contract(), &data);
            assert_eq!(kind, ProposalKind::Unknown, "len {len}");
        }
    }

    #[test]
    fn unrecognised_selector_is_unknown() {
        let kind = classify(
            &freeze_contract(),
            &freeze_contract(),
            &calldata([0x12, 0x34, 0x56, 0x78]),
        );
        assert_eq!(kind, ProposalKind::Unknown);
    }

    #[test]
    fn known_selector_with_truncated_argument_is_unknown() {
        // selector plus half a parameter slot
        let mut data = FREEZE_SELECTOR.to_vec();
        data.extend_from_slice(&[0u8; 16]);
        let kind = classify(&freeze_contract(), &freeze_contract(), &data);
        assert_eq!(kind, ProposalKind::Unknown);
    }

    #[test]
    fn classification_is_deterministic() {
        let data = calldata(FREEZE_SELECTOR);
        let first = classify(&freeze_contract(), &freeze_contract(), &data);
        let second = classify(&freeze_contract(), &freeze_contract(), &data);
        assert_eq!(first, second);
    }
}
