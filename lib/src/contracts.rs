//! Typed bindings for the two deployed contracts.
//!
//! Reads go through `eth_call`; writes are submitted through the node's
//! managed account. The freeze contract's mutating entry points are only
//! ever reached through a multisig proposal, so this module exposes them as
//! calldata builders rather than direct calls.

use async_trait::async_trait;
use ethereum_types::U256;

use crate::abi::{self, AbiError, CallBuilder, WordReader};
use crate::decode::{FREEZE_SELECTOR, UNFREEZE_SELECTOR};
use crate::error::{Result, WalletError};
use crate::rpc::RpcClient;
use crate::types::{Address, RawTransaction};

// Multisig selectors.
const TRANSACTION_COUNT: [u8; 4] = [0xb7, 0x7b, 0xf6, 0x00]; // transactionCount()
const GET_TRANSACTION: [u8; 4] = [0x33, 0xea, 0x3d, 0xc8]; // getTransaction(uint256)
const IS_OWNER: [u8; 4] = [0x2f, 0x54, 0xbf, 0x6e]; // isOwner(address)
const IS_CONFIRMED: [u8; 4] = [0x80, 0xf5, 0x9a, 0x65]; // isConfirmed(uint256,address)
const GET_OWNERS: [u8; 4] = [0xa0, 0xe6, 0x7e, 0x2b]; // getOwners()
const SUBMIT_AND_CONFIRM: [u8; 4] = [0x71, 0x14, 0x90, 0x4b]; // submitAndConfirm(address,uint256,bytes)
const CONFIRM_TRANSACTION: [u8; 4] = [0xc0, 0x1a, 0x8c, 0x84]; // confirmTransaction(uint256)
const EXECUTE_TRANSACTION: [u8; 4] = [0xee, 0x22, 0x61, 0x0b]; // executeTransaction(uint256)

// Freeze contract selectors.
const IS_FROZEN: [u8; 4] = [0xe5, 0x83, 0x98, 0x36]; // isFrozen(address)

/// The multisig holds a fixed owner set of three.
pub const OWNER_COUNT: usize = 3;

/// Read surface of the multisig the aggregator depends on. A trait so the
/// aggregation flow can be driven by an in-memory fake in tests.
#[async_trait]
pub trait MultisigReader {
    async fn transaction_count(&self) -> Result<u64>;

    /// Batched `getTransaction` for the given ids. The output is aligned by
    /// position with `ids`; an entry whose read failed is `None`.
    async fn transaction_batch(&self, ids: &[u64]) -> Result<Vec<Option<RawTransaction>>>;
}

pub struct MultisigContract<'a> {
    rpc: &'a RpcClient,
    address: Address,
}

impl<'a> MultisigContract<'a> {
    pub fn new(rpc: &'a RpcClient, address: Address) -> Self {
        Self { rpc, address }
    }

    pub async fn is_owner(&self, account: &Address) -> Result<bool> {
        let data = CallBuilder::new(IS_OWNER).address(account).build();
        let ret = self.rpc.eth_call(&self.address, &data).await?;
        Ok(WordReader::new(&ret).bool(0)?)
    }

    pub async fn is_confirmed(&self, id: u64, owner: &Address) -> Result<bool> {
        let data = CallBuilder::new(IS_CONFIRMED)
            .uint(U256::from(id))
            .address(owner)
            .build();
        let ret = self.rpc.eth_call(&self.address, &data).await?;
        Ok(WordReader::new(&ret).bool(0)?)
    }

    pub async fn owners(&self) -> Result<Vec<Address>> {
        let data = CallBuilder::new(GET_OWNERS).build();
        let ret = self.rpc.eth_call(&self.address, &data).await?;
        Ok(WordReader::new(&ret).addresses(0, OWNER_COUNT)?)
    }

    /// Submits a call through the multisig and auto-confirms it as the
    /// sender. Returns the submission's transaction hash.
    pub async fn submit_and_confirm(
        &self,
        from: &Address,
        to: &Address,
        value: U256,
        call: &[u8],
    ) -> Result<String> {
        let data = abi::encode_address_uint_bytes(SUBMIT_AND_CONFIRM, to, value, call);
        self.rpc
            .send_transaction(from, &self.address, U256::zero(), &data)
            .await
    }

    pub async fn confirm_transaction(&self, from: &Address, id: u64) -> Result<String> {
        let data = CallBuilder::new(CONFIRM_TRANSACTION)
            .uint(U256::from(id))
            .build();
        self.rpc
            .send_transaction(from, &self.address, U256::zero(), &data)
            .await
    }

    pub async fn execute_transaction(&self, from: &Address, id: u64) -> Result<String> {
        let data = CallBuilder::new(EXECUTE_TRANSACTION)
            .uint(U256::from(id))
            .build();
        self.rpc
            .send_transaction(from, &self.address, U256::zero(), &data)
            .await
    }
}

#[async_trait]
impl MultisigReader for MultisigContract<'_> {
    async fn transaction_count(&self) -> Result<u64> {
        let data = CallBuilder::new(TRANSACTION_COUNT).build();
        let ret = self.rpc.eth_call(&self.address, &data).await?;
        Ok(WordReader::new(&ret).u64(0)?)
    }

    async fn transaction_batch(&self, ids: &[u64]) -> Result<Vec<Option<RawTransaction>>> {
        let calls: Vec<(Address, Vec<u8>)> = ids
            .iter()
            .map(|id| {
                let data = CallBuilder::new(GET_TRANSACTION)
                    .uint(U256::from(*id))
                    .build();
                (self.address, data)
            })
            .collect();
        let results = self.rpc.eth_call_batch(&calls).await?;
        Ok(ids
            .iter()
            .zip(results)
            .map(|(id, entry)| {
                let decoded = entry
                    .and_then(|ret| decode_transaction(&ret).map_err(WalletError::Contract));
                match decoded {
                    Ok(tx) => Some(tx),
                    Err(err) => {
                        log::warn!("getTransaction({id}) failed, skipping: {err}");
                        None
                    }
                }
            })
            .collect())
    }
}

/// Decodes the `getTransaction` return tuple
/// `(address to, uint256 value, bytes data, bool executed, uint256 numConfirmations)`.
pub fn decode_transaction(ret: &[u8]) -> std::result::Result<RawTransaction, AbiError> {
    let reader = WordReader::new(ret);
    Ok(RawTransaction {
        to: reader.address(0)?,
        value: reader.uint(1)?,
        data: reader.bytes(2)?,
        executed: reader.bool(3)?,
        num_confirmations: reader.u64(4)?,
    })
}

pub struct FreezeContract<'a> {
    rpc: &'a RpcClient,
    address: Address,
}

impl<'a> FreezeContract<'a> {
    pub fn new(rpc: &'a RpcClient, address: Address) -> Self {
        Self { rpc, address }
    }

    pub async fn is_frozen(&self, account: &Address) -> Result<bool> {
        let data = CallBuilder::new(IS_FROZEN).address(account).build();
        let ret = self.rpc.eth_call(&self.address, &data).await?;
        Ok(WordReader::new(&ret).bool(0)?)
    }
}

/// Calldata for `freeze(address)`, to be wrapped in a multisig proposal.
pub fn freeze_calldata(target: &Address) -> Vec<u8> {
    CallBuilder::new(FREEZE_SELECTOR).address(target).build()
}

/// Calldata for the unfreeze entry point, to be wrapped in a multisig
/// proposal.
pub fn unfreeze_calldata(target: &Address) -> Vec<u8> {
    CallBuilder::new(UNFREEZE_SELECTOR).address(target).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::classify;
    use crate::types::ProposalKind;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    /// Builds a `getTransaction` return tuple by hand.
    fn encode_transaction(tx: &RawTransaction) -> Vec<u8> {
        let mut head = CallBuilder::new([0; 4])
            .address(&tx.to)
            .uint(tx.value)
            .uint(U256::from(5 * abi::WORD)) // offset of the bytes tail
            .uint(U256::from(u64::from(tx.executed)))
            .uint(U256::from(tx.num_confirmations))
            .build()
            .split_off(4);
        let mut len_word = [0u8; abi::WORD];
        U256::from(tx.data.len()).to_big_endian(&mut len_word);
        head.extend_from_slice(&len_word);
        head.extend_from_slice(&tx.data);
        let rem = tx.data.len() % abi::WORD;
        if rem != 0 {
            head.resize(head.len() + abi::WORD - rem, 0);
        }
        head
    }

    #[test]
    fn transaction_tuple_roundtrip() {
        let tx = RawTransaction {
            to: addr(0x42),
            value: U256::from(1_000_000u64),
            data: vec![0x8d, 0x1f, 0xdf, 0x2f, 0xaa, 0xbb],
            executed: true,
            num_confirmations: 2,
        };
        let encoded = encode_transaction(&tx);
        assert_eq!(decode_transaction(&encoded).unwrap(), tx);
    }

    #[test]
    fn transaction_tuple_with_empty_calldata() {
        let tx = RawTransaction {
            to: addr(0x01),
            value: U256::zero(),
            data: Vec::new(),
            executed: false,
            num_confirmations: 0,
        };
        let encoded = encode_transaction(&tx);
        assert_eq!(decode_transaction(&encoded).unwrap(), tx);
    }

    #[test]
    fn truncated_transaction_tuple_is_an_error() {
        assert!(decode_transaction(&[0u8; 3 * abi::WORD]).is_err());
        assert!(decode_transaction(&[]).is_err());
    }

    #[test]
    fn freeze_calldata_classifies_back() {
        let freeze_contract = addr(0x0f);
        let target = addr(0x77);
        let kind = classify(&freeze_contract, &freeze_contract, &freeze_calldata(&target));
        assert_eq!(kind, ProposalKind::Freeze { target });
        let kind = classify(
            &freeze_contract,
            &freeze_contract,
            &unfreeze_calldata(&target),
        );
        assert_eq!(kind, ProposalKind::Unfreeze { target });
    }
}
