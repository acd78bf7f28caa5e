//! Aggregation of on-chain multisig transactions into a display-ready
//! proposal feed.
//!
//! Each cycle reads the contract's transaction count, batch-reads the most
//! recent records newest-first, classifies every calldata blob, and returns
//! the assembled window. Records are projections of contract storage:
//! nothing is cached between cycles beyond the last successfully published
//! feed, and nothing is ever written.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::contracts::MultisigReader;
use crate::decode;
use crate::error::Result;
use crate::types::{Address, Proposal, ProposalFeed, RawTransaction};

/// Reverse-chronological id window for a given transaction count:
/// `count-1, count-2, ..., max(0, count-page_size)`.
pub fn id_window(count: u64, page_size: u64) -> Vec<u64> {
    let first = count.saturating_sub(page_size);
    (first..count).rev().collect()
}

pub struct ProposalAggregator<R> {
    reader: R,
    freeze_address: Address,
    page_size: u64,
    /// Cycle counter guarding against a slow cycle overwriting a newer one.
    generation: AtomicU64,
    /// Last successfully published feed, tagged with its generation.
    latest: Mutex<Option<(u64, ProposalFeed)>>,
}

impl<R: MultisigReader> ProposalAggregator<R> {
    pub fn new(reader: R, freeze_address: Address, page_size: u64) -> Self {
        Self {
            reader,
            freeze_address,
            page_size,
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
        }
    }

    /// Runs one aggregation cycle and returns the resulting feed.
    ///
    /// Individual transaction reads that fail are skipped; the surviving
    /// entries keep their request order (descending id, newest first). A
    /// count of zero issues no transaction reads at all. On error the last
    /// published feed stays in place.
    pub async fn aggregate(&self) -> Result<ProposalFeed> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        let total_count = self.reader.transaction_count().await?;
        let ids = id_window(total_count, self.page_size);
        let records = if ids.is_empty() {
            Vec::new()
        } else {
            self.reader.transaction_batch(&ids).await?
        };

        let proposals = ids
            .iter()
            .zip(records)
            .filter_map(|(id, record)| {
                record.map(|tx| self.build_proposal(*id, tx))
            })
            .collect();

        let feed = ProposalFeed {
            proposals,
            total_count,
        };
        self.publish(generation, feed.clone());
        Ok(feed)
    }

    fn build_proposal(&self, id: u64, tx: RawTransaction) -> Proposal {
        let kind = decode::classify(&self.freeze_address, &tx.to, &tx.data);
        Proposal {
            id,
            to: tx.to,
            value: tx.value,
            data: tx.data,
            executed: tx.executed,
            num_confirmations: tx.num_confirmations,
            kind,
        }
    }

    /// Publishes a completed cycle unless a newer cycle already published.
    fn publish(&self, generation: u64, feed: ProposalFeed) {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        match latest.as_ref() {
            Some((published, _)) if *published > generation => {
                log::debug!("dropping stale aggregation cycle {generation}");
            }
            _ => *latest = Some((generation, feed)),
        }
    }

    /// Last successfully published feed, if any cycle has completed.
    pub fn latest(&self) -> Option<ProposalFeed> {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.as_ref().map(|(_, feed)| feed.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    use async_trait::async_trait;
    use ethereum_types::U256;

    use crate::contracts::{freeze_calldata, unfreeze_calldata};
    use crate::types::ProposalKind;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    const FREEZE_CONTRACT: u8 = 0x0f;

    struct FakeMultisig {
        count: u64,
        txs: HashMap<u64, RawTransaction>,
        fail: HashSet<u64>,
        batches: Arc<Mutex<Vec<Vec<u64>>>>,
    }

    impl FakeMultisig {
        fn new(count: u64) -> (Self, Arc<Mutex<Vec<Vec<u64>>>>) {
            let batches = Arc::new(Mutex::new(Vec::new()));
            let fake = Self {
                count,
                txs: HashMap::new(),
                fail: HashSet::new(),
                batches: batches.clone(),
            };
            (fake, batches)
        }

        fn with_tx(mut self, id: u64, tx: RawTransaction) -> Self {
            self.txs.insert(id, tx);
            self
        }

        fn failing(mut self, id: u64) -> Self {
            self.fail.insert(id);
            self
        }
    }

    #[async_trait]
    impl MultisigReader for FakeMultisig {
        async fn transaction_count(&self) -> Result<u64> {
            Ok(self.count)
        }

        async fn transaction_batch(&self, ids: &[u64]) -> Result<Vec<Option<RawTransaction>>> {
            self.batches.lock().unwrap().push(ids.to_vec());
            Ok(ids
                .iter()
                .map(|id| {
                    if self.fail.contains(id) {
                        None
                    } else {
                        self.txs.get(id).cloned()
                    }
                })
                .collect())
        }
    }

    fn plain_tx(to: Address, data: Vec<u8>, executed: bool, confirmations: u64) -> RawTransaction {
        RawTransaction {
            to,
            value: U256::zero(),
            data,
            executed,
            num_confirmations: confirmations,
        }
    }

    #[test]
    fn window_is_empty_for_zero_count() {
        assert!(id_window(0, 50).is_empty());
    }

    #[test]
    fn window_is_descending_and_capped() {
        assert_eq!(id_window(3, 50), vec![2, 1, 0]);
        let window = id_window(60, 50);
        assert_eq!(window.len(), 50);
        assert_eq!(window.first(), Some(&59));
        assert_eq!(window.last(), Some(&10));
        assert!(window.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn window_length_is_min_of_count_and_page_size() {
        for count in [0u64, 1, 49, 50, 51, 1000] {
            assert_eq!(id_window(count, 50).len() as u64, count.min(50));
        }
    }

    #[tokio::test]
    async fn zero_count_issues_no_transaction_reads() {
        let (fake, batches) = FakeMultisig::new(0);
        let aggregator = ProposalAggregator::new(fake, addr(FREEZE_CONTRACT), 50);
        let feed = aggregator.aggregate().await.unwrap();
        assert_eq!(feed, ProposalFeed::default());
        assert!(batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mixed_scenario_classifies_and_orders_newest_first() {
        let freeze_contract = addr(FREEZE_CONTRACT);
        let target_a = addr(0xaa);
        let target_b = addr(0xbb);
        let other = addr(0x33);

        let (fake, _) = FakeMultisig::new(3);
        let fake = fake
            .with_tx(0, plain_tx(freeze_contract, freeze_calldata(&target_a), false, 1))
            .with_tx(1, plain_tx(freeze_contract, unfreeze_calldata(&target_b), true, 2))
            .with_tx(2, plain_tx(other, vec![0x12, 0x34, 0x56, 0x78], false, 0));

        let aggregator = ProposalAggregator::new(fake, freeze_contract, 50);
        let feed = aggregator.aggregate().await.unwrap();

        assert_eq!(feed.total_count, 3);
        let ids: Vec<u64> = feed.proposals.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 0]);

        assert_eq!(feed.proposals[0].kind, ProposalKind::Unknown);
        assert_eq!(
            feed.proposals[1].kind,
            ProposalKind::Unfreeze { target: target_b }
        );
        assert!(feed.proposals[1].executed);
        assert_eq!(
            feed.proposals[2].kind,
            ProposalKind::Freeze { target: target_a }
        );
        assert!(!feed.proposals[2].executed);
        assert_eq!(feed.proposals[2].num_confirmations, 1);
    }

    #[tokio::test]
    async fn failed_reads_are_skipped_not_fatal() {
        let freeze_contract = addr(FREEZE_CONTRACT);
        let (fake, _) = FakeMultisig::new(3);
        let fake = fake
            .with_tx(0, plain_tx(freeze_contract, freeze_calldata(&addr(0x01)), false, 1))
            .with_tx(2, plain_tx(freeze_contract, freeze_calldata(&addr(0x02)), false, 1))
            .failing(1);

        let aggregator = ProposalAggregator::new(fake, freeze_contract, 50);
        let feed = aggregator.aggregate().await.unwrap();

        let ids: Vec<u64> = feed.proposals.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 0]);
        assert_eq!(feed.total_count, 3);
    }

    #[tokio::test]
    async fn aggregation_is_idempotent_without_chain_changes() {
        let freeze_contract = addr(FREEZE_CONTRACT);
        let (fake, _) = FakeMultisig::new(2);
        let fake = fake
            .with_tx(0, plain_tx(freeze_contract, freeze_calldata(&addr(0x01)), false, 1))
            .with_tx(1, plain_tx(freeze_contract, unfreeze_calldata(&addr(0x02)), false, 2));

        let aggregator = ProposalAggregator::new(fake, freeze_contract, 50);
        let first = aggregator.aggregate().await.unwrap();
        let second = aggregator.aggregate().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn window_respects_configured_page_size() {
        let freeze_contract = addr(FREEZE_CONTRACT);
        let (fake, batches) = FakeMultisig::new(10);
        let aggregator = ProposalAggregator::new(fake, freeze_contract, 4);
        let feed = aggregator.aggregate().await.unwrap();
        assert_eq!(feed.total_count, 10);
        assert_eq!(batches.lock().unwrap()[0], vec![9, 8, 7, 6]);
    }

    #[tokio::test]
    async fn stale_cycle_does_not_overwrite_newer_publish() {
        let (fake, _) = FakeMultisig::new(0);
        let aggregator = ProposalAggregator::new(fake, addr(FREEZE_CONTRACT), 50);

        let newer = ProposalFeed {
            proposals: Vec::new(),
            total_count: 7,
        };
        let stale = ProposalFeed {
            proposals: Vec::new(),
            total_count: 3,
        };
        aggregator.publish(5, newer.clone());
        aggregator.publish(2, stale);
        assert_eq!(aggregator.latest(), Some(newer));
    }
}
