//! Block and transaction application.

use crate::block::Block;
use crate::config::ChainConfig;
use crate::genesis::apply_genesis;
use crate::invariants::validate_invariants;
use crate::metrics::ChainMetrics;
use crate::snapshot::StateSnapshot;
use crate::ChainError;
use covenant_authority::verify_authority;
use covenant_recovery::AccountRecoveryFlow;
use covenant_rewards::RewardAccrualEngine;
use covenant_store::LedgerStore;
use covenant_transactions::{validate_expiration, validate_transaction, SignedTransaction};
use covenant_types::{ChainId, ChainParams, LedgerError, LedgerEvent, StateError, Timestamp};
use covenant_vesting::{DelegationLedger, WithdrawalScheduler};
use covenant_voting::ProxyVoteGraph;

/// The governance state machine over a store `S`.
pub struct Chain<S: LedgerStore> {
    pub(crate) store: S,
    pub(crate) params: ChainParams,
    chain_id: ChainId,
    pub(crate) graph: ProxyVoteGraph,
    pub(crate) delegations: DelegationLedger,
    pub(crate) withdrawals: WithdrawalScheduler,
    pub(crate) rewards: RewardAccrualEngine,
    pub(crate) recovery: AccountRecoveryFlow,
    check_invariants: bool,
    metrics: Option<ChainMetrics>,
}

impl<S: LedgerStore> Chain<S> {
    /// Wrap a store that already holds chain state.
    pub fn new(store: S, params: ChainParams, chain_id: ChainId) -> Self {
        Self {
            graph: ProxyVoteGraph::from_params(&params),
            delegations: DelegationLedger::from_params(&params),
            withdrawals: WithdrawalScheduler::from_params(&params),
            rewards: RewardAccrualEngine::from_params(&params),
            recovery: AccountRecoveryFlow::from_params(&params),
            store,
            params,
            chain_id,
            check_invariants: false,
            metrics: None,
        }
    }

    /// Start a chain on an empty store from the config's genesis.
    pub fn from_genesis(mut store: S, config: &ChainConfig) -> Result<Self, ChainError> {
        let graph = ProxyVoteGraph::from_params(&config.params);
        apply_genesis(&mut store, &graph, &config.genesis)?;
        let chain = Self::new(store, config.params.clone(), config.chain_id()?)
            .with_invariant_checks(config.check_invariants);
        Ok(chain)
    }

    /// Run [`validate_invariants`] after every block; a violation rejects the block.
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    pub fn with_metrics(mut self, metrics: ChainMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn metrics(&self) -> Option<&ChainMetrics> {
        self.metrics.as_ref()
    }

    pub fn head_time(&self) -> Result<Timestamp, LedgerError> {
        Ok(self.store.globals()?.time)
    }

    pub fn head_block_number(&self) -> Result<u64, LedgerError> {
        Ok(self.store.globals()?.head_block_number)
    }

    /// Owned copy of the committed state.
    pub fn snapshot(&self) -> Result<StateSnapshot, LedgerError> {
        StateSnapshot::capture(&self.store)
    }

    pub fn validate_invariants(&self) -> Result<(), LedgerError> {
        validate_invariants(&self.store)
    }

    /// Apply a whole block or nothing.
    ///
    /// The block must follow the head block and carry a later timestamp.
    /// Returns every event its transactions and maintenance produced.
    pub fn apply_block(&mut self, block: &Block) -> Result<Vec<LedgerEvent>, LedgerError> {
        let globals = self.store.globals()?;
        if block.number != globals.head_block_number + 1 {
            return Err(LedgerError::InvalidBlock(format!(
                "block {} does not follow head {}",
                block.number, globals.head_block_number
            )));
        }
        if block.timestamp <= globals.time {
            return Err(LedgerError::InvalidBlock(format!(
                "block time {} not after head time {}",
                block.timestamp, globals.time
            )));
        }

        self.store.begin_session();
        match self.apply_block_inner(block) {
            Ok(events) => {
                self.store.commit_session()?;
                tracing::info!(
                    block = block.number,
                    transactions = block.transactions.len(),
                    events = events.len(),
                    "block applied"
                );
                if let Some(m) = &self.metrics {
                    m.blocks_applied.inc();
                    m.head_block.set(i64::try_from(block.number).unwrap_or(i64::MAX));
                    m.account_count
                        .set(i64::try_from(self.store.account_count()?).unwrap_or(i64::MAX));
                    m.observe_events(&events);
                }
                Ok(events)
            }
            Err(e) => {
                self.store.rollback_session()?;
                tracing::warn!(block = block.number, error = %e, "block rejected");
                if let Some(m) = &self.metrics {
                    m.blocks_rejected.inc();
                }
                Err(e)
            }
        }
    }

    fn apply_block_inner(&mut self, block: &Block) -> Result<Vec<LedgerEvent>, LedgerError> {
        let now = block.timestamp;
        let mut globals = self.store.globals()?;
        globals.head_block_number = block.number;
        globals.time = now;
        self.store.put_globals(&globals)?;

        let mut events = Vec::new();
        for tx in &block.transactions {
            self.apply_transaction(tx, now, &mut events)?;
        }
        self.run_maintenance(now, &mut events)?;

        if self.check_invariants {
            validate_invariants(&self.store)?;
        }
        Ok(events)
    }

    /// Apply one transaction on top of the head state, outside any block.
    pub fn push_transaction(
        &mut self,
        tx: &SignedTransaction,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let now = self.head_time()?;
        let mut events = Vec::new();
        self.apply_transaction(tx, now, &mut events)?;
        Ok(events)
    }

    /// Validate, authorise and apply `tx` in its own undo session.
    fn apply_transaction(
        &mut self,
        tx: &SignedTransaction,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        let mut tx_events = Vec::new();
        self.store.begin_session();
        match self.apply_transaction_inner(tx, now, &mut tx_events) {
            Ok(()) => {
                self.store.commit_session()?;
                if let Some(m) = &self.metrics {
                    m.transactions_applied.inc();
                    for op in &tx.transaction.operations {
                        m.operations_applied.with_label_values(&[op.name()]).inc();
                    }
                }
                events.append(&mut tx_events);
                Ok(())
            }
            Err(e) => {
                self.store.rollback_session()?;
                tracing::debug!(error = %e, "transaction rejected");
                if let Some(m) = &self.metrics {
                    m.transactions_rejected.inc();
                }
                Err(e)
            }
        }
    }

    fn apply_transaction_inner(
        &mut self,
        signed: &SignedTransaction,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        let tx = &signed.transaction;
        validate_transaction(tx, &self.params)?;
        validate_expiration(tx, now, &self.params)?;

        let id = tx.id()?;
        if self.store.has_transaction(&id)? {
            return Err(StateError::DuplicateTransaction.into());
        }
        let signers = signed.signers(&self.chain_id)?;
        verify_authority(&self.store, &tx.required_authorities(), &signers, &self.params)?;

        for op in &tx.operations {
            self.apply_operation(op, now, events)?;
        }
        self.store.insert_transaction(&id, tx.expiration)?;
        Ok(())
    }

    /// Per-block housekeeping in its fixed order.
    fn run_maintenance(
        &mut self,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        let returned = self
            .delegations
            .process_expirations(&mut self.store, now, events)?;
        let paid = self
            .withdrawals
            .tick(&mut self.store, &self.graph, now, events)?;
        self.rewards.decay_all(&mut self.store, now)?;
        self.recovery
            .process_maintenance(&mut self.store, now, events)?;
        let pruned = self.store.remove_expired_transactions(now)?;
        if returned + paid + pruned > 0 {
            tracing::debug!(returned, paid, pruned, "maintenance");
        }
        Ok(())
    }
}
