//! Contract event subscriptions.
//!
//! Each subscription is a background task that polls the chain for new logs
//! of one event kind and hands every decoded event to a callback. Polling
//! starts at the block that is current when the task starts; failed polls are
//! logged and retried on the next tick.

use alloy::primitives::{Address, B256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::blockchain::contract::IVault;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::units;
use crate::observability::metrics;

/// Events emitted by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Deposit,
    Withdrawal,
    ValueSet,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Deposit, EventKind::Withdrawal, EventKind::ValueSet];

    /// Solidity event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Deposit => "Deposit",
            EventKind::Withdrawal => "Withdrawal",
            EventKind::ValueSet => "ValueSet",
        }
    }

    /// Topic 0 of logs of this kind.
    pub fn signature_hash(&self) -> B256 {
        match self {
            EventKind::Deposit => IVault::Deposit::SIGNATURE_HASH,
            EventKind::Withdrawal => IVault::Withdrawal::SIGNATURE_HASH,
            EventKind::ValueSet => IVault::ValueSet::SIGNATURE_HASH,
        }
    }

    /// Decode a log of this kind, converting amounts to ether strings.
    pub fn decode(&self, log: &Log) -> BlockchainResult<ContractEvent> {
        let decode_err = |e: alloy::sol_types::Error| {
            BlockchainError::Rpc(format!("failed to decode {} log: {}", self.as_str(), e))
        };
        let event = match self {
            EventKind::Deposit => {
                let decoded = log.log_decode::<IVault::Deposit>().map_err(decode_err)?;
                let data = decoded.inner.data;
                ContractEvent::Deposit(DepositEvent {
                    sender: data.sender,
                    amount: units::format_amount(data.amount),
                })
            }
            EventKind::Withdrawal => {
                let decoded = log.log_decode::<IVault::Withdrawal>().map_err(decode_err)?;
                let data = decoded.inner.data;
                ContractEvent::Withdrawal(WithdrawalEvent {
                    recipient: data.recipient,
                    amount: units::format_amount(data.amount),
                })
            }
            EventKind::ValueSet => {
                let decoded = log.log_decode::<IVault::ValueSet>().map_err(decode_err)?;
                ContractEvent::ValueSet(ValueSetEvent {
                    new_value: decoded.inner.data.newValue.to_string(),
                })
            }
        };
        Ok(event)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BlockchainError::UnknownEvent(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositEvent {
    pub sender: Address,
    /// Ether amount.
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalEvent {
    pub recipient: Address,
    /// Ether amount.
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetEvent {
    pub new_value: String,
}

/// A decoded contract event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractEvent {
    Deposit(DepositEvent),
    Withdrawal(WithdrawalEvent),
    ValueSet(ValueSetEvent),
}

impl ContractEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ContractEvent::Deposit(_) => EventKind::Deposit,
            ContractEvent::Withdrawal(_) => EventKind::Withdrawal,
            ContractEvent::ValueSet(_) => EventKind::ValueSet,
        }
    }
}

/// Handle to a running subscription.
///
/// Dropping the handle leaves the listener running; call [`Subscription::cancel`]
/// to stop it.
#[derive(Debug)]
pub struct Subscription {
    kind: EventKind,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn cancel(&self) {
        self.task.abort();
        tracing::debug!(event = %self.kind, "Subscription cancelled");
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

type Callback = Arc<dyn Fn(ContractEvent) + Send + Sync>;

/// Spawn the polling task for one subscription.
pub(crate) fn spawn_subscription<F>(
    provider: DynProvider,
    contract_address: Address,
    kind: EventKind,
    poll_interval: Duration,
    callback: F,
) -> Subscription
where
    F: Fn(ContractEvent) + Send + Sync + 'static,
{
    let poller = EventPoller {
        provider,
        contract_address,
        kind,
        poll_interval,
        callback: Arc::new(callback),
        last_block: None,
    };
    let task = tokio::spawn(poller.run());
    tracing::info!(event = %kind, contract = %contract_address, "Subscribed to contract event");
    Subscription { kind, task }
}

struct EventPoller {
    provider: DynProvider,
    contract_address: Address,
    kind: EventKind,
    poll_interval: Duration,
    callback: Callback,
    /// Highest block already scanned.
    last_block: Option<u64>,
}

impl EventPoller {
    async fn run(mut self) {
        match self.provider.get_block_number().await {
            Ok(block) => {
                self.last_block = Some(block);
                tracing::debug!(event = %self.kind, block, "Event polling starts");
            }
            Err(e) => {
                tracing::warn!(event = %self.kind, error = %e, "Failed to read start block");
            }
        }

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = self.poll().await {
                tracing::warn!(event = %self.kind, error = %e, "Error polling contract events");
            }
        }
    }

    async fn poll(&mut self) -> BlockchainResult<()> {
        let current_block = self.provider.get_block_number().await?;

        let from_block = match self.last_block {
            Some(last) if current_block <= last => return Ok(()),
            Some(last) => last + 1,
            // Start block could not be read; begin at the current head.
            None => current_block,
        };

        let filter = Filter::new()
            .address(self.contract_address)
            .event_signature(self.kind.signature_hash())
            .from_block(from_block)
            .to_block(current_block);

        let logs = self.provider.get_logs(&filter).await?;
        for log in &logs {
            match self.kind.decode(log) {
                Ok(event) => {
                    metrics::record_contract_event(self.kind.as_str());
                    (self.callback)(event);
                }
                Err(e) => tracing::warn!(event = %self.kind, error = %e, "Skipping undecodable log"),
            }
        }

        self.last_block = Some(current_block);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{LogData, U256};

    fn rpc_log<E: SolEvent>(event: &E) -> Log {
        let data: LogData = event.encode_log_data();
        Log {
            inner: alloy::primitives::Log { address: Address::ZERO, data },
            ..Default::default()
        }
    }

    #[test]
    fn test_event_kind_from_str() {
        assert_eq!("Deposit".parse::<EventKind>().unwrap(), EventKind::Deposit);
        assert_eq!("Withdrawal".parse::<EventKind>().unwrap(), EventKind::Withdrawal);
        assert_eq!("ValueSet".parse::<EventKind>().unwrap(), EventKind::ValueSet);

        let err = "Transfer".parse::<EventKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown event 'Transfer'");
    }

    #[test]
    fn test_signature_hashes_distinct() {
        let hashes: std::collections::HashSet<_> =
            EventKind::ALL.iter().map(|k| k.signature_hash()).collect();
        assert_eq!(hashes.len(), 3);
    }

    #[test]
    fn test_decode_deposit() {
        let sender = Address::repeat_byte(0x11);
        let log = rpc_log(&IVault::Deposit {
            sender,
            amount: U256::from(10_000_000_000_000_000u64),
        });

        let event = EventKind::Deposit.decode(&log).unwrap();
        assert_eq!(
            event,
            ContractEvent::Deposit(DepositEvent { sender, amount: "0.01".into() })
        );
        assert_eq!(event.kind(), EventKind::Deposit);
    }

    #[test]
    fn test_decode_value_set() {
        let log = rpc_log(&IVault::ValueSet { newValue: U256::from(42u64) });
        let event = EventKind::ValueSet.decode(&log).unwrap();
        assert_eq!(event, ContractEvent::ValueSet(ValueSetEvent { new_value: "42".into() }));
    }

    #[test]
    fn test_decode_wrong_kind_fails() {
        let log = rpc_log(&IVault::ValueSet { newValue: U256::from(1u64) });
        assert!(EventKind::Withdrawal.decode(&log).is_err());
    }
}
