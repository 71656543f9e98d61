//! Contract gateway: the single point of contact with the chain.
//!
//! # Responsibilities
//! - Hold the RPC provider, signing key and contract handle
//! - Map each high-level operation to one contract call or one transaction
//! - Convert amounts to and from base units at the boundary
//! - Wait for inclusion before reporting a write as done
//!
//! No retries are performed; every failure is passed through with the
//! underlying message.

use alloy::network::{Ethereum, ReceiptResponse};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use std::future::Future;
use std::time::{Duration, Instant};

use crate::blockchain::contract::IVault;
use crate::blockchain::events::{self, ContractEvent, EventKind, Subscription};
use crate::blockchain::types::{
    BlockchainConfig, BlockchainError, BlockchainResult, TransactionOutcome,
};
use crate::blockchain::units;
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Environment variable name for the deployed contract address.
pub const CONTRACT_ADDRESS_ENV_VAR: &str = "CONTRACT_ADDRESS";

/// Typed access to the deployed vault contract.
///
/// Read-only after construction, so one instance is shared by all requests.
#[derive(Clone)]
pub struct ContractGateway {
    provider: DynProvider,
    contract: IVault::IVaultInstance<DynProvider>,
    contract_address: Address,
    signer_address: Address,
    rpc_url: String,
    confirmations: u64,
    receipt_timeout: Option<Duration>,
    poll_interval: Duration,
}

impl ContractGateway {
    /// Create a gateway for the configured contract.
    ///
    /// Performs no network I/O: an unreachable RPC endpoint surfaces on the
    /// first call, not here.
    ///
    /// # Errors
    /// - `MissingConfig` if no contract address is configured
    /// - `InvalidAddress` if the contract address does not parse
    /// - `Rpc` if the RPC URL does not parse
    pub fn new(config: &BlockchainConfig, wallet: Wallet) -> BlockchainResult<Self> {
        let contract_address = match config.contract_address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => units::parse_address(address)?,
            _ => return Err(BlockchainError::MissingConfig(CONTRACT_ADDRESS_ENV_VAR)),
        };

        let rpc_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.to_ethereum_wallet())
            .connect_http(rpc_url)
            .erased();
        let contract = IVault::new(contract_address, provider.clone());

        tracing::info!(
            rpc_url = %config.rpc_url,
            contract = %contract_address,
            signer = %wallet.address(),
            "Contract gateway initialized"
        );

        Ok(Self {
            provider,
            contract,
            contract_address,
            signer_address: wallet.address(),
            rpc_url: config.rpc_url.clone(),
            confirmations: config.confirmation_blocks,
            receipt_timeout: config.receipt_timeout_secs.map(Duration::from_secs),
            poll_interval: Duration::from_millis(config.event_poll_interval_ms),
        })
    }

    /// Deposited balance of `address`, in ether.
    pub async fn get_balance(&self, address: &str) -> BlockchainResult<String> {
        let account = units::parse_address(address)?;
        observed("getBalance", async {
            let balance = self.contract.getBalance(account).call().await?;
            Ok(units::format_amount(balance))
        })
        .await
    }

    /// Ether held by the contract.
    pub async fn get_contract_balance(&self) -> BlockchainResult<String> {
        observed("getContractBalance", async {
            let balance = self.contract.getContractBalance().call().await?;
            Ok(units::format_amount(balance))
        })
        .await
    }

    /// Stored value as a decimal string.
    pub async fn get_value(&self) -> BlockchainResult<String> {
        observed("value", async {
            let value = self.contract.value().call().await?;
            Ok(value.to_string())
        })
        .await
    }

    pub async fn is_paused(&self) -> BlockchainResult<bool> {
        observed("paused", async { Ok(self.contract.paused().call().await?) }).await
    }

    /// Contract owner, checksummed.
    pub async fn get_owner(&self) -> BlockchainResult<String> {
        observed("owner", async {
            let owner = self.contract.owner().call().await?;
            Ok(owner.to_string())
        })
        .await
    }

    /// Send `amount` ether to the contract and wait for inclusion.
    pub async fn deposit(&self, amount: &str) -> BlockchainResult<TransactionOutcome> {
        let wei = units::parse_amount(amount)?;
        observed("deposit", async {
            let pending = self.contract.deposit().value(wei).send().await?;
            self.confirm("deposit", pending).await
        })
        .await
    }

    /// Withdraw `amount` ether from the signer's deposit and wait for inclusion.
    pub async fn withdraw(&self, amount: &str) -> BlockchainResult<TransactionOutcome> {
        let wei = units::parse_amount(amount)?;
        observed("withdraw", async {
            let pending = self.contract.withdraw(wei).send().await?;
            self.confirm("withdraw", pending).await
        })
        .await
    }

    pub async fn set_value(&self, new_value: U256) -> BlockchainResult<TransactionOutcome> {
        observed("setValue", async {
            let pending = self.contract.setValue(new_value).send().await?;
            self.confirm("setValue", pending).await
        })
        .await
    }

    pub async fn set_paused(&self, paused: bool) -> BlockchainResult<TransactionOutcome> {
        observed("setPaused", async {
            let pending = self.contract.setPaused(paused).send().await?;
            self.confirm("setPaused", pending).await
        })
        .await
    }

    /// Register a persistent listener for `kind`.
    ///
    /// The callback runs on a background task once per matching log, starting
    /// from the block current at registration. Requires a Tokio runtime.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(ContractEvent) + Send + Sync + 'static,
    {
        events::spawn_subscription(
            self.provider.clone(),
            self.contract_address,
            kind,
            self.poll_interval,
            callback,
        )
    }

    pub fn on_deposit<F>(&self, callback: F) -> Subscription
    where
        F: Fn(events::DepositEvent) + Send + Sync + 'static,
    {
        self.subscribe(EventKind::Deposit, move |event| {
            if let ContractEvent::Deposit(deposit) = event {
                callback(deposit);
            }
        })
    }

    pub fn on_withdrawal<F>(&self, callback: F) -> Subscription
    where
        F: Fn(events::WithdrawalEvent) + Send + Sync + 'static,
    {
        self.subscribe(EventKind::Withdrawal, move |event| {
            if let ContractEvent::Withdrawal(withdrawal) = event {
                callback(withdrawal);
            }
        })
    }

    pub fn on_value_set<F>(&self, callback: F) -> Subscription
    where
        F: Fn(events::ValueSetEvent) + Send + Sync + 'static,
    {
        self.subscribe(EventKind::ValueSet, move |event| {
            if let ContractEvent::ValueSet(value_set) = event {
                callback(value_set);
            }
        })
    }

    /// Latest block number seen by the RPC endpoint.
    pub async fn block_number(&self) -> BlockchainResult<u64> {
        observed("blockNumber", async { Ok(self.provider.get_block_number().await?) }).await
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn signer_address(&self) -> Address {
        self.signer_address
    }

    /// Wait for the receipt and map it to an outcome.
    async fn confirm(
        &self,
        operation: &'static str,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> BlockchainResult<TransactionOutcome> {
        let tx_hash = *pending.tx_hash();
        tracing::info!(operation, tx_hash = %tx_hash, "Transaction submitted");

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .with_timeout(self.receipt_timeout)
            .get_receipt()
            .await?;

        if !receipt.status() {
            tracing::warn!(operation, tx_hash = %tx_hash, "Transaction reverted");
            return Err(BlockchainError::Reverted(tx_hash.to_string()));
        }

        let block_number = receipt.block_number().ok_or_else(|| {
            BlockchainError::Rpc(format!("receipt for {} has no block number", tx_hash))
        })?;

        tracing::info!(
            operation,
            tx_hash = %receipt.transaction_hash(),
            block_number,
            "Transaction confirmed"
        );

        Ok(TransactionOutcome {
            success: true,
            transaction_hash: receipt.transaction_hash().to_string(),
            block_number,
        })
    }
}

impl std::fmt::Debug for ContractGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractGateway")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("signer_address", &self.signer_address)
            .field("confirmations", &self.confirmations)
            .finish()
    }
}

/// Run one RPC-backed operation, recording its latency and outcome.
async fn observed<T, F>(operation: &'static str, fut: F) -> BlockchainResult<T>
where
    F: Future<Output = BlockchainResult<T>>,
{
    let start = Instant::now();
    let result = fut.await;
    match &result {
        Ok(_) => tracing::debug!(operation, "RPC call succeeded"),
        Err(e) => tracing::warn!(operation, error = %e, "RPC call failed"),
    }
    metrics::record_rpc_call(operation, result.is_ok(), start);
    result
}
