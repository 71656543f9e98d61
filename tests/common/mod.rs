//! Shared utilities for integration testing: an in-process JSON-RPC node.

#![allow(dead_code)]

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{hex, Address, B256, U256};
use alloy::sol_types::{SolCall, SolEvent, SolValue};
use axum::{body::Body, extract::State, http::Request, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

use contract_gateway::blockchain::contract::IVault;
use contract_gateway::config::{BlockchainConfig, ServerConfig};
use contract_gateway::{ContractGateway, HttpServer};

// Anvil's first account; publicly known, never holds real funds.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_SIGNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const TEST_CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

pub const ACCOUNT_BALANCE_WEI: u128 = 1_500_000_000_000_000_000;
pub const STORED_VALUE: u64 = 42;
pub const REVERT_MESSAGE: &str = "execution reverted: Pausable: paused";

const GAS_PRICE: &str = "0x3b9aca00";

/// Mock node state.
///
/// The contract starts paused: gas estimation fails with [`REVERT_MESSAGE`]
/// for everything except `setPaused`. Mined `setValue` and `setPaused`
/// transactions update the state later reads see. A single Deposit log is
/// delivered on the first matching `eth_getLogs`.
pub struct MockNode {
    pub contract: Address,
    pub depositor: Address,
    pub deposit_wei: U256,
    block: AtomicU64,
    deposit_delivered: AtomicBool,
    pub eth_calls: AtomicU64,
    paused: AtomicBool,
    stored_value: Mutex<U256>,
    /// Mined transactions and their block.
    mined: Mutex<Vec<(B256, u64)>>,
    revert_receipts: AtomicBool,
    nonce: AtomicU64,
    delay: Mutex<Duration>,
}

impl MockNode {
    /// Report every later transaction as reverted.
    pub fn revert_transactions(&self) {
        self.revert_receipts.store(true, Ordering::SeqCst);
    }

    /// Hold every response for `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    fn answer(&self, call: &Value) -> Value {
        let id = call.get("id").cloned().unwrap_or(Value::Null);
        let method = call.get("method").and_then(Value::as_str).unwrap_or_default();
        let params = call.get("params").cloned().unwrap_or(Value::Null);

        let result = match method {
            "eth_call" => self.eth_call(&params[0]),
            "eth_chainId" => Ok(json!("0x7a69")),
            "eth_blockNumber" => {
                let block = self.block.fetch_add(1, Ordering::SeqCst);
                Ok(json!(format!("0x{:x}", block)))
            }
            "eth_getLogs" => Ok(self.logs(&params[0])),
            "eth_getTransactionCount" => {
                Ok(json!(format!("0x{:x}", self.nonce.load(Ordering::SeqCst))))
            }
            "eth_gasPrice" | "eth_maxPriorityFeePerGas" => Ok(json!(GAS_PRICE)),
            "eth_feeHistory" => Ok(self.fee_history()),
            "eth_estimateGas" => self.estimate_gas(&params[0]),
            "eth_sendRawTransaction" => self.send_raw_transaction(&params[0]),
            "eth_getTransactionReceipt" => Ok(self.receipt(&params[0])),
            "eth_getBlockByNumber" => Ok(self.block_json()),
            "eth_newBlockFilter" => Ok(json!("0x1")),
            "eth_getFilterChanges" => Ok(json!([])),
            other => Err(format!("method {} not supported", other)),
        };

        match result {
            Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
            Err(message) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": -32000, "message": message}
            }),
        }
    }

    fn eth_call(&self, tx: &Value) -> Result<Value, String> {
        self.eth_calls.fetch_add(1, Ordering::SeqCst);
        let input = call_input(tx)?;
        let selector = selector(&input).ok_or("execution reverted")?;

        let encoded = if selector == IVault::getBalanceCall::SELECTOR {
            U256::from(ACCOUNT_BALANCE_WEI).abi_encode()
        } else if selector == IVault::getContractBalanceCall::SELECTOR {
            U256::ZERO.abi_encode()
        } else if selector == IVault::valueCall::SELECTOR {
            self.stored_value.lock().unwrap().abi_encode()
        } else if selector == IVault::pausedCall::SELECTOR {
            self.paused.load(Ordering::SeqCst).abi_encode()
        } else if selector == IVault::ownerCall::SELECTOR {
            self.depositor.abi_encode()
        } else {
            return Err("execution reverted".into());
        };
        Ok(json!(hex::encode_prefixed(encoded)))
    }

    /// Only `setPaused` gets past a paused contract.
    fn admits(&self, input: &[u8]) -> bool {
        !self.paused.load(Ordering::SeqCst)
            || selector(input) == Some(IVault::setPausedCall::SELECTOR)
    }

    fn estimate_gas(&self, tx: &Value) -> Result<Value, String> {
        let input = call_input(tx).unwrap_or_default();
        if !self.admits(&input) {
            return Err(REVERT_MESSAGE.to_string());
        }
        Ok(json!("0x186a0"))
    }

    fn send_raw_transaction(&self, raw: &Value) -> Result<Value, String> {
        let raw = hex::decode(raw.as_str().ok_or("missing raw transaction")?)
            .map_err(|e| e.to_string())?;
        let envelope = TxEnvelope::decode_2718(&mut raw.as_slice()).map_err(|e| e.to_string())?;
        let hash = *envelope.tx_hash();
        let input = envelope.input().to_vec();
        if !self.admits(&input) {
            return Err(REVERT_MESSAGE.to_string());
        }

        if !self.revert_receipts.load(Ordering::SeqCst) {
            self.apply(&input);
        }
        self.nonce.fetch_add(1, Ordering::SeqCst);
        let block = self.block.load(Ordering::SeqCst);
        self.mined.lock().unwrap().push((hash, block));
        Ok(json!(hash.to_string()))
    }

    fn apply(&self, input: &[u8]) {
        let selector = selector(input);
        if selector == Some(IVault::setValueCall::SELECTOR) {
            let call = IVault::setValueCall::abi_decode(input).unwrap();
            *self.stored_value.lock().unwrap() = call.newValue;
        } else if selector == Some(IVault::setPausedCall::SELECTOR) {
            let call = IVault::setPausedCall::abi_decode(input).unwrap();
            self.paused.store(call.paused, Ordering::SeqCst);
        }
    }

    fn receipt(&self, hash: &Value) -> Value {
        let hash: B256 = match hash.as_str().and_then(|h| h.parse().ok()) {
            Some(hash) => hash,
            None => return Value::Null,
        };
        let mined = self.mined.lock().unwrap();
        let Some(&(_, block)) = mined.iter().find(|(h, _)| *h == hash) else {
            return Value::Null;
        };
        let status = if self.revert_receipts.load(Ordering::SeqCst) { "0x0" } else { "0x1" };

        json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x5208",
            "logs": [],
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionHash": hash.to_string(),
            "transactionIndex": "0x0",
            "blockHash": format!("0x{}", "ab".repeat(32)),
            "blockNumber": format!("0x{:x}", block),
            "gasUsed": "0x5208",
            "effectiveGasPrice": GAS_PRICE,
            "from": TEST_SIGNER,
            "to": self.contract.to_string(),
            "contractAddress": null
        })
    }

    fn fee_history(&self) -> Value {
        let block = self.block.load(Ordering::SeqCst);
        json!({
            "oldestBlock": format!("0x{:x}", block.saturating_sub(1)),
            "baseFeePerGas": [GAS_PRICE, GAS_PRICE],
            "gasUsedRatio": [0.5],
            "reward": [[GAS_PRICE]]
        })
    }

    fn block_json(&self) -> Value {
        let zero_hash = format!("0x{}", "00".repeat(32));
        json!({
            "hash": format!("0x{}", "ab".repeat(32)),
            "parentHash": zero_hash,
            "sha3Uncles": zero_hash,
            "miner": format!("{}", Address::ZERO),
            "stateRoot": zero_hash,
            "transactionsRoot": zero_hash,
            "receiptsRoot": zero_hash,
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "difficulty": "0x0",
            "number": format!("0x{:x}", self.block.load(Ordering::SeqCst)),
            "gasLimit": "0x1c9c380",
            "gasUsed": "0x0",
            "timestamp": "0x6553f100",
            "extraData": "0x",
            "mixHash": zero_hash,
            "nonce": "0x0000000000000000",
            "baseFeePerGas": GAS_PRICE,
            "uncles": [],
            "transactions": [],
            "size": "0x200"
        })
    }

    fn logs(&self, filter: &Value) -> Value {
        let deposit_topic = IVault::Deposit::SIGNATURE_HASH.to_string();
        let wants_deposit = filter
            .get("topics")
            .map(|t| t.to_string().to_lowercase().contains(&deposit_topic.to_lowercase()))
            .unwrap_or(false);

        if !wants_deposit || self.deposit_delivered.swap(true, Ordering::SeqCst) {
            return json!([]);
        }

        let block = self.block.load(Ordering::SeqCst);
        json!([{
            "address": self.contract.to_string(),
            "topics": [deposit_topic, self.depositor.into_word().to_string()],
            "data": hex::encode_prefixed(self.deposit_wei.abi_encode()),
            "blockNumber": format!("0x{:x}", block),
            "blockHash": format!("0x{}", "ab".repeat(32)),
            "transactionHash": format!("0x{}", "cd".repeat(32)),
            "transactionIndex": "0x0",
            "logIndex": "0x0",
            "removed": false
        }])
    }
}

fn call_input(tx: &Value) -> Result<Vec<u8>, String> {
    let input = tx
        .get("input")
        .or_else(|| tx.get("data"))
        .and_then(Value::as_str)
        .ok_or("missing call input")?;
    hex::decode(input).map_err(|e| e.to_string())
}

fn selector(input: &[u8]) -> Option<[u8; 4]> {
    input.get(..4)?.try_into().ok()
}

async fn rpc(State(node): State<Arc<MockNode>>, Json(body): Json<Value>) -> Json<Value> {
    let delay = *node.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    match body {
        Value::Array(calls) => Json(Value::Array(calls.iter().map(|c| node.answer(c)).collect())),
        call => Json(node.answer(&call)),
    }
}

/// Start a mock node on an ephemeral port; returns its URL and state.
pub async fn start_mock_node() -> (String, Arc<MockNode>) {
    let node = Arc::new(MockNode {
        contract: TEST_CONTRACT.parse().unwrap(),
        depositor: Address::repeat_byte(0x42),
        deposit_wei: U256::from(10_000_000_000_000_000u64),
        block: AtomicU64::new(0x10),
        deposit_delivered: AtomicBool::new(false),
        eth_calls: AtomicU64::new(0),
        paused: AtomicBool::new(true),
        stored_value: Mutex::new(U256::from(STORED_VALUE)),
        mined: Mutex::new(Vec::new()),
        revert_receipts: AtomicBool::new(false),
        nonce: AtomicU64::new(0),
        delay: Mutex::new(Duration::ZERO),
    });

    let app = Router::new().route("/", post(rpc)).with_state(node.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}", addr), node)
}

pub fn blockchain_config(rpc_url: &str) -> BlockchainConfig {
    BlockchainConfig {
        rpc_url: rpc_url.to_string(),
        contract_address: Some(TEST_CONTRACT.to_string()),
        event_poll_interval_ms: 50,
        ..BlockchainConfig::default()
    }
}

pub fn gateway(rpc_url: &str) -> ContractGateway {
    let wallet = contract_gateway::blockchain::Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
    ContractGateway::new(&blockchain_config(rpc_url), wallet).unwrap()
}

pub fn app(rpc_url: &str) -> Router {
    app_with(rpc_url, ServerConfig::default())
}

pub fn app_with(rpc_url: &str, config: ServerConfig) -> Router {
    HttpServer::new(config, Arc::new(gateway(rpc_url))).router()
}

/// Drive one request through the router in-process.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (u16, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Extract the error message of a 500 response.
pub fn message(body: &Value) -> &str {
    body.get("message").and_then(Value::as_str).unwrap_or_default()
}
