//! `RpcCallExecutor` against a scripted transport.

use std::sync::Mutex;
use std::sync::Arc;

use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use chaincall_batch::MulticallClient;
use chaincall_core::{
    AggregateResult, BlockTag, Call, CallExecutor, CallOptions, ExecuteError, MulticallError,
};
use chaincall_evm::{erc20, multicall3};
use chaincall_rpc::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcCallExecutor, RpcTransport, TransportError,
};
use serde_json::{json, Value};

enum Reply {
    /// Answer every sub-call with its index as a uint256.
    Echo,
    /// Answer with one fewer result than requested.
    Short,
    Raw(Value),
    NodeError(i64, &'static str),
    Down,
}

struct ScriptedNode {
    reply: Reply,
    seen: Mutex<Vec<JsonRpcRequest>>,
}

impl ScriptedNode {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn answer(&self, req: &JsonRpcRequest, short: bool) -> Value {
        let data = req.params[0]["data"].as_str().unwrap();
        let calldata = hex::decode(data.trim_start_matches("0x")).unwrap();
        let calls = multicall3::decode_aggregate_calls(&calldata).unwrap();
        let n = if short { calls.len() - 1 } else { calls.len() };
        let result = AggregateResult {
            block_number: 69_455,
            return_data: (0..n)
                .map(|i| Bytes::from(DynSolValue::Uint(U256::from(i), 256).abi_encode()))
                .collect(),
        };
        json!(format!(
            "0x{}",
            hex::encode(multicall3::encode_aggregate_result(&result))
        ))
    }
}

#[async_trait]
impl RpcTransport for ScriptedNode {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.seen.lock().unwrap().push(req.clone());
        match &self.reply {
            Reply::Echo => Ok(JsonRpcResponse::success(req.id, self.answer(&req, false))),
            Reply::Short => Ok(JsonRpcResponse::success(req.id, self.answer(&req, true))),
            Reply::Raw(v) => Ok(JsonRpcResponse::success(req.id, v.clone())),
            Reply::NodeError(code, msg) => Ok(JsonRpcResponse::failure(
                req.id,
                JsonRpcError {
                    code: *code,
                    message: (*msg).into(),
                    data: None,
                },
            )),
            Reply::Down => Err(TransportError::Http("connection refused".into())),
        }
    }

    fn url(&self) -> &str {
        "mock://node"
    }
}

fn calls(n: u8) -> Vec<Call> {
    (0..n)
        .map(|i| Call {
            target: Address::repeat_byte(0xEE),
            call_data: Bytes::from(vec![i; 4]),
        })
        .collect()
}

#[tokio::test]
async fn aggregate_round_trips_through_eth_call() {
    let node = ScriptedNode::new(Reply::Echo);
    let executor = RpcCallExecutor::new(node.clone());
    let options = CallOptions {
        block: BlockTag::Number(100),
        from: None,
    };

    let result = executor
        .aggregate(chaincall_core::DEFAULT_MULTICALL_ADDRESS, &options, calls(3))
        .await
        .unwrap();

    assert_eq!(result.block_number, 69_455);
    assert_eq!(result.return_data.len(), 3);

    let seen = node.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "eth_call");
    assert_eq!(seen[0].params[1], "0x64");
    assert!(seen[0].params[0]["data"]
        .as_str()
        .unwrap()
        .starts_with("0x252dba42"));
}

#[tokio::test]
async fn request_ids_increase() {
    let node = ScriptedNode::new(Reply::Echo);
    let executor = RpcCallExecutor::new(node.clone());
    for _ in 0..2 {
        executor
            .aggregate(Address::repeat_byte(1), &CallOptions::default(), calls(1))
            .await
            .unwrap();
    }
    let ids: Vec<u64> = node.seen.lock().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn wrong_result_count_is_malformed() {
    let executor = RpcCallExecutor::new(ScriptedNode::new(Reply::Short));
    let err = executor
        .aggregate(Address::repeat_byte(1), &CallOptions::default(), calls(2))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::MalformedResponse { .. }));
}

#[tokio::test]
async fn undecodable_result_is_malformed() {
    let executor = RpcCallExecutor::new(ScriptedNode::new(Reply::Raw(json!("0xdeadbeef"))));
    let err = executor
        .aggregate(Address::repeat_byte(1), &CallOptions::default(), calls(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::MalformedResponse { .. }));
}

#[tokio::test]
async fn non_string_result_is_malformed() {
    let executor = RpcCallExecutor::new(ScriptedNode::new(Reply::Raw(json!(42))));
    let err = executor
        .aggregate(Address::repeat_byte(1), &CallOptions::default(), calls(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::MalformedResponse { .. }));
}

#[tokio::test]
async fn node_revert_is_an_rpc_error() {
    let executor =
        RpcCallExecutor::new(ScriptedNode::new(Reply::NodeError(3, "execution reverted")));
    let err = executor
        .aggregate(Address::repeat_byte(1), &CallOptions::default(), calls(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::Rpc { code: 3, .. }));
}

#[tokio::test]
async fn transport_failure_surfaces_through_the_engine() {
    let client = MulticallClient::new(Arc::new(RpcCallExecutor::new(ScriptedNode::new(
        Reply::Down,
    ))));
    let err = erc20::balance_of(
        &client,
        &[Address::repeat_byte(1)],
        Address::repeat_byte(0xEE),
        &CallOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err.root(),
        MulticallError::Batch {
            source: ExecuteError::Transport(_),
            ..
        }
    ));
}

#[tokio::test]
async fn balances_through_the_full_stack() {
    let node = ScriptedNode::new(Reply::Echo);
    let client = MulticallClient::new(Arc::new(RpcCallExecutor::new(node.clone())));
    let holders: Vec<Address> = (1..=3).map(Address::repeat_byte).collect();

    let balances = erc20::balance_of(
        &client,
        &holders,
        Address::repeat_byte(0xEE),
        &CallOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(balances, vec![U256::ZERO, U256::from(1), U256::from(2)]);
    assert_eq!(node.seen.lock().unwrap().len(), 1);
}
