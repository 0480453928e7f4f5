//! A scripted in-memory transport for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::TransportError;
use crate::request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::transport::RpcTransport;

#[derive(Clone)]
enum Reply {
    Ok(Value),
    Rpc(JsonRpcError),
    Transport(String),
}

/// Answers each method from a queue of scripted replies. The last reply
/// set with [`ScriptedTransport::repeat`] is served forever.
#[derive(Default)]
pub struct ScriptedTransport {
    queued: Mutex<HashMap<String, VecDeque<Reply>>>,
    sticky: Mutex<HashMap<String, Reply>>,
    seen: Mutex<Vec<(String, Vec<Value>)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(self: Arc<Self>, method: &str, reply: Reply) -> Arc<Self> {
        self.queued
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn ok(self: Arc<Self>, method: &str, result: Value) -> Arc<Self> {
        self.push(method, Reply::Ok(result))
    }

    pub fn err(self: Arc<Self>, method: &str, code: i64, message: &str) -> Arc<Self> {
        self.err_with_data(method, code, message, Value::Null)
    }

    pub fn err_with_data(
        self: Arc<Self>,
        method: &str,
        code: i64,
        message: &str,
        data: Value,
    ) -> Arc<Self> {
        let data = if data.is_null() { None } else { Some(data) };
        self.push(
            method,
            Reply::Rpc(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
        )
    }

    pub fn fail(self: Arc<Self>, method: &str, reason: &str) -> Arc<Self> {
        self.push(method, Reply::Transport(reason.into()))
    }

    pub fn repeat(self: Arc<Self>, method: &str, result: Value) -> Arc<Self> {
        self.sticky
            .lock()
            .unwrap()
            .insert(method.to_string(), Reply::Ok(result));
        self
    }

    /// Number of requests seen for `method`.
    pub fn calls(&self, method: &str) -> usize {
        self.seen.lock().unwrap().iter().filter(|(m, _)| m == method).count()
    }

    /// Params of every request seen for `method`, in order.
    pub fn params(&self, method: &str) -> Vec<Vec<Value>> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.seen
            .lock()
            .unwrap()
            .push((req.method.clone(), req.params.clone()));

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&req.method)
            .and_then(VecDeque::pop_front);
        let reply = match queued {
            Some(r) => r,
            None => match self.sticky.lock().unwrap().get(&req.method) {
                Some(r) => r.clone(),
                None => Reply::Rpc(JsonRpcError {
                    code: -32601,
                    message: format!("the method {} does not exist", req.method),
                    data: None,
                }),
            },
        };

        match reply {
            Reply::Ok(result) => Ok(JsonRpcResponse {
                jsonrpc: "2.0".into(),
                id: req.id,
                result: Some(result),
                error: None,
            }),
            Reply::Rpc(error) => Ok(JsonRpcResponse {
                jsonrpc: "2.0".into(),
                id: req.id,
                result: None,
                error: Some(error),
            }),
            Reply::Transport(reason) => Err(TransportError::Http(reason)),
        }
    }

    fn url(&self) -> &str {
        "scripted://"
    }
}

