// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Single-shot upstream RPC calls.
//!
//! One remote call per invocation, bounded by the per-call timeout. Nothing
//! here retries: endpoint failover is the gateway's job, and it needs to see
//! each candidate's failure individually.

use std::{borrow::Cow, future::Future, time::Duration};

use alloy::{
    primitives::{Address, U256},
    providers::{Provider, ProviderBuilder},
    transports::{RpcError, TransportErrorKind},
};
use serde_json::{json, Value};

/// Failure of one upstream call against one endpoint.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("contract call failed: {0}")]
    Contract(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl InvokeError {
    /// An error object reported by a responsive node, as opposed to a
    /// transport-level failure that another endpoint might not share.
    pub fn is_rpc_level(&self) -> bool {
        matches!(self, Self::Rpc { .. })
    }
}

/// Issues upstream calls. EVM chains go through an alloy HTTP provider;
/// Solana balance queries are a fixed-method JSON-RPC POST.
#[derive(Clone)]
pub struct Invoker {
    http: reqwest::Client,
    timeout: Duration,
}

impl Invoker {
    pub fn new(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build an alloy provider for one EVM endpoint.
    pub fn evm_provider(endpoint: &str) -> Result<impl Provider + Clone, InvokeError> {
        let url: url::Url = endpoint
            .parse()
            .map_err(|e: url::ParseError| InvokeError::InvalidEndpoint(e.to_string()))?;
        Ok(ProviderBuilder::new().connect_http(url))
    }

    /// Forward an arbitrary JSON-RPC method to an EVM endpoint.
    pub async fn evm_request(
        &self,
        endpoint: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, InvokeError> {
        let provider = Self::evm_provider(endpoint)?;
        let method: Cow<'static, str> = Cow::Owned(method.to_string());
        self.bounded(async move { provider.raw_request(method, params).await })
            .await
    }

    /// Native balance in wei.
    pub async fn evm_native_balance(
        &self,
        endpoint: &str,
        address: Address,
    ) -> Result<U256, InvokeError> {
        let provider = Self::evm_provider(endpoint)?;
        self.bounded(async move { provider.get_balance(address).await })
            .await
    }

    /// Current gas price in wei.
    pub async fn evm_gas_price(&self, endpoint: &str) -> Result<u128, InvokeError> {
        let provider = Self::evm_provider(endpoint)?;
        self.bounded(async move { provider.get_gas_price().await })
            .await
    }

    /// Solana balance query: `getBalance`, lamports out.
    pub async fn solana_balance(&self, endpoint: &str, address: &str) -> Result<u64, InvokeError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getBalance",
            "params": [address],
        });

        let response = self
            .http
            .post(endpoint)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InvokeError::Timeout(self.timeout)
                } else {
                    InvokeError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InvokeError::Transport(format!("HTTP {status}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| InvokeError::Malformed(e.to_string()))?;
        parse_solana_balance(&payload)
    }

    /// Run one upstream call under the per-call timeout.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, RpcError<TransportErrorKind>>>,
    ) -> Result<T, InvokeError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(classify_rpc_error(error)),
            Err(_) => Err(InvokeError::Timeout(self.timeout)),
        }
    }
}

fn classify_rpc_error(error: RpcError<TransportErrorKind>) -> InvokeError {
    match error {
        RpcError::ErrorResp(payload) => InvokeError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        RpcError::DeserError { err, .. } => InvokeError::Malformed(err.to_string()),
        other => InvokeError::Transport(other.to_string()),
    }
}

/// Extract lamports from a `getBalance` payload, surfacing RPC-level error
/// objects distinctly from malformed bodies.
fn parse_solana_balance(payload: &Value) -> Result<u64, InvokeError> {
    if let Some(error) = payload.get("error") {
        return Err(InvokeError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(-32000),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error")
                .to_string(),
        });
    }

    payload
        .pointer("/result/value")
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            InvokeError::Malformed("missing result.value in getBalance response".to_string())
        })
}
