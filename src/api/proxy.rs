// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Raw JSON-RPC pass-through for EVM routes.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RpcProxyRequest {
    pub chain: Option<String>,
    pub network: Option<String>,
    pub method: Option<String>,
    /// Positional JSON-RPC parameters; defaults to an empty array.
    #[schema(value_type = Option<Vec<Object>>)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RpcProxyResponse {
    pub success: bool,
    /// Raw result exactly as the upstream node returned it.
    #[schema(value_type = Object)]
    pub result: Value,
}

/// Forward an arbitrary JSON-RPC method to the route's EVM provider.
#[utoipa::path(
    post,
    path = "/api/rpc-proxy",
    tag = "Proxy",
    request_body = RpcProxyRequest,
    responses(
        (status = 200, description = "Raw RPC result", body = RpcProxyResponse),
        (status = 400, description = "Missing parameters or unsupported chain/network"),
        (status = 500, description = "Upstream node reported an RPC error"),
        (status = 503, description = "Every upstream endpoint failed")
    )
)]
pub async fn rpc_proxy(
    State(state): State<AppState>,
    Json(request): Json<RpcProxyRequest>,
) -> Result<Json<RpcProxyResponse>, ApiError> {
    let (Some(chain), Some(network)) = (request.chain, request.network) else {
        return Err(ApiError::bad_request("Missing chain or network parameter"));
    };
    let Some(method) = request.method.filter(|m| !m.is_empty()) else {
        return Err(ApiError::bad_request("Missing method parameter"));
    };
    let params = request.params.unwrap_or_else(|| Value::Array(Vec::new()));

    let result = state.gateway.proxy(&chain, &network, &method, params).await?;

    Ok(Json(RpcProxyResponse {
        success: true,
        result,
    }))
}
