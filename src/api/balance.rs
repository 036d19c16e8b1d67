// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Native balance queries.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct BalanceRequest {
    pub address: Option<String>,
    pub chain: Option<String>,
    pub network: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub success: bool,
    pub chain: String,
    pub address: String,
    /// Native balance as an exact decimal string in display units.
    pub balance: String,
}

/// Native balance for an address on a supported (chain, network) pair.
#[utoipa::path(
    post,
    path = "/api/balance",
    tag = "Balances",
    request_body = BalanceRequest,
    responses(
        (status = 200, description = "Balance retrieved", body = BalanceResponse),
        (status = 400, description = "Missing parameters, invalid address, or unsupported chain/network"),
        (status = 503, description = "Every upstream endpoint failed")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Json(request): Json<BalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let (Some(address), Some(chain), Some(network)) =
        (request.address, request.chain, request.network)
    else {
        return Err(ApiError::bad_request("Missing required parameters"));
    };

    let result = state
        .gateway
        .native_balance(&chain, &network, &address)
        .await?;

    Ok(Json(BalanceResponse {
        success: true,
        chain: result.chain,
        address: result.address,
        balance: result.balance,
    }))
}
