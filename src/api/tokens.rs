// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token-balance sweeps.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{chain::TokenBalanceEntry, error::ApiError, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenBalancesRequest {
    pub address: Option<String>,
    pub chain: Option<String>,
    pub network: Option<String>,
    /// Symbol to contract-address map; response entries keep this order.
    #[schema(value_type = Object)]
    pub tokens: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenBalancesResponse {
    pub success: bool,
    /// Only tokens with a strictly positive balance appear.
    pub tokens: Vec<TokenBalanceEntry>,
}

/// Balances for a caller-supplied set of ERC-20 tokens.
///
/// Only served on the MAINNET tier; other tiers answer with an empty list
/// and no upstream traffic. Tokens whose contract reads fail are skipped.
#[utoipa::path(
    post,
    path = "/api/token-balances",
    tag = "Tokens",
    request_body = TokenBalancesRequest,
    responses(
        (status = 200, description = "Positive token balances", body = TokenBalancesResponse),
        (status = 400, description = "Invalid address or unsupported chain")
    )
)]
pub async fn token_balances(
    State(state): State<AppState>,
    Json(request): Json<TokenBalancesRequest>,
) -> Result<Json<TokenBalancesResponse>, ApiError> {
    let tokens = request.tokens.unwrap_or_default();

    let entries = state
        .gateway
        .token_sweep(
            request.chain.as_deref().unwrap_or(""),
            request.network.as_deref().unwrap_or(""),
            request.address.as_deref().unwrap_or(""),
            &tokens,
        )
        .await?;

    Ok(Json(TokenBalancesResponse {
        success: true,
        tokens: entries,
    }))
}
