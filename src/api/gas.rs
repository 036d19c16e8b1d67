// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gas estimates for plain native transfers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{chain::GasEstimate, error::ApiError, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct GasEstimateRequest {
    pub chain: Option<String>,
    pub network: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GasEstimateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub estimate: GasEstimate,
}

/// Gas estimate for a standard transfer on the given route.
///
/// Solana answers with a fixed synthetic estimate and no upstream call.
#[utoipa::path(
    post,
    path = "/api/gas-estimate",
    tag = "Gas",
    request_body = GasEstimateRequest,
    responses(
        (status = 200, description = "Gas estimate", body = GasEstimateResponse),
        (status = 400, description = "Unsupported chain/network"),
        (status = 503, description = "Every upstream endpoint failed")
    )
)]
pub async fn estimate_gas(
    State(state): State<AppState>,
    Json(request): Json<GasEstimateRequest>,
) -> Result<Json<GasEstimateResponse>, ApiError> {
    let chain = request.chain.unwrap_or_default();
    let network = request.network.unwrap_or_default();

    let estimate = state.gateway.gas_estimate(&chain, &network).await?;

    Ok(Json(GasEstimateResponse {
        success: true,
        estimate,
    }))
}
