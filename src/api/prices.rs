// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{prices::PriceTable, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct PricesResponse {
    pub success: bool,
    pub prices: PriceTable,
    /// True when the static fallback table was served instead of live data.
    pub degraded: bool,
}

/// USD spot prices for the supported assets.
///
/// Always answers 200: oracle failures degrade to the static table.
#[utoipa::path(
    get,
    path = "/api/prices",
    tag = "Prices",
    responses(
        (status = 200, description = "Live or fallback prices", body = PricesResponse)
    )
)]
pub async fn get_prices(State(state): State<AppState>) -> Json<PricesResponse> {
    let (prices, degraded) = state.oracle.quote().await;
    Json(PricesResponse {
        success: true,
        prices,
        degraded,
    })
}
