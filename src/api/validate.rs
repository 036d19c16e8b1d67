// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction pre-validation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{chain::TransferCheck, error::ApiError, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateTransactionRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Transfer amount in display units; strings and bare numbers are both
    /// accepted on the wire.
    #[schema(value_type = Option<String>)]
    pub amount: Option<Value>,
    pub chain: Option<String>,
    pub network: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateTransactionResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Pre-validate a transfer without sending anything.
///
/// Expected failures (bad address, bad amount, unsupported route, thin
/// balance) come back as 200 with `valid: false`; only an upstream outage
/// is a non-2xx answer.
#[utoipa::path(
    post,
    path = "/api/validate-transaction",
    tag = "Transactions",
    request_body = ValidateTransactionRequest,
    responses(
        (status = 200, description = "Validation outcome", body = ValidateTransactionResponse),
        (status = 503, description = "Every upstream endpoint failed")
    )
)]
pub async fn validate_transaction(
    State(state): State<AppState>,
    Json(request): Json<ValidateTransactionRequest>,
) -> Result<Json<ValidateTransactionResponse>, ApiError> {
    let amount = match &request.amount {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let check = state
        .gateway
        .validate_transfer(
            request.from.as_deref().unwrap_or(""),
            request.to.as_deref().unwrap_or(""),
            &amount,
            request.chain.as_deref().unwrap_or(""),
            request.network.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(Json(match check {
        TransferCheck::Approved { balance } => ValidateTransactionResponse {
            valid: true,
            balance: Some(balance),
            error: None,
        },
        TransferCheck::Rejected { reason } => ValidateTransactionResponse {
            valid: false,
            balance: None,
            error: Some(reason.to_string()),
        },
    }))
}
