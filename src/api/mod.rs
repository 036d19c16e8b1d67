// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    chain::{GasEstimate, TokenBalanceEntry},
    error::ApiError,
    prices::PriceTable,
    state::AppState,
};

pub mod balance;
pub mod gas;
pub mod health;
pub mod prices;
pub mod proxy;
pub mod rate_limit;
pub mod tokens;
pub mod validate;

pub fn router(state: AppState) -> Router {
    // RPC-backed routes sit behind the stricter per-client budget.
    let rpc_routes = Router::new()
        .route("/balance", post(balance::get_balance))
        .route("/gas-estimate", post(gas::estimate_gas))
        .route("/token-balances", post(tokens::token_balances))
        .route("/rpc-proxy", post(proxy::rpc_proxy))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rpc_limit,
        ));

    let api_routes = Router::new()
        .route("/prices", get(prices::get_prices))
        .route("/validate-transaction", post(validate::validate_transaction))
        .merge(rpc_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::general_limit,
        ));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        prices::get_prices,
        balance::get_balance,
        gas::estimate_gas,
        validate::validate_transaction,
        tokens::token_balances,
        proxy::rpc_proxy
    ),
    components(
        schemas(
            health::HealthResponse,
            prices::PricesResponse,
            PriceTable,
            balance::BalanceRequest,
            balance::BalanceResponse,
            gas::GasEstimateRequest,
            gas::GasEstimateResponse,
            GasEstimate,
            validate::ValidateTransactionRequest,
            validate::ValidateTransactionResponse,
            tokens::TokenBalancesRequest,
            tokens::TokenBalancesResponse,
            TokenBalanceEntry,
            proxy::RpcProxyRequest,
            proxy::RpcProxyResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Prices", description = "Spot prices with static fallback"),
        (name = "Balances", description = "Native balance queries"),
        (name = "Gas", description = "Transfer gas estimates"),
        (name = "Transactions", description = "Transfer pre-validation"),
        (name = "Tokens", description = "ERC-20 balance sweeps"),
        (name = "Proxy", description = "Raw JSON-RPC pass-through")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_answers_without_side_effects() {
        let response = router(AppState::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn solana_gas_estimate_needs_no_upstream() {
        let response = router(AppState::default())
            .oneshot(post_json(
                "/api/gas-estimate",
                json!({ "chain": "SOLANA", "network": "MAINNET" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["gasPrice"], "0.000005");
        assert_eq!(body["gasLimit"], 1);
        assert_eq!(body["totalCost"], "0.000005");
        assert_eq!(body["currency"], "SOL");
    }

    #[tokio::test]
    async fn gas_estimate_rejects_unknown_routes() {
        let response = router(AppState::default())
            .oneshot(post_json(
                "/api/gas-estimate",
                json!({ "chain": "ETH", "network": "NOWHERE" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Unsupported chain/network");
    }

    #[tokio::test]
    async fn token_balances_on_a_test_tier_are_empty_without_calls() {
        let response = router(AppState::default())
            .oneshot(post_json(
                "/api/token-balances",
                json!({
                    "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                    "chain": "ETH",
                    "network": "SEPOLIA",
                    "tokens": { "USDC": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48" },
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["tokens"], json!([]));
    }

    #[tokio::test]
    async fn validation_reports_bad_addresses_as_a_domain_outcome() {
        let response = router(AppState::default())
            .oneshot(post_json(
                "/api/validate-transaction",
                json!({
                    "from": "0xnope",
                    "to": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                    "amount": "1",
                    "chain": "ETH",
                    "network": "MAINNET",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["error"], "Invalid address format");
    }

    #[tokio::test]
    async fn balance_requires_every_field() {
        let response = router(AppState::default())
            .oneshot(post_json("/api/balance", json!({ "chain": "ETH" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing required parameters");
    }

    #[tokio::test]
    async fn balance_rejects_malformed_addresses() {
        let response = router(AppState::default())
            .oneshot(post_json(
                "/api/balance",
                json!({ "address": "0x1234", "chain": "ETH", "network": "MAINNET" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid Ethereum address");
    }

    #[tokio::test]
    async fn proxy_requires_a_method() {
        let response = router(AppState::default())
            .oneshot(post_json(
                "/api/rpc-proxy",
                json!({ "chain": "ETH", "network": "MAINNET" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing method parameter");
    }

    #[tokio::test]
    async fn unknown_endpoints_return_a_json_404() {
        let response = router(AppState::default())
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Endpoint not found");
    }
}
