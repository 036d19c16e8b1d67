// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-client request throttling.
//!
//! Two keyed limiters: a broad budget across the whole `/api` surface and a
//! stricter one for the routes that fan out to upstream RPC providers.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    time::Duration,
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};

use crate::{error::ApiError, state::AppState};

type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// 100 requests per 15 minutes across `/api` (one cell replenished every 9 s).
const GENERAL_BURST: u32 = 100;
const GENERAL_REPLENISH: Duration = Duration::from_secs(9);

/// 30 requests per minute on RPC-backed routes.
const RPC_PER_MINUTE: u32 = 30;

/// Keyed limiters shared by every request.
pub struct RateLimits {
    general: IpRateLimiter,
    rpc: IpRateLimiter,
}

impl RateLimits {
    pub fn new() -> Self {
        let general = Quota::with_period(GENERAL_REPLENISH)
            .expect("replenish period is non-zero")
            .allow_burst(NonZeroU32::new(GENERAL_BURST).expect("burst is non-zero"));
        let rpc = Quota::per_minute(NonZeroU32::new(RPC_PER_MINUTE).expect("quota is non-zero"));

        Self {
            general: RateLimiter::keyed(general),
            rpc: RateLimiter::keyed(rpc),
        }
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self::new()
    }
}

/// Broad limit across the whole API surface.
pub async fn general_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.limits.general.check_key(&client_ip(&request)).is_err() {
        return ApiError::too_many_requests(
            "Too many requests from this IP, please try again later.",
        )
        .into_response();
    }
    next.run(request).await
}

/// Stricter limit for routes that reach upstream RPC providers.
pub async fn rpc_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.limits.rpc.check_key(&client_ip(&request)).is_err() {
        return ApiError::too_many_requests("RPC rate limit exceeded").into_response();
    }
    next.run(request).await
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_budget_allows_a_burst_then_throttles() {
        let limits = RateLimits::new();
        let ip: IpAddr = "203.0.113.7".parse().unwrap();

        for _ in 0..GENERAL_BURST {
            assert!(limits.general.check_key(&ip).is_ok());
        }
        assert!(limits.general.check_key(&ip).is_err());
    }

    #[test]
    fn rpc_budget_is_stricter() {
        let limits = RateLimits::new();
        let ip: IpAddr = "203.0.113.8".parse().unwrap();

        for _ in 0..RPC_PER_MINUTE {
            assert!(limits.rpc.check_key(&ip).is_ok());
        }
        assert!(limits.rpc.check_key(&ip).is_err());
    }

    #[test]
    fn budgets_are_tracked_per_client() {
        let limits = RateLimits::new();
        let first: IpAddr = "203.0.113.9".parse().unwrap();
        let second: IpAddr = "203.0.113.10".parse().unwrap();

        for _ in 0..RPC_PER_MINUTE {
            assert!(limits.rpc.check_key(&first).is_ok());
        }
        assert!(limits.rpc.check_key(&first).is_err());
        assert!(limits.rpc.check_key(&second).is_ok());
    }
}
