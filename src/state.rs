// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{sync::Arc, time::Instant};

use crate::{
    api::rate_limit::RateLimits,
    chain::{ChainRegistry, Gateway, Invoker},
    config::Config,
    prices::PriceOracle,
};

/// Shared application state. Everything here is immutable after startup
/// except the rate-limiter cells, so handlers never contend on a lock.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub oracle: Arc<PriceOracle>,
    pub limits: Arc<RateLimits>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .build()
            .expect("failed to build HTTP client");
        let registry = Arc::new(ChainRegistry::from_config(config));

        Self {
            gateway: Arc::new(Gateway::new(
                registry,
                Invoker::new(http.clone(), config.rpc_timeout),
            )),
            oracle: Arc::new(PriceOracle::new(
                http,
                config.coingecko_api_key.clone(),
                config.rpc_timeout,
            )),
            limits: Arc::new(RateLimits::new()),
            started_at: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
