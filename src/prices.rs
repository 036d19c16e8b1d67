// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Spot-price adapter.
//!
//! One best-effort oracle fetch per request with a static all-or-nothing
//! fallback table. A partial live response is never merged with fallback
//! values: mid-failure payloads are indistinguishable from partial ones, so
//! the snapshot is either fully live (with per-symbol defaults for gaps the
//! oracle itself reports) or fully static.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use utoipa::ToSchema;

const ORACLE_BASE_URL: &str = "https://api.coingecko.com";

/// Oracle identifiers for every quoted asset, in response order.
const ORACLE_IDS: &str =
    "ethereum,binancecoin,matic-network,avalanche-2,fantom,mantle,tether,usd-coin,solana";

/// USD spot prices for the supported assets. Display values only, so floats
/// are acceptable here; pegged stables are pinned to 1.0 and never queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceTable {
    #[serde(rename = "ETH")]
    pub eth: f64,
    #[serde(rename = "BNB")]
    pub bnb: f64,
    #[serde(rename = "MATIC")]
    pub matic: f64,
    #[serde(rename = "AVAX")]
    pub avax: f64,
    #[serde(rename = "FTM")]
    pub ftm: f64,
    #[serde(rename = "MNT")]
    pub mnt: f64,
    #[serde(rename = "SOL")]
    pub sol: f64,
    #[serde(rename = "USDT")]
    pub usdt: f64,
    #[serde(rename = "USDC")]
    pub usdc: f64,
}

impl PriceTable {
    /// Static table served whenever the oracle is unreachable.
    pub fn fallback() -> Self {
        Self {
            eth: 2500.0,
            bnb: 300.0,
            matic: 0.8,
            avax: 25.0,
            ftm: 0.4,
            mnt: 0.8,
            sol: 150.0,
            usdt: 1.0,
            usdc: 1.0,
        }
    }

    /// Map an oracle payload to the internal symbol set. Symbols missing
    /// from the payload fall back to their static defaults.
    fn from_oracle(payload: &Value) -> Self {
        let defaults = Self::fallback();
        let usd = |id: &str, default: f64| {
            payload
                .pointer(&format!("/{id}/usd"))
                .and_then(Value::as_f64)
                .unwrap_or(default)
        };

        Self {
            eth: usd("ethereum", defaults.eth),
            bnb: usd("binancecoin", defaults.bnb),
            matic: usd("matic-network", defaults.matic),
            avax: usd("avalanche-2", defaults.avax),
            ftm: usd("fantom", defaults.ftm),
            mnt: usd("mantle", defaults.mnt),
            sol: usd("solana", defaults.sol),
            usdt: 1.0,
            usdc: 1.0,
        }
    }
}

/// Best-effort client for the external price oracle.
pub struct PriceOracle {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl PriceOracle {
    pub fn new(http: Client, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: ORACLE_BASE_URL.to_string(),
            api_key,
            timeout,
        }
    }

    /// Current prices plus a degraded flag. Never fails: any oracle problem
    /// yields the full fallback table.
    pub async fn quote(&self) -> (PriceTable, bool) {
        match self.fetch().await {
            Ok(table) => (table, false),
            Err(error) => {
                warn!(%error, "price oracle unavailable, serving fallback table");
                (PriceTable::fallback(), true)
            }
        }
    }

    async fn fetch(&self) -> Result<PriceTable, reqwest::Error> {
        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.base_url, ORACLE_IDS
        );

        let mut request = self.http.get(url).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-pro-api-key", key);
        }

        let payload: Value = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(PriceTable::from_oracle(&payload))
    }
}
