// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and passed
//! explicitly into the components that need it; nothing reads ambient state
//! afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3001` |
//! | `INFURA_KEY` | Infura project ID for Ethereum endpoints | compiled-in key |
//! | `ALCHEMY_KEY` | Alchemy key for Polygon/L2 endpoints | compiled-in key |
//! | `COINGECKO_API_KEY` | Pro API key for the price oracle | unset (free tier) |
//! | `RPC_TIMEOUT_SECS` | Per-call upstream timeout in seconds | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

/// Infura project ID used when `INFURA_KEY` is unset.
const DEFAULT_INFURA_KEY: &str = "2eb003d772d345c48214cad05878e67c";

/// Alchemy key used when `ALCHEMY_KEY` is unset.
const DEFAULT_ALCHEMY_KEY: &str = "RV7R38aklgHvDsNjslY6Xo9ptfJ--r2t";

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

/// Process configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Infura project ID interpolated into Ethereum endpoint URLs.
    pub infura_key: String,
    /// Alchemy key interpolated into Polygon and L2 endpoint URLs.
    pub alchemy_key: String,
    /// Optional pro-tier key for the price oracle.
    pub coingecko_api_key: Option<String>,
    /// Upper bound on every individual upstream call.
    pub rpc_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parsed("PORT", DEFAULT_PORT),
            infura_key: env_or("INFURA_KEY", DEFAULT_INFURA_KEY),
            alchemy_key: env_or("ALCHEMY_KEY", DEFAULT_ALCHEMY_KEY),
            coingecko_api_key: std::env::var("COINGECKO_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            rpc_timeout: Duration::from_secs(env_parsed(
                "RPC_TIMEOUT_SECS",
                DEFAULT_RPC_TIMEOUT_SECS,
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            infura_key: DEFAULT_INFURA_KEY.to_string(),
            alchemy_key: DEFAULT_ALCHEMY_KEY.to_string(),
            coingecko_api_key: None,
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
