// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain registry: maps a (chain, network) pair to its family, settlement
//! currency, and prioritized upstream endpoints.
//!
//! The registry is built once at startup from [`Config`] and never mutated;
//! handlers receive it through shared state, which keeps endpoint selection
//! deterministic and testable with an injected configuration.

use std::collections::HashMap;

use alloy::primitives::U256;

use crate::config::Config;

/// Account model shared by a group of chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    /// Ethereum-style chains: hex addresses, wei scale, ERC-20 contracts.
    Evm,
    /// Solana: base58 addresses, lamport scale, no ERC-20 interface.
    Solana,
}

impl ChainFamily {
    /// Family implied by a chain identifier. Everything except Solana
    /// speaks the EVM account model.
    pub fn for_chain(chain: &str) -> Self {
        if chain.trim().eq_ignore_ascii_case("SOLANA") {
            Self::Solana
        } else {
            Self::Evm
        }
    }

    /// Native-unit scale: wei (18) for EVM chains, lamports (9) for Solana.
    pub fn decimals(self) -> u8 {
        match self {
            Self::Evm => 18,
            Self::Solana => 9,
        }
    }

    /// ERC-20-style token sweeps only exist on the EVM side.
    pub fn supports_token_sweep(self) -> bool {
        matches!(self, Self::Evm)
    }
}

/// One supported (chain, network) pair.
#[derive(Debug, Clone)]
pub struct ChainRoute {
    pub chain: &'static str,
    pub network: &'static str,
    pub family: ChainFamily,
    /// Settlement currency reported in gas estimates.
    pub symbol: &'static str,
    /// Candidate endpoints in fallback priority order: commercial provider
    /// first, public nodes last. Never empty for a registered route.
    pub endpoints: Vec<String>,
}

impl ChainRoute {
    pub fn key(&self) -> String {
        format!("{}_{}", self.chain, self.network)
    }
}

/// Immutable lookup table over every supported route.
pub struct ChainRegistry {
    routes: HashMap<String, ChainRoute>,
}

impl ChainRegistry {
    /// Build the registry, interpolating provider API keys into the
    /// endpoint URLs. This is the only place keys touch a URL.
    pub fn from_config(config: &Config) -> Self {
        let infura = &config.infura_key;
        let alchemy = &config.alchemy_key;

        let routes = vec![
            route(
                "ETH",
                "MAINNET",
                ChainFamily::Evm,
                "ETH",
                vec![
                    format!("https://mainnet.infura.io/v3/{infura}"),
                    "https://ethereum-rpc.publicnode.com".to_string(),
                    "https://eth.llamarpc.com".to_string(),
                ],
            ),
            route(
                "ETH",
                "SEPOLIA",
                ChainFamily::Evm,
                "ETH",
                vec![
                    format!("https://sepolia.infura.io/v3/{infura}"),
                    "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
                ],
            ),
            route(
                "BNB",
                "MAINNET",
                ChainFamily::Evm,
                "BNB",
                vec![
                    "https://bsc-dataseed1.binance.org".to_string(),
                    "https://bsc-dataseed2.binance.org".to_string(),
                    "https://bsc-rpc.publicnode.com".to_string(),
                ],
            ),
            route(
                "BNB",
                "TESTNET",
                ChainFamily::Evm,
                "BNB",
                vec!["https://bsc-testnet.publicnode.com".to_string()],
            ),
            route(
                "POLYGON",
                "MAINNET",
                ChainFamily::Evm,
                "MATIC",
                vec![
                    format!("https://polygon-mainnet.g.alchemy.com/v2/{alchemy}"),
                    "https://polygon-rpc.com".to_string(),
                    "https://polygon-bor-rpc.publicnode.com".to_string(),
                ],
            ),
            route(
                "POLYGON",
                "TESTNET",
                ChainFamily::Evm,
                "MATIC",
                vec![
                    format!("https://polygon-amoy.g.alchemy.com/v2/{alchemy}"),
                    "https://polygon-amoy-bor-rpc.publicnode.com".to_string(),
                ],
            ),
            route(
                "ARBITRUM",
                "MAINNET",
                ChainFamily::Evm,
                "ETH",
                vec![
                    format!("https://arb-mainnet.g.alchemy.com/v2/{alchemy}"),
                    "https://arb1.arbitrum.io/rpc".to_string(),
                ],
            ),
            route(
                "OPTIMISM",
                "MAINNET",
                ChainFamily::Evm,
                "ETH",
                vec![
                    format!("https://opt-mainnet.g.alchemy.com/v2/{alchemy}"),
                    "https://mainnet.optimism.io".to_string(),
                ],
            ),
            route(
                "BASE",
                "MAINNET",
                ChainFamily::Evm,
                "ETH",
                vec![
                    format!("https://base-mainnet.g.alchemy.com/v2/{alchemy}"),
                    "https://mainnet.base.org".to_string(),
                ],
            ),
            route(
                "AVALANCHE",
                "MAINNET",
                ChainFamily::Evm,
                "AVAX",
                vec![
                    "https://api.avax.network/ext/bc/C/rpc".to_string(),
                    "https://avalanche-c-chain-rpc.publicnode.com".to_string(),
                ],
            ),
            route(
                "SOLANA",
                "MAINNET",
                ChainFamily::Solana,
                "SOL",
                vec![
                    "https://api.mainnet-beta.solana.com".to_string(),
                    "https://solana-rpc.publicnode.com".to_string(),
                ],
            ),
            route(
                "SOLANA",
                "DEVNET",
                ChainFamily::Solana,
                "SOL",
                vec!["https://api.devnet.solana.com".to_string()],
            ),
        ];

        Self {
            routes: routes.into_iter().map(|r| (r.key(), r)).collect(),
        }
    }

    /// Case-normalize and resolve a (chain, network) pair.
    ///
    /// `None` means the pair is unsupported; a registered route always has
    /// at least one endpoint.
    pub fn resolve(&self, chain: &str, network: &str) -> Option<&ChainRoute> {
        let key = format!(
            "{}_{}",
            chain.trim().to_ascii_uppercase(),
            network.trim().to_ascii_uppercase()
        );
        self.routes.get(&key)
    }

    pub fn routes(&self) -> impl Iterator<Item = &ChainRoute> {
        self.routes.values()
    }
}

fn route(
    chain: &'static str,
    network: &'static str,
    family: ChainFamily,
    symbol: &'static str,
    endpoints: Vec<String>,
) -> ChainRoute {
    ChainRoute {
        chain,
        network,
        family,
        symbol,
        endpoints,
    }
}

/// Exact decimal rendering of a raw integer amount at the given scale.
///
/// Full precision: 18-decimal amounts exceed what a binary float can carry,
/// so the conversion stays in integer space and only trailing zeros are
/// trimmed from the fraction.
pub fn format_units_full(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let frac = format!("{:0>width$}", remainder, width = decimals as usize);
        let frac = frac.trim_end_matches('0');
        format!("{whole}.{frac}")
    }
}

/// Lamports rendered as SOL with six fixed decimal places, rounding at the
/// sixth.
pub fn format_lamports(lamports: u64) -> String {
    const LAMPORTS_PER_MICRO_SOL: u64 = 1_000;
    let micro = (lamports + LAMPORTS_PER_MICRO_SOL / 2) / LAMPORTS_PER_MICRO_SOL;
    format!("{}.{:06}", micro / 1_000_000, micro % 1_000_000)
}
