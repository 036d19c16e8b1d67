// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Aggregation layer.
//!
//! Every operation follows the same shape: validate inputs for the chain
//! family, resolve the route, then walk its endpoints in priority order and
//! normalize the first successful answer. Failover is strictly sequential,
//! which bounds worst-case latency to the sum of per-endpoint timeouts.

use std::{future::Future, sync::Arc};

use alloy::primitives::{
    utils::parse_units,
    Address, U256,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;
use utoipa::ToSchema;

use super::{
    address,
    erc20::Erc20Contract,
    invoke::{InvokeError, Invoker},
    registry::{format_lamports, format_units_full, ChainFamily, ChainRegistry, ChainRoute},
};

/// Standard gas limit for a plain native transfer.
const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Flat Solana fee estimate in SOL (per-signature fee; no network call).
const SOLANA_FEE_SOL: &str = "0.000005";

const GWEI_DECIMALS: u8 = 9;

/// Failures the aggregation layer reports to callers. Per-endpoint causes
/// are logged, never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid Ethereum address")]
    InvalidEvmAddress,

    #[error("Invalid Solana address")]
    InvalidSolanaAddress,

    #[error("Unsupported chain/network")]
    UnsupportedRoute,

    #[error("Token balances are not supported on this chain")]
    SweepUnsupported,

    /// Every candidate endpoint failed. Distinct from `UnsupportedRoute`:
    /// this is a live upstream outage, not a configuration miss.
    #[error("all RPC endpoints failed for {route}")]
    Exhausted { route: String },

    /// An error object from a responsive node (proxy pass-through only).
    #[error("RPC call failed: {0}")]
    Rpc(InvokeError),
}

impl GatewayError {
    fn invalid_address(family: ChainFamily) -> Self {
        match family {
            ChainFamily::Evm => Self::InvalidEvmAddress,
            ChainFamily::Solana => Self::InvalidSolanaAddress,
        }
    }
}

/// Normalized native-balance result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BalanceResult {
    pub chain: String,
    pub address: String,
    /// Display-unit amount as an exact decimal string, never a float.
    pub balance: String,
}

/// Normalized gas estimate for a plain transfer.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimate {
    /// Gas price in gwei (EVM) or the flat fee in SOL (Solana).
    pub gas_price: String,
    pub gas_limit: u64,
    /// Price times limit in display units.
    pub total_cost: String,
    /// Settlement currency of the route.
    pub currency: String,
}

/// One positive token holding from a sweep.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenBalanceEntry {
    pub symbol: String,
    pub name: String,
    /// Token contract address.
    pub address: String,
    /// Decimal-adjusted balance.
    pub balance: String,
    pub decimals: u8,
}

/// Outcome of transaction pre-validation. Rejections are domain answers,
/// not errors; only endpoint exhaustion becomes a [`GatewayError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferCheck {
    Approved { balance: String },
    Rejected { reason: &'static str },
}

/// Orchestrates one logical operation per call. Stateless between requests:
/// every invocation re-resolves and re-validates from scratch.
pub struct Gateway {
    registry: Arc<ChainRegistry>,
    invoker: Invoker,
}

impl Gateway {
    pub fn new(registry: Arc<ChainRegistry>, invoker: Invoker) -> Self {
        Self { registry, invoker }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    fn resolve(&self, chain: &str, network: &str) -> Result<&ChainRoute, GatewayError> {
        self.registry
            .resolve(chain, network)
            .ok_or(GatewayError::UnsupportedRoute)
    }

    /// Native balance for an address on a supported route.
    pub async fn native_balance(
        &self,
        chain: &str,
        network: &str,
        address: &str,
    ) -> Result<BalanceResult, GatewayError> {
        let family = ChainFamily::for_chain(chain);
        if !address::validate(address, family) {
            return Err(GatewayError::invalid_address(family));
        }

        let route = self.resolve(chain, network)?;
        let (_, balance) = self.fetch_native(route, address).await?;

        Ok(BalanceResult {
            chain: route.chain.to_string(),
            address: address.to_string(),
            balance,
        })
    }

    /// Gas estimate for a plain transfer. Solana fees are flat and answered
    /// without touching the network or the registry.
    pub async fn gas_estimate(
        &self,
        chain: &str,
        network: &str,
    ) -> Result<GasEstimate, GatewayError> {
        if ChainFamily::for_chain(chain) == ChainFamily::Solana {
            return Ok(GasEstimate {
                gas_price: SOLANA_FEE_SOL.to_string(),
                gas_limit: 1,
                total_cost: SOLANA_FEE_SOL.to_string(),
                currency: "SOL".to_string(),
            });
        }

        let route = self.resolve(chain, network)?;
        let invoker = self.invoker.clone();
        let price = first_success(&route.key(), &route.endpoints, move |endpoint| {
            let invoker = invoker.clone();
            async move { invoker.evm_gas_price(&endpoint).await }
        })
        .await?;

        let price = U256::from(price);
        Ok(GasEstimate {
            gas_price: format_units_full(price, GWEI_DECIMALS),
            gas_limit: TRANSFER_GAS_LIMIT,
            total_cost: format_units_full(
                price * U256::from(TRANSFER_GAS_LIMIT),
                route.family.decimals(),
            ),
            currency: route.symbol.to_string(),
        })
    }

    /// Pre-validate a transfer: address syntax (sender first), amount
    /// syntax, route support, then a live balance comparison. Only the last
    /// step touches the network.
    pub async fn validate_transfer(
        &self,
        from: &str,
        to: &str,
        amount: &str,
        chain: &str,
        network: &str,
    ) -> Result<TransferCheck, GatewayError> {
        let family = ChainFamily::for_chain(chain);
        if !address::validate(from, family) || !address::validate(to, family) {
            return Ok(TransferCheck::Rejected {
                reason: match family {
                    ChainFamily::Evm => "Invalid address format",
                    ChainFamily::Solana => "Invalid Solana address",
                },
            });
        }

        if !is_positive_decimal(amount) {
            return Ok(TransferCheck::Rejected {
                reason: "Invalid amount",
            });
        }

        // An unknown route is a rejection here, not a client error: the
        // caller asked whether the transfer can work, and the answer is no.
        let Some(route) = self.registry.resolve(chain, network) else {
            return Ok(TransferCheck::Rejected {
                reason: "Unsupported chain/network",
            });
        };

        let (raw_balance, balance) = self.fetch_native(route, from).await?;

        let Some(requested) = parse_native_amount(amount, route.family.decimals()) else {
            return Ok(TransferCheck::Rejected {
                reason: "Invalid amount",
            });
        };

        if raw_balance < requested {
            return Ok(TransferCheck::Rejected {
                reason: "Insufficient balance",
            });
        }

        Ok(TransferCheck::Approved { balance })
    }

    /// Token-holding sweep. MAINNET-tier EVM routes only; any other tier
    /// returns an empty set before validation or any upstream call, matching
    /// the deployed behavior this gateway replaces.
    pub async fn token_sweep(
        &self,
        chain: &str,
        network: &str,
        holder: &str,
        tokens: &Map<String, Value>,
    ) -> Result<Vec<TokenBalanceEntry>, GatewayError> {
        if !network.trim().eq_ignore_ascii_case("MAINNET") {
            return Ok(Vec::new());
        }

        if !ChainFamily::for_chain(chain).supports_token_sweep() {
            return Err(GatewayError::SweepUnsupported);
        }

        if !address::is_valid_evm_address(holder) {
            return Err(GatewayError::InvalidEvmAddress);
        }

        let route = self.resolve(chain, network)?;

        // The sweep pins the route's primary endpoint; there is no
        // mid-sweep failover.
        let endpoint = route.endpoints.first().ok_or_else(|| GatewayError::Exhausted {
            route: route.key(),
        })?;
        let provider = match Invoker::evm_provider(endpoint) {
            Ok(provider) => provider,
            Err(error) => {
                warn!(endpoint = endpoint.as_str(), error = %error,
                    "token sweep provider unavailable");
                return Err(GatewayError::Exhausted { route: route.key() });
            }
        };

        let owner: Address = holder.parse().map_err(|_| GatewayError::InvalidEvmAddress)?;

        let mut entries = Vec::new();
        for (symbol, contract_address) in tokens {
            let Some(contract_address) = contract_address.as_str() else {
                warn!(symbol = symbol.as_str(), "skipping token with a non-string contract address");
                continue;
            };

            let outcome = self.read_token(&provider, owner, contract_address).await;
            if let Some(entry) = sweep_entry(symbol, contract_address, outcome) {
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    /// Arbitrary EVM method pass-through. Transport-level failures roll to
    /// the next endpoint; an error object from a responsive node is final,
    /// since every other endpoint would answer the same.
    pub async fn proxy(
        &self,
        chain: &str,
        network: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, GatewayError> {
        let route = self.resolve(chain, network)?;
        if route.family != ChainFamily::Evm {
            return Err(GatewayError::UnsupportedRoute);
        }

        let route_key = route.key();
        for endpoint in &route.endpoints {
            match self
                .invoker
                .evm_request(endpoint, method, params.clone())
                .await
            {
                Ok(result) => return Ok(result),
                Err(error) if error.is_rpc_level() => return Err(GatewayError::Rpc(error)),
                Err(error) => {
                    warn!(route = %route_key, endpoint = endpoint.as_str(), error = %error,
                        "endpoint failed, trying next");
                }
            }
        }

        Err(GatewayError::Exhausted { route: route_key })
    }

    /// Raw and display-unit native balance, with endpoint failover.
    async fn fetch_native(
        &self,
        route: &ChainRoute,
        address: &str,
    ) -> Result<(U256, String), GatewayError> {
        match route.family {
            ChainFamily::Evm => {
                let holder: Address = address
                    .parse()
                    .map_err(|_| GatewayError::InvalidEvmAddress)?;
                let invoker = self.invoker.clone();
                let wei = first_success(&route.key(), &route.endpoints, move |endpoint| {
                    let invoker = invoker.clone();
                    async move { invoker.evm_native_balance(&endpoint, holder).await }
                })
                .await?;
                Ok((wei, format_units_full(wei, route.family.decimals())))
            }
            ChainFamily::Solana => {
                let invoker = self.invoker.clone();
                let owner = address.to_string();
                let lamports = first_success(&route.key(), &route.endpoints, move |endpoint| {
                    let invoker = invoker.clone();
                    let owner = owner.clone();
                    async move { invoker.solana_balance(&endpoint, &owner).await }
                })
                .await?;
                Ok((U256::from(lamports), format_lamports(lamports)))
            }
        }
    }

    /// One token's balance/decimals/name under the per-call timeout.
    async fn read_token<P: alloy::providers::Provider + Clone>(
        &self,
        provider: &P,
        owner: Address,
        contract_address: &str,
    ) -> Result<(U256, u8, String), InvokeError> {
        let contract = Erc20Contract::new(provider, contract_address)?;
        match tokio::time::timeout(self.invoker.timeout(), contract.holding(owner)).await {
            Ok(result) => result,
            Err(_) => Err(InvokeError::Timeout(self.invoker.timeout())),
        }
    }
}

/// Walk candidate endpoints in priority order and return the first success.
/// Stops at the first success; per-endpoint causes are logged, not returned.
pub(crate) async fn first_success<T, F, Fut>(
    route_key: &str,
    endpoints: &[String],
    mut attempt: F,
) -> Result<T, GatewayError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, InvokeError>>,
{
    for endpoint in endpoints {
        match attempt(endpoint.clone()).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                warn!(route = route_key, endpoint = endpoint.as_str(), error = %error,
                    "endpoint failed, trying next");
            }
        }
    }

    Err(GatewayError::Exhausted {
        route: route_key.to_string(),
    })
}

/// Fold one token's contract-read outcome into a sweep entry. Failures are
/// logged and skipped; zero balances are excluded.
fn sweep_entry(
    symbol: &str,
    contract_address: &str,
    outcome: Result<(U256, u8, String), InvokeError>,
) -> Option<TokenBalanceEntry> {
    match outcome {
        Ok((raw, decimals, name)) if !raw.is_zero() => Some(TokenBalanceEntry {
            symbol: symbol.to_string(),
            name,
            address: contract_address.to_string(),
            balance: format_units_full(raw, decimals),
            decimals,
        }),
        Ok(_) => None,
        Err(error) => {
            warn!(symbol, token = contract_address, error = %error,
                "skipping token after failed contract read");
            None
        }
    }
}

/// Syntactic amount check used before the route (and so the decimal scale)
/// is known: digits with at most one dot, and a non-zero value.
fn is_positive_decimal(amount: &str) -> bool {
    let amount = amount.trim();
    let mut seen_dot = false;
    let mut seen_digit = false;
    let mut seen_nonzero = false;

    for c in amount.chars() {
        match c {
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => {
                seen_digit = true;
                if c != '0' {
                    seen_nonzero = true;
                }
            }
            _ => return false,
        }
    }

    seen_digit && seen_nonzero
}

/// Exact smallest-unit value of a display-unit amount string. `None` when
/// the string does not fit the chain's decimal scale.
fn parse_native_amount(amount: &str, decimals: u8) -> Option<U256> {
    parse_units(amount.trim(), decimals)
        .ok()
        .map(|parsed| parsed.get_absolute())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::config::Config;

    fn test_gateway() -> Gateway {
        Gateway::new(
            Arc::new(ChainRegistry::from_config(&Config::default())),
            Invoker::new(reqwest::Client::new(), Duration::from_secs(1)),
        )
    }

    fn endpoints(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://node-{i}.example")).collect()
    }

    #[tokio::test]
    async fn failover_stops_at_the_first_success() {
        let attempts = Cell::new(0u32);
        let result = first_success("ETH_MAINNET", &endpoints(4), |endpoint| {
            attempts.set(attempts.get() + 1);
            async move {
                if endpoint.contains("node-2") {
                    Ok(42u64)
                } else {
                    Err(InvokeError::Transport("connection refused".to_string()))
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        // Two failures, one success, and never a fourth attempt.
        assert_eq!(attempts.get(), 3);
    }

    #[tokio::test]
    async fn failover_reports_exhaustion_when_every_endpoint_fails() {
        let attempts = Cell::new(0u32);
        let result: Result<u64, _> = first_success("ETH_MAINNET", &endpoints(3), |_| {
            attempts.set(attempts.get() + 1);
            async { Err(InvokeError::Transport("down".to_string())) }
        })
        .await;

        assert_eq!(attempts.get(), 3);
        assert!(matches!(
            result,
            Err(GatewayError::Exhausted { route }) if route == "ETH_MAINNET"
        ));
    }

    #[tokio::test]
    async fn first_endpoint_success_skips_the_rest() {
        let attempts = Cell::new(0u32);
        let result = first_success("BNB_MAINNET", &endpoints(3), |_| {
            attempts.set(attempts.get() + 1);
            async { Ok("ok") }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(attempts.get(), 1);
    }

    #[tokio::test]
    async fn solana_gas_estimate_is_fixed_and_offline() {
        let estimate = test_gateway().gas_estimate("SOLANA", "MAINNET").await.unwrap();
        assert_eq!(estimate.gas_price, "0.000005");
        assert_eq!(estimate.gas_limit, 1);
        assert_eq!(estimate.total_cost, "0.000005");
        assert_eq!(estimate.currency, "SOL");

        // Even an unregistered tier answers: no resolution happens.
        let estimate = test_gateway().gas_estimate("solana", "TESTNET").await.unwrap();
        assert_eq!(estimate.currency, "SOL");
    }

    #[tokio::test]
    async fn balance_rejects_bad_addresses_before_any_network_call() {
        let error = test_gateway()
            .native_balance("ETH", "MAINNET", "0x1234")
            .await
            .unwrap_err();
        assert!(matches!(error, GatewayError::InvalidEvmAddress));

        let error = test_gateway()
            .native_balance("SOLANA", "MAINNET", "short")
            .await
            .unwrap_err();
        assert!(matches!(error, GatewayError::InvalidSolanaAddress));
    }

    #[tokio::test]
    async fn balance_rejects_unsupported_routes() {
        let error = test_gateway()
            .native_balance("ETH", "HOLESKY", "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")
            .await
            .unwrap_err();
        assert!(matches!(error, GatewayError::UnsupportedRoute));
    }

    #[tokio::test]
    async fn transfer_validation_rejects_before_the_network() {
        let gateway = test_gateway();

        let check = gateway
            .validate_transfer(
                "0xnope",
                "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                "1",
                "ETH",
                "MAINNET",
            )
            .await
            .unwrap();
        assert_eq!(
            check,
            TransferCheck::Rejected {
                reason: "Invalid address format"
            }
        );

        let check = gateway
            .validate_transfer(
                "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                "0",
                "ETH",
                "MAINNET",
            )
            .await
            .unwrap();
        assert_eq!(
            check,
            TransferCheck::Rejected {
                reason: "Invalid amount"
            }
        );

        let check = gateway
            .validate_transfer(
                "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                "1",
                "ETH",
                "NOWHERE",
            )
            .await
            .unwrap();
        assert_eq!(
            check,
            TransferCheck::Rejected {
                reason: "Unsupported chain/network"
            }
        );
    }

    #[tokio::test]
    async fn token_sweep_skips_non_mainnet_tiers_without_calls() {
        let mut tokens = Map::new();
        tokens.insert(
            "USDC".to_string(),
            Value::String("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".to_string()),
        );

        // No validation and no upstream call: even a bogus holder address
        // comes back as an empty set on a test tier.
        let entries = test_gateway()
            .token_sweep("ETH", "SEPOLIA", "not-an-address", &tokens)
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn token_sweep_is_evm_only() {
        let error = test_gateway()
            .token_sweep("SOLANA", "MAINNET", "0x0", &Map::new())
            .await
            .unwrap_err();
        assert!(matches!(error, GatewayError::SweepUnsupported));
    }

    #[tokio::test]
    async fn token_sweep_validates_the_holder() {
        let error = test_gateway()
            .token_sweep("ETH", "MAINNET", "0xnot-an-address", &Map::new())
            .await
            .unwrap_err();
        assert!(matches!(error, GatewayError::InvalidEvmAddress));
    }

    #[tokio::test]
    async fn proxy_rejects_non_evm_routes() {
        let error = test_gateway()
            .proxy("SOLANA", "MAINNET", "eth_blockNumber", Value::Array(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(error, GatewayError::UnsupportedRoute));
    }

    #[test]
    fn sweep_isolates_per_token_failures_and_keeps_order() {
        let outcomes = vec![
            (
                "USDC",
                "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
                Ok((U256::from(5_000_000u64), 6u8, "USD Coin".to_string())),
            ),
            (
                "LINK",
                "0x514910771AF9Ca656af840dff83E8264EcF986CA",
                Err(InvokeError::Transport("read failed".to_string())),
            ),
            (
                "DAI",
                "0x6B175474E89094C44Da98b954EedeAC495271d0F",
                Ok((U256::from(1_000_000_000_000_000_000u64), 18u8, "Dai Stablecoin".to_string())),
            ),
        ];

        let entries: Vec<_> = outcomes
            .into_iter()
            .filter_map(|(symbol, address, outcome)| sweep_entry(symbol, address, outcome))
            .collect();

        // The failed middle token is skipped; the survivors keep request order.
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].symbol, "USDC");
        assert_eq!(entries[0].balance, "5");
        assert_eq!(entries[1].symbol, "DAI");
        assert_eq!(entries[1].balance, "1");
    }

    #[test]
    fn sweep_excludes_zero_balances() {
        let entry = sweep_entry(
            "USDC",
            "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            Ok((U256::ZERO, 6, "USD Coin".to_string())),
        );
        assert!(entry.is_none());
    }

    #[test]
    fn positive_decimal_check() {
        assert!(is_positive_decimal("1"));
        assert!(is_positive_decimal("0.5"));
        assert!(is_positive_decimal(".5"));
        assert!(is_positive_decimal(" 2.25 "));

        assert!(!is_positive_decimal("0"));
        assert!(!is_positive_decimal("0.0"));
        assert!(!is_positive_decimal(""));
        assert!(!is_positive_decimal("-1"));
        assert!(!is_positive_decimal("abc"));
        assert!(!is_positive_decimal("1.2.3"));
    }

    #[test]
    fn native_amounts_parse_exactly() {
        assert_eq!(
            parse_native_amount("1.5", 18).unwrap(),
            U256::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(parse_native_amount("0.000001", 9).unwrap(), U256::from(1_000u64));
        // More fractional digits than the scale allows.
        assert!(parse_native_amount("0.0000000001", 9).is_none());
    }
}
