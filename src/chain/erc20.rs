// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract reads.

use std::str::FromStr;

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

use super::invoke::InvokeError;

// Read-only slice of the ERC-20 interface; the gateway never transfers.
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Read-only wrapper around one deployed token contract.
pub struct Erc20Contract<P> {
    contract: IERC20::IERC20Instance<P>,
}

impl<P: Provider + Clone> Erc20Contract<P> {
    pub fn new(provider: &P, contract_address: &str) -> Result<Self, InvokeError> {
        let address = Address::from_str(contract_address)
            .map_err(|e| InvokeError::Contract(format!("invalid contract address: {e}")))?;

        Ok(Self {
            contract: IERC20::new(address, provider.clone()),
        })
    }

    /// Raw balance, decimal count, and display name for one holder, fetched
    /// with three concurrent contract calls.
    pub async fn holding(&self, holder: Address) -> Result<(U256, u8, String), InvokeError> {
        let balance_call = self.contract.balanceOf(holder);
        let decimals_call = self.contract.decimals();
        let name_call = self.contract.name();
        let (balance, decimals, name) = tokio::join!(
            balance_call.call(),
            decimals_call.call(),
            name_call.call(),
        );

        Ok((
            balance.map_err(contract_error)?,
            decimals.map_err(contract_error)?,
            name.map_err(contract_error)?,
        ))
    }
}

fn contract_error(error: alloy::contract::Error) -> InvokeError {
    InvokeError::Contract(error.to_string())
}
