// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Multi-chain routing and aggregation.
//!
//! Control flow for every operation: validate the address for the chain
//! family, resolve the (chain, network) pair to its endpoint list, then walk
//! the candidates in priority order and normalize the first success.

pub mod address;
pub mod erc20;
pub mod gateway;
pub mod invoke;
pub mod registry;

pub use gateway::{
    BalanceResult, GasEstimate, Gateway, GatewayError, TokenBalanceEntry, TransferCheck,
};
pub use invoke::{InvokeError, Invoker};
pub use registry::{ChainFamily, ChainRegistry, ChainRoute};
