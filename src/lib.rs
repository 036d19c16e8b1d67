// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chaingate - Multi-chain RPC Gateway
//!
//! A thin HTTP gateway that answers balance, gas, token-holding, and price
//! queries across several EVM chains and Solana without the caller carrying
//! any chain-specific RPC logic. Each supported (chain, network) pair maps
//! to an ordered endpoint list; operations walk that list sequentially and
//! normalize whatever the first responsive provider returns.
//!
//! The gateway holds no keys, signs nothing, and persists nothing.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `chain` - registry, address validation, upstream invocation, aggregation
//! - `prices` - spot price adapter with a static fallback table

pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod prices;
pub mod state;
