// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Capabilities the checkpoint manager consumes: the rootchain, the local chain and the
//! validator set provider.

pub mod evm;

use anyhow::Result;
use async_trait::async_trait;
use checkpoint_sdk::{Header, ValidatorSet};
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest};

pub use evm::EthRootchainInteractor;

/// Trait to interact with the rootchain. Implementations own the rpc deadlines, a call that hangs
/// blocks its caller until the implementation gives up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RootchainInteractor: Send + Sync {
    /// Read only contract call. Returns the textual (decimal or `0x` hex) representation of the
    /// returned value.
    async fn call(&self, from: Address, to: Address, input: Bytes) -> Result<String>;

    /// The pending nonce of `address`.
    async fn get_pending_nonce(&self, address: Address) -> Result<u64>;

    /// Sends `transaction` with the given `nonce` and waits for its receipt.
    async fn send_transaction(
        &self,
        nonce: u64,
        transaction: TransactionRequest,
    ) -> Result<TransactionReceipt>;
}

/// Read access to the local sidechain.
#[cfg_attr(test, mockall::automock)]
pub trait Blockchain: Send + Sync {
    fn get_header_by_number(&self, number: u64) -> Option<Header>;
}

/// Provides the committee active on the sidechain.
#[cfg_attr(test, mockall::automock)]
pub trait ValidatorSetProvider: Send + Sync {
    /// The validator set that becomes active after the block at `block_number`.
    fn get_validators(&self, block_number: u64) -> Result<ValidatorSet>;
}
