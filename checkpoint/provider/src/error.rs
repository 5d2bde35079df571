// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
use thiserror::Error;

/// Errors of a checkpoint submission. A single error is returned per
/// [`submit_checkpoint`](crate::CheckpointManager::submit_checkpoint) call.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to invoke {function} function on the rootchain: {source}")]
    RootchainCallFailed {
        function: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to convert current checkpoint id {0:?} to a number")]
    MalformedCheckpointId(String),
    #[error("failed to abi encode checkpoint call: {0}")]
    Encoding(#[from] ethers::abi::Error),
    #[error("block {0} does not carry both a checkpoint and a committed signature")]
    IncompleteExtra(u64),
    #[error("cannot decode extra data of block {block}: {source}")]
    MalformedExtra {
        block: u64,
        #[source]
        source: checkpoint_sdk::Error,
    },
    #[error("block {0} was not found")]
    HeaderNotFound(u64),
    #[error("block {block} has epoch {epoch}, greater than epoch {previous} of a later block")]
    EpochRegression { block: u64, epoch: u64, previous: u64 },
    #[error("cannot get next validators for block {block}: {source}")]
    Validators {
        block: u64,
        #[source]
        source: anyhow::Error,
    },
    #[error("cannot get pending nonce from the rootchain: {0}")]
    Nonce(#[source] anyhow::Error),
    #[error("cannot send checkpoint transaction for epoch {epoch}: {source}")]
    SendTransaction {
        epoch: u64,
        #[source]
        source: anyhow::Error,
    },
    #[error("checkpoint submission transaction for epoch {epoch} failed")]
    CheckpointSubmissionFailed { epoch: u64 },
}
