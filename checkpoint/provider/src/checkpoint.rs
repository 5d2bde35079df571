// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Rootchain checkpoint manager

use anyhow::Result;
use checkpoint_sdk::{is_checkpoint_block, CheckpointData, Extra, Header, Signature};
use ethers::types::{Address, Bytes, TransactionRequest, H256, U64};
use std::fmt::{Display, Formatter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::abi::{submit_checkpoint_tokens, CURRENT_CHECKPOINT_ID_METHOD, SUBMIT_CHECKPOINT_METHOD};
use crate::config::Config;
use crate::error::CheckpointError;
use crate::manager::evm::MiddlewareImpl;
use crate::manager::{Blockchain, EthRootchainInteractor, RootchainInteractor, ValidatorSetProvider};

/// Receipt status of a successful transaction.
const RECEIPT_SUCCESS: u64 = 1;

/// A request to submit checkpoints up to `header`.
#[derive(Debug, Clone)]
pub struct CheckpointTrigger {
    pub header: Header,
    pub is_end_of_epoch: bool,
}

/// A finalized checkpoint header not yet known to the rootchain.
struct PendingCheckpoint {
    number: u64,
    hash: H256,
    checkpoint: CheckpointData,
    committed: Signature,
}

/// Submits the checkpoints of the sidechain to the checkpoint manager contract of the rootchain.
///
/// The manager keeps no state between calls: every submission starts from the checkpoint id the
/// rootchain reports. Callers must not run two submissions for the same sender concurrently,
/// [`CheckpointManager::run`] serializes them.
pub struct CheckpointManager<R, B, V> {
    /// The rootchain account submitting checkpoints
    sender: Address,
    /// The checkpoint manager contract on the rootchain
    checkpoint_manager_address: Address,
    /// Number of blocks between two checkpoint blocks
    checkpoints_offset: u64,
    rootchain: R,
    blockchain: B,
    validators: V,
}

impl<R, B, V> CheckpointManager<R, B, V>
where
    R: RootchainInteractor,
    B: Blockchain,
    V: ValidatorSetProvider,
{
    pub fn new(
        sender: Address,
        checkpoint_manager_address: Address,
        checkpoints_offset: u64,
        rootchain: R,
        blockchain: B,
        validators: V,
    ) -> Self {
        Self {
            sender,
            checkpoint_manager_address,
            checkpoints_offset,
            rootchain,
            blockchain,
            validators,
        }
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn checkpoints_offset(&self) -> u64 {
        self.checkpoints_offset
    }

    /// True iff `block_number` is a positive multiple of the checkpoints offset.
    pub fn is_checkpoint_block(&self, block_number: u64) -> bool {
        is_checkpoint_block(block_number, self.checkpoints_offset)
    }

    /// Reads the id of the latest checkpoint accepted by the rootchain.
    pub async fn get_current_checkpoint_id(&self) -> Result<u64, CheckpointError> {
        let input = CURRENT_CHECKPOINT_ID_METHOD.encode_input(&[])?;
        let result = self
            .rootchain
            .call(
                self.sender,
                self.checkpoint_manager_address,
                Bytes::from(input),
            )
            .await
            .map_err(|source| CheckpointError::RootchainCallFailed {
                function: "currentCheckpointId",
                source,
            })?;

        parse_checkpoint_id(&result)
    }

    /// Builds the `submitCheckpoint` call data for the checkpoint carried by `extra`.
    pub fn abi_encode_checkpoint_block(
        &self,
        block_number: u64,
        block_hash: H256,
        extra: &Extra,
        next_validators: &checkpoint_sdk::ValidatorSet,
    ) -> Result<Vec<u8>, CheckpointError> {
        let (checkpoint, committed) = extra
            .finalized()
            .ok_or(CheckpointError::IncompleteExtra(block_number))?;

        let tokens = submit_checkpoint_tokens(
            block_number,
            block_hash,
            checkpoint,
            committed,
            next_validators,
        );
        Ok(SUBMIT_CHECKPOINT_METHOD.encode_input(&tokens)?)
    }

    /// Submits, oldest epoch first, every finalized checkpoint between the one the rootchain
    /// already has and `latest_header`.
    ///
    /// `latest_header` is submitted once its committed signature reaches the quorum of the
    /// validators that signed it. `is_end_of_epoch` forces its submission regardless, so that the
    /// checkpoint carrying a validator set change is never held back. The first failure stops
    /// the submission, no later epoch is attempted.
    pub async fn submit_checkpoint(
        &self,
        latest_header: &Header,
        is_end_of_epoch: bool,
    ) -> Result<(), CheckpointError> {
        let current_checkpoint_id = self.get_current_checkpoint_id().await?;
        log::debug!(
            "current checkpoint id on the rootchain: {current_checkpoint_id}, latest block: {}",
            latest_header.number
        );

        let pending =
            self.pending_checkpoints(latest_header, current_checkpoint_id, is_end_of_epoch)?;
        if pending.is_empty() {
            log::debug!("no pending checkpoint after epoch {current_checkpoint_id}");
            return Ok(());
        }

        log::info!(
            "submitting {} checkpoint(s), epochs {} to {}",
            pending.len(),
            pending[0].checkpoint.epoch_number,
            pending[pending.len() - 1].checkpoint.epoch_number,
        );

        let mut nonce = self
            .rootchain
            .get_pending_nonce(self.sender)
            .await
            .map_err(CheckpointError::Nonce)?;

        for checkpoint in pending.iter() {
            self.encode_and_send_checkpoint(nonce, checkpoint).await?;
            nonce += 1;
        }

        Ok(())
    }

    /// Walks the local chain backward from `latest_header` and collects, for every epoch newer
    /// than `current_checkpoint_id`, the last finalized header of the epoch. The result is sorted
    /// by ascending epoch.
    fn pending_checkpoints(
        &self,
        latest_header: &Header,
        current_checkpoint_id: u64,
        is_end_of_epoch: bool,
    ) -> Result<Vec<PendingCheckpoint>, CheckpointError> {
        let mut pending: Vec<PendingCheckpoint> = vec![];
        let mut last_epoch: Option<u64> = None;
        let mut header = latest_header.clone();

        loop {
            let is_latest = header.number == latest_header.number;

            let extra = match header.extra() {
                Ok(extra) => Some(extra),
                Err(source) if is_latest => {
                    return Err(CheckpointError::MalformedExtra {
                        block: header.number,
                        source,
                    });
                }
                Err(e) => {
                    log::warn!("cannot decode extra of block {}, skipped: {e}", header.number);
                    None
                }
            };

            match extra.as_ref().and_then(Extra::finalized) {
                Some((checkpoint, committed)) => {
                    let epoch = checkpoint.epoch_number;
                    if epoch <= current_checkpoint_id {
                        break;
                    }

                    if let Some(previous) = last_epoch.filter(|previous| epoch > *previous) {
                        return Err(CheckpointError::EpochRegression {
                            block: header.number,
                            epoch,
                            previous,
                        });
                    }
                    last_epoch = Some(epoch);

                    // a later block of this epoch may already be collected
                    let collected = pending.last().map(|p| p.checkpoint.epoch_number);
                    if collected != Some(epoch) {
                        if is_latest
                            && !is_end_of_epoch
                            && !self.has_quorum(header.number, committed)?
                        {
                            log::debug!(
                                "block {} lacks a quorum of signatures, deferring it",
                                header.number
                            );
                        } else {
                            pending.push(PendingCheckpoint {
                                number: header.number,
                                hash: header.hash,
                                checkpoint: checkpoint.clone(),
                                committed: committed.clone(),
                            });
                        }
                    }
                }
                None if extra.is_some() => {
                    log::warn!(
                        "block {} is missing its checkpoint or committed signature, skipped",
                        header.number
                    );
                }
                None => {}
            }

            // genesis is never a checkpoint
            if header.number <= 1 {
                break;
            }

            let number = header.number - 1;
            header = self
                .blockchain
                .get_header_by_number(number)
                .ok_or(CheckpointError::HeaderNotFound(number))?;
        }

        pending.reverse();
        Ok(pending)
    }

    /// True if `committed` carries the quorum of the validators that signed block `number`.
    fn has_quorum(&self, number: u64, committed: &Signature) -> Result<bool, CheckpointError> {
        let parent = number.saturating_sub(1);
        let signers = self
            .validators
            .get_validators(parent)
            .map_err(|source| CheckpointError::Validators {
                block: parent,
                source,
            })?;
        Ok(signers.has_quorum(&committed.bitmap))
    }

    async fn encode_and_send_checkpoint(
        &self,
        nonce: u64,
        pending: &PendingCheckpoint,
    ) -> Result<(), CheckpointError> {
        let epoch = pending.checkpoint.epoch_number;

        let next_validators = self
            .validators
            .get_validators(pending.number)
            .map_err(|source| CheckpointError::Validators {
                block: pending.number,
                source,
            })?;

        let extra = Extra {
            checkpoint: Some(pending.checkpoint.clone()),
            committed: Some(pending.committed.clone()),
        };
        let input =
            self.abi_encode_checkpoint_block(pending.number, pending.hash, &extra, &next_validators)?;

        let transaction = TransactionRequest::new()
            .from(self.sender)
            .to(self.checkpoint_manager_address)
            .data(input);

        log::debug!(
            "sending checkpoint for epoch {epoch} at block {} with nonce {nonce}",
            pending.number
        );
        let receipt = self
            .rootchain
            .send_transaction(nonce, transaction)
            .await
            .map_err(|source| CheckpointError::SendTransaction { epoch, source })?;

        if receipt.status != Some(U64::from(RECEIPT_SUCCESS)) {
            log::error!(
                "checkpoint for epoch {epoch} rejected by the rootchain, receipt: {:?}",
                receipt.transaction_hash
            );
            return Err(CheckpointError::CheckpointSubmissionFailed { epoch });
        }

        log::info!(
            "checkpoint for epoch {epoch} at block {} submitted in transaction {:?}",
            pending.number,
            receipt.transaction_hash
        );
        Ok(())
    }
}

impl<R, B, V> CheckpointManager<R, B, V>
where
    R: RootchainInteractor + 'static,
    B: Blockchain + 'static,
    V: ValidatorSetProvider + 'static,
{
    /// Run the checkpoint submission loop in the background. Triggers are processed one at a
    /// time; a failed submission is logged and retried by the next trigger. The loop ends when
    /// every sender of `triggers` is dropped.
    pub fn run(self, mut triggers: mpsc::Receiver<CheckpointTrigger>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(CheckpointTrigger {
                header,
                is_end_of_epoch,
            }) = triggers.recv().await
            {
                if let Err(e) = self.submit_checkpoint(&header, is_end_of_epoch).await {
                    log::error!(
                        "cannot submit checkpoint at block {} for sender {:?} due to {e}",
                        header.number,
                        self.sender
                    );
                }
            }

            log::info!("checkpoint trigger channel closed, stopping {self}");
        })
    }
}

impl<B: Blockchain, V: ValidatorSetProvider>
    CheckpointManager<EthRootchainInteractor<MiddlewareImpl>, B, V>
{
    pub fn new_evm_manager(config: &Config, blockchain: B, validators: V) -> Result<Self> {
        let rootchain = EthRootchainInteractor::from_config(&config.rootchain)?;
        Ok(Self::new(
            rootchain.sender(),
            config.rootchain.checkpoint_manager_address,
            config.checkpoint.checkpoints_offset,
            rootchain,
            blockchain,
            validators,
        ))
    }
}

impl<R, B, V> Display for CheckpointManager<R, B, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rootchain checkpoint manager, sender: {:?}, contract: {:?}",
            self.sender, self.checkpoint_manager_address
        )
    }
}

/// Parses the textual result of `currentCheckpointId`, decimal or `0x` prefixed hex.
fn parse_checkpoint_id(value: &str) -> Result<u64, CheckpointError> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() => ethers::types::U256::from_str_radix(hex, 16)
            .ok()
            .filter(|id| id.bits() <= 64)
            .map(|id| id.as_u64()),
        Some(_) => None,
        None => trimmed.parse::<u64>().ok(),
    };
    parsed.ok_or_else(|| CheckpointError::MalformedCheckpointId(value.to_string()))
}
