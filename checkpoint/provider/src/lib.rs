// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Relays the checkpoints agreed by the sidechain committee to the rootchain.

pub mod abi;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod manager;

pub use checkpoint::{CheckpointManager, CheckpointTrigger};
pub use error::CheckpointError;
pub use manager::{Blockchain, RootchainInteractor, ValidatorSetProvider};
