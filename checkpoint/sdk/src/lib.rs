// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Common types shared between the consensus layer and the rootchain checkpoint relayer: the
//! checkpoint data carried in block headers, the committee signature over it and the validator
//! set that produced it.

pub mod bitmap;
pub mod checkpoint;
pub mod epoch;
pub mod error;
pub mod header;
pub mod validator;

#[cfg(test)]
mod arb;

pub use bitmap::Bitmap;
pub use checkpoint::{CheckpointData, Extra, Signature};
pub use epoch::{get_epoch_number, is_checkpoint_block};
pub use error::Error;
pub use header::{Header, EXTRA_VANITY};
pub use validator::{ValidatorMetadata, ValidatorSet};
