// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
use ethers::utils::rlp::DecoderError;
use thiserror::Error;

use crate::header::EXTRA_VANITY;

/// The error enum for decoding checkpoint metadata out of block headers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("extra data is {0} bytes, shorter than the {EXTRA_VANITY} bytes vanity prefix")]
    ExtraTooShort(usize),
    #[error("cannot decode extra data: {0}")]
    Rlp(#[from] DecoderError),
}
