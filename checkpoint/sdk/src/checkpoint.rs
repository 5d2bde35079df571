// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Checkpoint data and committee signature carried in the extra data of a block header.

use ethers::types::H256;
use ethers::utils::rlp::{self, Decodable, DecoderError, Encodable, Rlp, RlpStream};

use crate::bitmap::Bitmap;
use crate::error::Error;
use crate::header::EXTRA_VANITY;

/// The checkpoint the committee agreed on for a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointData {
    pub block_round: u64,
    pub epoch_number: u64,
    /// Root of the cross chain events emitted in the epoch.
    pub event_root: H256,
}

/// The aggregated committee signature over a checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub aggregated_signature: Vec<u8>,
    pub bitmap: Bitmap,
}

/// Side-car stored after the vanity prefix of a header's extra data.
///
/// `checkpoint` is absent until the round reaches agreement and `committed` is absent until the
/// commit round finalizes. Both are encoded as an RLP list, an absent field being written as the
/// empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extra {
    pub checkpoint: Option<CheckpointData>,
    pub committed: Option<Signature>,
}

impl Extra {
    /// Decodes the extra from the raw `extra_data` of a header, skipping the vanity prefix.
    pub fn from_extra_data(extra_data: &[u8]) -> Result<Self, Error> {
        if extra_data.len() < EXTRA_VANITY {
            return Err(Error::ExtraTooShort(extra_data.len()));
        }

        let payload = &extra_data[EXTRA_VANITY..];
        let r = Rlp::new(payload);
        if r.payload_info()?.total() != payload.len() {
            return Err(Error::Rlp(DecoderError::RlpInconsistentLengthAndData));
        }
        Ok(r.as_val()?)
    }

    /// Encodes the extra behind a zeroed vanity prefix, ready to be stored in a header.
    pub fn to_extra_data(&self) -> Vec<u8> {
        let mut extra_data = vec![0u8; EXTRA_VANITY];
        extra_data.extend_from_slice(&rlp::encode(self));
        extra_data
    }

    /// The checkpoint and its committed signature, if the block was finalized.
    pub fn finalized(&self) -> Option<(&CheckpointData, &Signature)> {
        self.checkpoint.as_ref().zip(self.committed.as_ref())
    }
}

impl Encodable for CheckpointData {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.block_round);
        s.append(&self.epoch_number);
        s.append(&self.event_root);
    }
}

impl Decodable for CheckpointData {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 3 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            block_round: rlp.val_at(0)?,
            epoch_number: rlp.val_at(1)?,
            event_root: rlp.val_at(2)?,
        })
    }
}

impl Encodable for Signature {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.aggregated_signature);
        s.append(&self.bitmap);
    }
}

impl Decodable for Signature {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 2 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            aggregated_signature: rlp.val_at(0)?,
            bitmap: rlp.val_at(1)?,
        })
    }
}

impl Encodable for Extra {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        append_optional(s, self.checkpoint.as_ref());
        append_optional(s, self.committed.as_ref());
    }
}

impl Decodable for Extra {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 2 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            checkpoint: decode_optional(&rlp.at(0)?)?,
            committed: decode_optional(&rlp.at(1)?)?,
        })
    }
}

fn append_optional<T: Encodable>(s: &mut RlpStream, value: Option<&T>) {
    match value {
        Some(v) => {
            s.append(v);
        }
        None => {
            s.begin_list(0);
        }
    }
}

fn decode_optional<T: Decodable>(rlp: &Rlp) -> Result<Option<T>, DecoderError> {
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList);
    }
    if rlp.item_count()? == 0 {
        return Ok(None);
    }
    rlp.as_val().map(Some)
}
