// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
use ethers::types::H256;
use quickcheck::{Arbitrary, Gen};

use crate::{Bitmap, CheckpointData, Extra, Signature};

/// Arbitrary [`Extra`] covering every combination of present and absent fields.
#[derive(Clone, Debug)]
pub struct ArbExtra(pub Extra);

impl Arbitrary for ArbExtra {
    fn arbitrary(g: &mut Gen) -> Self {
        let checkpoint = bool::arbitrary(g).then(|| {
            let mut event_root = [0u8; 32];
            event_root.iter_mut().for_each(|b| *b = u8::arbitrary(g));
            CheckpointData {
                block_round: u64::arbitrary(g),
                epoch_number: u64::arbitrary(g),
                event_root: H256::from(event_root),
            }
        });
        let committed = bool::arbitrary(g).then(|| Signature {
            aggregated_signature: Vec::<u8>::arbitrary(g),
            bitmap: Bitmap::from_bytes(Vec::<u8>::arbitrary(g)),
        });
        Self(Extra {
            checkpoint,
            committed,
        })
    }
}
