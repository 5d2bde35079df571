// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! The subset of the sidechain block header consumed by the checkpoint relayer.

use ethers::types::H256;
use ethers::utils::keccak256;
use ethers::utils::rlp::RlpStream;

use crate::checkpoint::Extra;
use crate::error::Error;

/// Length of the vanity prefix at the start of the header extra data, agreed with consensus.
pub const EXTRA_VANITY: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub parent_hash: H256,
    pub number: u64,
    pub timestamp: u64,
    pub state_root: H256,
    /// Vanity prefix followed by the RLP encoded [`Extra`].
    pub extra_data: Vec<u8>,
    pub hash: H256,
}

impl Header {
    /// Decodes the [`Extra`] embedded in the header. Nothing is cached, every call decodes again.
    pub fn extra(&self) -> Result<Extra, Error> {
        Extra::from_extra_data(&self.extra_data)
    }

    /// Recomputes and stores the header hash, keccak256 over the RLP encoded header fields.
    pub fn compute_hash(&mut self) -> H256 {
        let mut s = RlpStream::new_list(5);
        s.append(&self.parent_hash);
        s.append(&self.number);
        s.append(&self.timestamp);
        s.append(&self.state_root);
        s.append(&self.extra_data);

        self.hash = H256::from(keccak256(s.out()));
        self.hash
    }
}

#[cfg(test)]
mod tests {
    use ethers::types::H256;

    use crate::{CheckpointData, Extra, Header};

    fn header_with_epoch(number: u64, epoch_number: u64) -> Header {
        let extra = Extra {
            checkpoint: Some(CheckpointData {
                block_round: 0,
                epoch_number,
                event_root: H256::zero(),
            }),
            committed: None,
        };
        Header {
            number,
            extra_data: extra.to_extra_data(),
            ..Default::default()
        }
    }

    #[test]
    fn hash_covers_extra_data() {
        let mut h1 = header_with_epoch(4, 1);
        let mut h2 = header_with_epoch(4, 2);

        let hash1 = h1.compute_hash();
        assert_eq!(hash1, h1.hash);
        assert_ne!(hash1, H256::zero());
        assert_ne!(hash1, h2.compute_hash());

        // deterministic
        let mut again = header_with_epoch(4, 1);
        assert_eq!(again.compute_hash(), hash1);
    }

    #[test]
    fn extra_is_decoded_on_demand() {
        let header = header_with_epoch(10, 3);
        let extra = header.extra().unwrap();
        assert_eq!(extra.checkpoint.unwrap().epoch_number, 3);
        assert!(extra.committed.is_none());
    }
}
