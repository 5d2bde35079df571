// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Validator set types.

use ethers::types::{Address, Bytes, U256};

use crate::bitmap::Bitmap;

/// Public identity of a committee member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorMetadata {
    pub address: Address,
    /// The aggregation public key, opaque to the relayer.
    pub bls_key: Bytes,
    pub voting_power: U256,
}

/// A deterministically ordered validator set. The position of a validator in the set is its
/// index in signature bitmaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorSet(Vec<ValidatorMetadata>);

impl ValidatorSet {
    pub fn new(validators: Vec<ValidatorMetadata>) -> Self {
        Self(validators)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidatorMetadata> {
        self.0.iter()
    }

    pub fn total_voting_power(&self) -> U256 {
        self.0
            .iter()
            .fold(U256::zero(), |acc, v| acc + v.voting_power)
    }

    /// Minimum voting power, two thirds of the total rounded up, a checkpoint signature must
    /// carry to be final.
    pub fn quorum_size(&self) -> U256 {
        (self.total_voting_power() * 2 + 2) / 3
    }

    /// The validators whose bit is set in `bitmap`.
    pub fn signers(&self, bitmap: &Bitmap) -> ValidatorSet {
        self.0
            .iter()
            .enumerate()
            .filter(|(i, _)| bitmap.is_set(*i as u64))
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn has_quorum(&self, bitmap: &Bitmap) -> bool {
        !self.is_empty() && self.signers(bitmap).total_voting_power() >= self.quorum_size()
    }
}

impl FromIterator<ValidatorMetadata> for ValidatorSet {
    fn from_iter<T: IntoIterator<Item = ValidatorMetadata>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ValidatorSet {
    type Item = &'a ValidatorMetadata;
    type IntoIter = std::slice::Iter<'a, ValidatorMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
