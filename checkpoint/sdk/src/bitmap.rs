// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Growable bit-set recording which validators contributed to an aggregated signature.

use ethers::utils::rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// Bit `i` is stored in byte `i / 8` under the mask `1 << (i % 8)`, bit `i` being the validator
/// at index `i` of the ordered validator set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitmap(Vec<u8>);

impl Bitmap {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bits the bitmap can currently address without growing.
    pub fn len(&self) -> u64 {
        self.0.len() as u64 * 8
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sets bit `index`, growing the underlying buffer when needed.
    pub fn set(&mut self, index: u64) {
        let byte = (index / 8) as usize;
        if byte >= self.0.len() {
            self.0.resize(byte + 1, 0);
        }
        self.0[byte] |= 1 << (index % 8);
    }

    pub fn is_set(&self, index: u64) -> bool {
        self.0
            .get((index / 8) as usize)
            .map(|b| b & (1 << (index % 8)) != 0)
            .unwrap_or(false)
    }

    /// The number of set bits.
    pub fn count_ones(&self) -> u64 {
        self.0.iter().map(|b| b.count_ones() as u64).sum()
    }
}

impl Encodable for Bitmap {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append(&self.0);
    }
}

impl Decodable for Bitmap {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        Ok(Self(rlp.as_val()?))
    }
}
