// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Abi of the checkpoint manager contract deployed on the rootchain.

use checkpoint_sdk::{CheckpointData, Signature, ValidatorSet};
use ethers::abi::{Function, Param, ParamType, StateMutability, Token};
use ethers::types::{H256, U256};
use lazy_static::lazy_static;

lazy_static! {
    /// `function currentCheckpointId() view returns (uint256)`
    pub static ref CURRENT_CHECKPOINT_ID_METHOD: Function = function(
        "currentCheckpointId",
        vec![],
        vec![param("", ParamType::Uint(256))],
        StateMutability::View,
    );

    /// `function submitCheckpoint(uint256 blockNumber, bytes32 blockHash,
    /// (uint256 blockRound, uint256 epochNumber, bytes32 eventRoot) checkpoint,
    /// (address _address, bytes blsKey, uint256 votingPower)[] nextValidators,
    /// bytes aggregatedSignature, bytes bitmap)`
    pub static ref SUBMIT_CHECKPOINT_METHOD: Function = function(
        "submitCheckpoint",
        vec![
            param("blockNumber", ParamType::Uint(256)),
            param("blockHash", ParamType::FixedBytes(32)),
            param(
                "checkpoint",
                ParamType::Tuple(vec![
                    ParamType::Uint(256),
                    ParamType::Uint(256),
                    ParamType::FixedBytes(32),
                ]),
            ),
            param(
                "nextValidators",
                ParamType::Array(Box::new(ParamType::Tuple(vec![
                    ParamType::Address,
                    ParamType::Bytes,
                    ParamType::Uint(256),
                ]))),
            ),
            param("aggregatedSignature", ParamType::Bytes),
            param("bitmap", ParamType::Bytes),
        ],
        vec![],
        StateMutability::NonPayable,
    );
}

#[allow(deprecated)]
fn function(
    name: &str,
    inputs: Vec<Param>,
    outputs: Vec<Param>,
    state_mutability: StateMutability,
) -> Function {
    Function {
        name: name.to_string(),
        inputs,
        outputs,
        constant: None,
        state_mutability,
    }
}

fn param(name: &str, kind: ParamType) -> Param {
    Param {
        name: name.to_string(),
        kind,
        internal_type: None,
    }
}

/// The arguments of `submitCheckpoint`, in declaration order.
pub fn submit_checkpoint_tokens(
    block_number: u64,
    block_hash: H256,
    checkpoint: &CheckpointData,
    committed: &Signature,
    next_validators: &ValidatorSet,
) -> Vec<Token> {
    let validators = next_validators
        .iter()
        .map(|v| {
            Token::Tuple(vec![
                Token::Address(v.address),
                Token::Bytes(v.bls_key.to_vec()),
                Token::Uint(v.voting_power),
            ])
        })
        .collect();

    vec![
        Token::Uint(U256::from(block_number)),
        Token::FixedBytes(block_hash.as_bytes().to_vec()),
        Token::Tuple(vec![
            Token::Uint(U256::from(checkpoint.block_round)),
            Token::Uint(U256::from(checkpoint.epoch_number)),
            Token::FixedBytes(checkpoint.event_root.as_bytes().to_vec()),
        ]),
        Token::Array(validators),
        Token::Bytes(committed.aggregated_signature.clone()),
        Token::Bytes(committed.bitmap.as_bytes().to_vec()),
    ]
}
