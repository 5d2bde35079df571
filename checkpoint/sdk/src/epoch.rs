// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT

/// Maps a block height to the epoch containing it. Epochs have a fixed size known in advance.
pub fn get_epoch_number(block_number: u64, epoch_size: u64) -> u64 {
    block_number.checked_div(epoch_size).unwrap_or_default()
}

/// True iff `block_number` is a positive multiple of `checkpoints_offset`. Genesis is never a
/// checkpoint block, and neither is any block when the offset is zero.
pub fn is_checkpoint_block(block_number: u64, checkpoints_offset: u64) -> bool {
    block_number > 0 && checkpoints_offset > 0 && block_number % checkpoints_offset == 0
}
