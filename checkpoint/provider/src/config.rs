// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Provides a simple way of reading configuration files.
//!
//! Reads a TOML config file for the checkpoint relayer and deserializes it in a type-safe way
//! into a [`Config`] struct.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use ethers::types::Address;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

/// The top-level struct representing the config. Calls to [`Config::from_file`] deserialize into
/// this struct.
#[derive(Deserialize, Clone)]
pub struct Config {
    pub rootchain: RootchainConfig,
    pub checkpoint: CheckpointConfig,
}

/// Connection and account used to submit checkpoints to the rootchain.
#[derive(Deserialize, Clone)]
pub struct RootchainConfig {
    pub jsonrpc_api_http: Url,
    pub auth_token: Option<String>,
    pub chain_id: u64,
    /// Hex encoded private key of the submitting account.
    pub private_key: String,
    /// The checkpoint manager contract on the rootchain.
    pub checkpoint_manager_address: Address,
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CheckpointConfig {
    /// Number of blocks between two checkpoint blocks.
    pub checkpoints_offset: u64,
}

impl Config {
    /// Reads a TOML configuration in the `s` string and returns a [`Config`] struct.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.checkpoint.validate()?;
        Ok(config)
    }

    /// Reads a TOML configuration file specified in the `path` and returns a [`Config`] struct.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Config::from_toml_str(contents.as_str())
    }
}

impl RootchainConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }
}

impl CheckpointConfig {
    pub fn validate(&self) -> Result<()> {
        if self.checkpoints_offset == 0 {
            return Err(anyhow!("checkpoints_offset must be positive"));
        }
        Ok(())
    }
}

fn default_rpc_timeout_secs() -> u64 {
    DEFAULT_RPC_TIMEOUT_SECS
}

fn default_receipt_timeout_secs() -> u64 {
    DEFAULT_RECEIPT_TIMEOUT_SECS
}
