// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: MIT
//! Rootchain interactor backed by an ethers json rpc client.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::prelude::k256::ecdsa::SigningKey;
use ethers::prelude::{Signer, SignerMiddleware};
use ethers::providers::{Authorization, Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Wallet};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, BlockNumber, Bytes, TransactionReceipt, TransactionRequest};

use crate::config::RootchainConfig;
use crate::manager::RootchainInteractor;

pub type MiddlewareImpl = SignerMiddleware<Provider<Http>, Wallet<SigningKey>>;

pub struct EthRootchainInteractor<M: Middleware> {
    client: Arc<M>,
    rpc_timeout: Duration,
    receipt_timeout: Duration,
}

impl<M: Middleware> EthRootchainInteractor<M> {
    pub fn new(client: Arc<M>, rpc_timeout: Duration, receipt_timeout: Duration) -> Self {
        Self {
            client,
            rpc_timeout,
            receipt_timeout,
        }
    }
}

impl EthRootchainInteractor<MiddlewareImpl> {
    pub fn from_config(config: &RootchainConfig) -> Result<Self> {
        let url = config.jsonrpc_api_http.clone();
        let provider = match config.auth_token.as_deref() {
            Some(token) => Http::new_with_auth(url, Authorization::Bearer(token.to_string()))?,
            None => Http::new(url),
        };

        let provider = Provider::new(provider);
        let wallet = config.private_key.parse::<LocalWallet>()?;
        let wallet = wallet.with_chain_id(config.chain_id);

        let signer = SignerMiddleware::new(provider, wallet);
        Ok(Self::new(
            Arc::new(signer),
            config.rpc_timeout(),
            config.receipt_timeout(),
        ))
    }

    /// The rootchain account checkpoints are submitted from.
    pub fn sender(&self) -> Address {
        self.client.address()
    }
}

#[async_trait]
impl<M: Middleware + 'static> RootchainInteractor for EthRootchainInteractor<M> {
    async fn call(&self, from: Address, to: Address, input: Bytes) -> Result<String> {
        let tx: TypedTransaction = TransactionRequest::new().from(from).to(to).data(input).into();
        let result = with_timeout("eth_call", self.rpc_timeout, self.client.call(&tx, None)).await?;
        Ok(result.to_string())
    }

    async fn get_pending_nonce(&self, address: Address) -> Result<u64> {
        let nonce = with_timeout(
            "eth_getTransactionCount",
            self.rpc_timeout,
            self.client
                .get_transaction_count(address, Some(BlockNumber::Pending.into())),
        )
        .await?;
        if nonce.bits() > 64 {
            return Err(anyhow!("nonce {nonce} of {address:?} overflows u64"));
        }
        Ok(nonce.as_u64())
    }

    async fn send_transaction(
        &self,
        nonce: u64,
        transaction: TransactionRequest,
    ) -> Result<TransactionReceipt> {
        let transaction = transaction.nonce(nonce);
        log::debug!("sending rootchain transaction: {transaction:?}");

        let pending = with_timeout(
            "eth_sendTransaction",
            self.rpc_timeout,
            self.client.send_transaction(transaction, None),
        )
        .await?;
        let tx_hash = *pending;
        log::debug!("rootchain transaction {tx_hash:?} pending with nonce {nonce}");

        let receipt = with_timeout("transaction receipt", self.receipt_timeout, pending).await?;
        receipt.ok_or_else(|| anyhow!("no receipt for transaction {tx_hash:?}, dropped from mempool"))
    }
}

async fn with_timeout<T, E>(
    method: &str,
    timeout: Duration,
    fut: impl Future<Output = std::result::Result<T, E>>,
) -> Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| anyhow!("{method} timed out after {timeout:?}"))?
        .map_err(anyhow::Error::from)
}
