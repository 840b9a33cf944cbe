//! Network collaborator: account resolution, allowance reads, gas estimation and transaction
//! submission.
//!
//! [`BatchClient`](crate::BatchClient) only talks to the chain through [`ChainGateway`], so tests
//! can swap in an in-memory implementation. [`EthersGateway`] is the JSON-RPC implementation.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use batch_executor_types::interfaces::IERC20;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{self as eth, transaction::eip2718::TypedTransaction, TransactionRequest},
};
use tracing::debug;

use crate::error::GatewayError;

/// Outcome of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
    /// `status == 1`.
    pub success: bool,
}

#[allow(async_fn_in_trait)]
pub trait ChainGateway {
    /// Address of the signing account.
    fn account(&self) -> Address;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, GatewayError>;

    async fn estimate_gas(
        &self,
        to: Address,
        data: Vec<u8>,
        value: U256,
    ) -> Result<U256, GatewayError>;

    /// Sign, submit and wait for the receipt.
    async fn send_transaction(
        &self,
        to: Address,
        data: Vec<u8>,
        value: U256,
    ) -> Result<BatchReceipt, GatewayError>;
}

/// [`ChainGateway`] over any `ethers` middleware that can sign for `account`.
pub struct EthersGateway<M> {
    client: Arc<M>,
    account: Address,
}

/// HTTP provider with a local private-key signer.
pub type SignerGateway = EthersGateway<SignerMiddleware<Provider<Http>, LocalWallet>>;

impl<M: Middleware + 'static> EthersGateway<M> {
    pub fn new(client: Arc<M>, account: Address) -> Self {
        Self { client, account }
    }

    pub fn client(&self) -> &Arc<M> {
        &self.client
    }

    fn request(&self, to: Address, data: Vec<u8>, value: U256) -> TransactionRequest {
        TransactionRequest::new()
            .from(to_ethers_address(self.account))
            .to(to_ethers_address(to))
            .data(data)
            .value(to_ethers_u256(value))
    }
}

impl SignerGateway {
    /// Connect to `rpc_url` and sign with the hex-encoded `private_key`.
    pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Self, GatewayError> {
        let provider = Provider::<Http>::try_from(rpc_url).map_err(rpc_error)?;
        let chain_id = provider.get_chainid().await.map_err(rpc_error)?;
        let wallet = private_key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| GatewayError::Signer(e.to_string()))?
            .with_chain_id(chain_id.as_u64());
        let account = to_alloy_address(wallet.address());
        debug!(%account, chain_id = chain_id.as_u64(), "connected signer");

        Ok(Self::new(
            Arc::new(SignerMiddleware::new(provider, wallet)),
            account,
        ))
    }
}

impl<M: Middleware + 'static> ChainGateway for EthersGateway<M> {
    fn account(&self) -> Address {
        self.account
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, GatewayError> {
        let data = IERC20::allowanceCall { owner, spender }.abi_encode();
        let tx: TypedTransaction = TransactionRequest::new()
            .to(to_ethers_address(token))
            .data(data)
            .into();
        let out = self.client.call(&tx, None).await.map_err(rpc_error)?;
        let decoded = IERC20::allowanceCall::abi_decode_returns(&out[..], true)
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(decoded.remaining)
    }

    async fn estimate_gas(
        &self,
        to: Address,
        data: Vec<u8>,
        value: U256,
    ) -> Result<U256, GatewayError> {
        let tx: TypedTransaction = self.request(to, data, value).into();
        let gas = self.client.estimate_gas(&tx, None).await.map_err(rpc_error)?;
        Ok(to_alloy_u256(gas))
    }

    async fn send_transaction(
        &self,
        to: Address,
        data: Vec<u8>,
        value: U256,
    ) -> Result<BatchReceipt, GatewayError> {
        let tx = self.request(to, data, value);
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(rpc_error)?;
        let tx_hash = B256::from(pending.tx_hash().0);
        debug!(%tx_hash, %to, "transaction submitted");

        let receipt = pending
            .await
            .map_err(rpc_error)?
            .ok_or(GatewayError::Dropped(tx_hash))?;
        Ok(receipt_from_ethers(&receipt))
    }
}

fn rpc_error<E: std::fmt::Display>(err: E) -> GatewayError {
    GatewayError::Rpc(err.to_string())
}

fn receipt_from_ethers(receipt: &eth::TransactionReceipt) -> BatchReceipt {
    BatchReceipt {
        transaction_hash: B256::from(receipt.transaction_hash.0),
        block_number: receipt.block_number.map(|n| n.as_u64()),
        gas_used: receipt.gas_used.map(to_alloy_u256),
        success: receipt.status.map(|s| s.as_u64() == 1).unwrap_or(false),
    }
}

pub fn to_ethers_address(address: Address) -> eth::Address {
    eth::Address::from_slice(address.as_slice())
}

pub fn to_alloy_address(address: eth::Address) -> Address {
    Address::from(address.0)
}

pub fn to_ethers_u256(value: U256) -> eth::U256 {
    eth::U256::from_big_endian(&value.to_be_bytes::<32>())
}

pub fn to_alloy_u256(value: eth::U256) -> U256 {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    U256::from_be_bytes(buf)
}
