use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use batch_executor_types::interfaces::{IBatchExecutor, IERC20};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::{
    error::ClientError,
    gateway::{BatchReceipt, ChainGateway},
    session::BatchSession,
};

/// Submits [`BatchSession`]s to one deployed executor.
pub struct BatchClient<G> {
    gateway: G,
    executor: Address,
}

impl<G: ChainGateway> BatchClient<G> {
    pub fn new(gateway: G, executor: Address) -> Self {
        Self { gateway, executor }
    }

    pub fn executor(&self) -> Address {
        self.executor
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Gas estimate for `executeBatch` over the pending operations with their total value attached.
    pub async fn estimate_gas(&self, session: &BatchSession) -> Result<U256, ClientError> {
        let value = session.total_value()?;
        let gas = self
            .gateway
            .estimate_gas(self.executor, session.execute_batch_calldata(), value)
            .await
            .map_err(ClientError::Estimation)?;
        debug!(operations = session.len(), %value, %gas, "estimated batch gas");
        Ok(gas)
    }

    /// Top up allowances, submit the batch and clear `session` once it is confirmed.
    ///
    /// On any error the session is left exactly as it was, so the call can be retried.
    pub async fn execute(&self, session: &mut BatchSession) -> Result<BatchReceipt, ClientError> {
        if session.is_empty() {
            return Err(ClientError::EmptyBatch);
        }
        let value = session.total_value()?;
        let required = session.required_approvals()?;

        self.ensure_approvals(&required).await?;

        info!(
            operations = session.len(),
            %value,
            executor = %self.executor,
            "submitting batch"
        );
        let receipt = self
            .gateway
            .send_transaction(self.executor, session.execute_batch_calldata(), value)
            .await
            .map_err(ClientError::Submission)?;
        if !receipt.success {
            warn!(tx_hash = %receipt.transaction_hash, "batch reverted");
            return Err(ClientError::BatchReverted {
                tx_hash: receipt.transaction_hash,
            });
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            block = ?receipt.block_number,
            gas_used = ?receipt.gas_used,
            "batch confirmed"
        );
        session.clear_operations();
        Ok(receipt)
    }

    /// Approve the executor for every token whose current allowance is below `required`.
    ///
    /// Returns the tokens an approval was sent for, in address order.
    pub async fn ensure_approvals(
        &self,
        required: &BTreeMap<Address, U256>,
    ) -> Result<Vec<Address>, ClientError> {
        let owner = self.gateway.account();
        let current = try_join_all(required.keys().map(|&token| async move {
            self.gateway
                .allowance(token, owner, self.executor)
                .await
                .map_err(|source| ClientError::AllowanceQuery { token, source })
        }))
        .await?;

        let mut approved = Vec::new();
        // One signer, one nonce sequence: approvals go out one at a time.
        for ((&token, &amount), allowance) in required.iter().zip(current) {
            if allowance >= amount {
                debug!(%token, %allowance, %amount, "allowance already sufficient");
                continue;
            }

            info!(%token, %allowance, %amount, "approving executor");
            let data = IERC20::approveCall {
                spender: self.executor,
                amount,
            }
            .abi_encode();
            let receipt = self
                .gateway
                .send_transaction(token, data, U256::ZERO)
                .await
                .map_err(|source| ClientError::Approval { token, source })?;
            if !receipt.success {
                warn!(%token, tx_hash = %receipt.transaction_hash, "approval reverted");
                return Err(ClientError::ApprovalReverted {
                    token,
                    tx_hash: receipt.transaction_hash,
                });
            }
            approved.push(token);
        }
        Ok(approved)
    }

    /// Drain the executor's balance to the signer (owner only).
    pub async fn withdraw(&self) -> Result<BatchReceipt, ClientError> {
        let data = IBatchExecutor::withdrawCall {}.abi_encode();
        let receipt = self
            .gateway
            .send_transaction(self.executor, data, U256::ZERO)
            .await
            .map_err(ClientError::Withdrawal)?;
        if !receipt.success {
            return Err(ClientError::WithdrawalReverted {
                tx_hash: receipt.transaction_hash,
            });
        }
        info!(tx_hash = %receipt.transaction_hash, "withdrawal confirmed");
        Ok(receipt)
    }

    /// Claim ownership of a freshly deployed executor for the signer.
    pub async fn initialize(&self) -> Result<BatchReceipt, ClientError> {
        let data = IBatchExecutor::initializeCall {}.abi_encode();
        let receipt = self
            .gateway
            .send_transaction(self.executor, data, U256::ZERO)
            .await
            .map_err(ClientError::Initialization)?;
        if !receipt.success {
            return Err(ClientError::InitializationReverted {
                tx_hash: receipt.transaction_hash,
            });
        }
        info!(owner = %self.gateway.account(), "executor initialized");
        Ok(receipt)
    }
}
