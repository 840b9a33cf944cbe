use alloy_primitives::{Address, B256};
use thiserror::Error;

/// Failures reported by the network collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("transaction {0} was dropped before a receipt was produced")]
    Dropped(B256),

    #[error("could not decode return data: {0}")]
    Decode(String),

    #[error("invalid signing key: {0}")]
    Signer(String),
}

/// Errors surfaced by [`crate::BatchClient`], tagged with the phase (and token) that failed.
///
/// The session is left untouched whenever one of these is returned.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("no operations pending")]
    EmptyBatch,

    #[error("sum of attached values overflows uint256")]
    ValueOverflow,

    #[error("required approval for token {token} overflows uint256")]
    ApprovalOverflow { token: Address },

    #[error("allowance query for token {token} failed: {source}")]
    AllowanceQuery {
        token: Address,
        #[source]
        source: GatewayError,
    },

    #[error("approval of token {token} failed: {source}")]
    Approval {
        token: Address,
        #[source]
        source: GatewayError,
    },

    #[error("approval of token {token} reverted in transaction {tx_hash}")]
    ApprovalReverted { token: Address, tx_hash: B256 },

    #[error("gas estimation failed: {0}")]
    Estimation(#[source] GatewayError),

    #[error("batch submission failed: {0}")]
    Submission(#[source] GatewayError),

    #[error("batch reverted in transaction {tx_hash}")]
    BatchReverted { tx_hash: B256 },

    #[error("withdrawal failed: {0}")]
    Withdrawal(#[source] GatewayError),

    #[error("withdrawal reverted in transaction {tx_hash}")]
    WithdrawalReverted { tx_hash: B256 },

    #[error("initialization failed: {0}")]
    Initialization(#[source] GatewayError),

    #[error("initialization reverted in transaction {tx_hash}")]
    InitializationReverted { tx_hash: B256 },
}
