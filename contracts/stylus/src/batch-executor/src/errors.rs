use alloc::vec::Vec;

use alloy_sol_types::sol;
use stylus_sdk::{
    alloy_primitives::{Address, U256},
    stylus_proc::SolidityError,
};

sol! {
    error MalformedRequest(uint256 targets, uint256 payloads, uint256 amounts);
    error SubcallFailed(uint256 index, bytes reason);
    error InsufficientFunds(uint256 expected, uint256 actual);
    error RefundTransferFailed(address recipient, uint256 amount);
    error WithdrawTransferFailed(address recipient, uint256 amount);
    error NothingToWithdraw();
    error DirectPaymentRejected(address sender, uint256 value);
    error Unauthorized(address caller);
    error AlreadyInitialized(address owner);
}

/// Revert reasons surfaced by the `#[public]` entry points.
#[derive(SolidityError)]
pub enum ExecutorError {
    MalformedRequest(MalformedRequest),
    SubcallFailed(SubcallFailed),
    InsufficientFunds(InsufficientFunds),
    RefundTransferFailed(RefundTransferFailed),
    WithdrawTransferFailed(WithdrawTransferFailed),
    NothingToWithdraw(NothingToWithdraw),
    DirectPaymentRejected(DirectPaymentRejected),
    Unauthorized(Unauthorized),
    AlreadyInitialized(AlreadyInitialized),
}

/// Errors raised by the execution core, before ABI encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    MalformedRequest {
        targets: usize,
        payloads: usize,
        amounts: usize,
    },
    SubcallFailed {
        index: usize,
        reason: Vec<u8>,
    },
    /// Sub-calls spent funds the executor held before the batch.
    InsufficientFunds {
        expected: U256,
        actual: U256,
    },
    RefundTransferFailed {
        recipient: Address,
        amount: U256,
    },
    WithdrawTransferFailed {
        recipient: Address,
        amount: U256,
    },
    NothingToWithdraw,
}

impl From<batch_executor_types::MalformedRequest> for BatchError {
    fn from(err: batch_executor_types::MalformedRequest) -> Self {
        BatchError::MalformedRequest {
            targets: err.targets,
            payloads: err.payloads,
            amounts: err.amounts,
        }
    }
}

impl From<BatchError> for ExecutorError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::MalformedRequest {
                targets,
                payloads,
                amounts,
            } => ExecutorError::MalformedRequest(MalformedRequest {
                targets: U256::from(targets),
                payloads: U256::from(payloads),
                amounts: U256::from(amounts),
            }),
            BatchError::SubcallFailed { index, reason } => {
                ExecutorError::SubcallFailed(SubcallFailed {
                    index: U256::from(index),
                    reason: reason.into(),
                })
            }
            BatchError::InsufficientFunds { expected, actual } => {
                ExecutorError::InsufficientFunds(InsufficientFunds { expected, actual })
            }
            BatchError::RefundTransferFailed { recipient, amount } => {
                ExecutorError::RefundTransferFailed(RefundTransferFailed { recipient, amount })
            }
            BatchError::WithdrawTransferFailed { recipient, amount } => {
                ExecutorError::WithdrawTransferFailed(WithdrawTransferFailed { recipient, amount })
            }
            BatchError::NothingToWithdraw => ExecutorError::NothingToWithdraw(NothingToWithdraw {}),
        }
    }
}
